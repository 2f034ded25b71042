//! Connection accept loop.
//!
//! `axum::serve` has no knob for idle connections, so connections are driven
//! with hyper's HTTP/1 builder directly: the header read timeout closes
//! keep-alive connections that stay quiet for `idle_timeout`.

use std::future::Future;
use std::io;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Instrument, Span, debug, error, info, warn};

/// Pause after an accept error that is not tied to a single connection,
/// e.g. running out of file descriptors.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// Serve `app` on `listener` until `shutdown` resolves, then wait for open
/// connections to finish (at most `idle_timeout`).
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    idle_timeout: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    // Dropped to tell connections to finish their current request and close.
    let (signal_tx, signal_rx) = watch::channel(());
    // Each connection holds a receiver; the sender sees `closed()` once all are gone.
    let (close_tx, close_rx) = watch::channel(());

    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    if is_connection_error(&e) {
                        debug!(error = %e, "connection dropped before accept");
                    } else {
                        error!(error = %e, "failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                    continue;
                }
            },
            _ = &mut shutdown => break,
        };

        let service = TowerToHyperService::new(app.clone());
        let mut signal_rx = signal_rx.clone();
        let close_rx = close_rx.clone();

        tokio::spawn(
            async move {
                let conn = http1::Builder::new()
                    .timer(TokioTimer::new())
                    .header_read_timeout(idle_timeout)
                    .serve_connection(TokioIo::new(stream), service);
                tokio::pin!(conn);

                let mut draining = false;
                loop {
                    tokio::select! {
                        result = conn.as_mut() => {
                            if let Err(e) = result {
                                debug!(%peer, error = %e, "connection closed with error");
                            }
                            break;
                        }
                        _ = signal_rx.changed(), if !draining => {
                            draining = true;
                            conn.as_mut().graceful_shutdown();
                        }
                    }
                }

                drop(close_rx);
            }
            .instrument(Span::current()),
        );
    }

    info!("no longer accepting connections");
    drop(listener);
    drop(signal_rx);
    drop(signal_tx);
    drop(close_rx);

    if tokio::time::timeout(idle_timeout, close_tx.closed())
        .await
        .is_err()
    {
        warn!(
            timeout = %humantime::format_duration(idle_timeout),
            "connections still open after shutdown grace period"
        );
    } else {
        info!("all connections closed");
    }

    Ok(())
}

/// Errors that concern only the peer being accepted. Anything else (EMFILE,
/// ENFILE, ENOMEM) will fail again right away.
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}
