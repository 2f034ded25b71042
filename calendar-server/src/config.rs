//! Server configuration.
//!
//! The `CONFIG_PATH` environment variable must name an existing YAML file.
//! Values in the file can be overridden with `CALENDAR__`-prefixed
//! environment variables, e.g. `CALENDAR__HTTP_SERVER__ADDRESS`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Deserializer};

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

static DEFAULT_ADDRESS: &str = "0.0.0.0:8085";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Deployment environment; selects the log format and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    Local,
    #[default]
    Dev,
    Prod,
}

impl Env {
    pub fn as_str(self) -> &'static str {
        match self {
            Env::Local => "local",
            Env::Dev => "dev",
            Env::Prod => "prod",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub env: Env,

    #[serde(default)]
    pub http_server: HttpServer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpServer {
    #[serde(default = "default_address")]
    pub address: String,

    /// Upper bound on handling a single request.
    #[serde(default = "default_timeout", deserialize_with = "human_duration")]
    pub timeout: Duration,

    /// How long a keep-alive connection may sit without a new request.
    #[serde(default = "default_idle_timeout", deserialize_with = "human_duration")]
    pub idle_timeout: Duration,
}

impl Default for HttpServer {
    fn default() -> Self {
        HttpServer {
            address: default_address(),
            timeout: DEFAULT_TIMEOUT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_idle_timeout() -> Duration {
    DEFAULT_IDLE_TIMEOUT
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Load settings from the file named by `CONFIG_PATH`.
///
/// A `.env` file in the working directory is read first, so `CONFIG_PATH`
/// may be set there.
pub fn load() -> Result<Settings> {
    let _ = dotenvy::dotenv();
    let path = config_path(std::env::var_os(CONFIG_PATH_ENV))?;
    Settings::from_file(&path)
}

fn config_path(value: Option<OsString>) -> Result<PathBuf> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("{CONFIG_PATH_ENV} env is not set"))?;

    Ok(PathBuf::from(value))
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("config file does not exist: {}", path.display());
        }

        Config::builder()
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Yaml))
            .add_source(Environment::with_prefix("CALENDAR").separator("__"))
            .build()
            .with_context(|| format!("Could not read config file {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Invalid config in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_full_config() {
        let file = write_config(
            "\
env: local
http_server:
  address: 127.0.0.1:9000
  timeout: 4s
  idle_timeout: 2m
",
        );

        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.env, Env::Local);
        assert_eq!(settings.http_server.address, "127.0.0.1:9000");
        assert_eq!(settings.http_server.timeout, Duration::from_secs(4));
        assert_eq!(settings.http_server.idle_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let file = write_config("env: prod\n");

        let settings = Settings::from_file(file.path()).unwrap();

        assert_eq!(settings.env, Env::Prod);
        assert_eq!(settings.http_server.address, DEFAULT_ADDRESS);
        assert_eq!(settings.http_server.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.http_server.idle_timeout, DEFAULT_IDLE_TIMEOUT);
    }

    #[test]
    fn test_bad_duration_is_rejected() {
        let file = write_config(
            "\
http_server:
  timeout: soon
",
        );

        assert!(Settings::from_file(file.path()).is_err());
    }

    #[test]
    fn test_unknown_env_is_rejected() {
        let file = write_config("env: staging\n");
        assert!(Settings::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_config_path_must_be_set() {
        assert!(config_path(None).is_err());
        assert!(config_path(Some(OsString::new())).is_err());
        assert_eq!(
            config_path(Some(OsString::from("/etc/calendar.yaml"))).unwrap(),
            PathBuf::from("/etc/calendar.yaml")
        );
    }
}
