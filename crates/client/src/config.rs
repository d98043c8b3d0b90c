use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for a service running locally.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote API; history image paths are resolved
    /// against it as well.
    pub api_base_url: String,
    /// Where the page navigates when the session is not valid.
    pub login_url: String,
    /// Timeout for session, history and auth requests, in seconds.
    pub request_timeout_secs: u64,
    /// Upper bound on a single generation round trip, in seconds.
    pub generation_timeout_secs: u64,
    /// Directory downloads are written to.
    pub download_dir: PathBuf,
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5550".into(),
            login_url: "/login".into(),
            request_timeout_secs: 30,
            generation_timeout_secs: 600,
            download_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `GENGTU_API_BASE_URL`     | `http://localhost:5550` |
    /// | `GENGTU_LOGIN_URL`        | `/login`                |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `GENERATION_TIMEOUT_SECS` | `600`                   |
    /// | `GENGTU_DOWNLOAD_DIR`     | `.`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an arbitrary
    /// key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_base_url = lookup("GENGTU_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_base_url);

        let login_url = lookup("GENGTU_LOGIN_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.login_url);

        let request_timeout_secs = parse_secs(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            defaults.request_timeout_secs,
        )?;

        let generation_timeout_secs = parse_secs(
            "GENERATION_TIMEOUT_SECS",
            lookup("GENERATION_TIMEOUT_SECS"),
            defaults.generation_timeout_secs,
        )?;

        let download_dir = lookup("GENGTU_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        Ok(Self {
            api_base_url,
            login_url,
            request_timeout_secs,
            generation_timeout_secs,
            download_dir,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

fn parse_secs(key: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            key,
            expected: "a positive number of seconds",
            value: raw,
        }),
    }
}
