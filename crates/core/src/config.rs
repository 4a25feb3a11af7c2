//! Run configuration loaded from the environment

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};

/// Default screenshot directory, resolved against the working directory.
const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Immutable per-run configuration.
///
/// Loaded once at process entry and threaded through the stages; nothing
/// reads the environment after construction. Debug output masks the
/// password and OTP secret.
#[derive(Clone)]
pub struct Config {
    /// Hostname to renew, e.g. `example.ddns.net`.
    pub dns_hostname: String,
    /// No-IP account username.
    pub noip_username: String,
    /// No-IP account password.
    pub noip_password: String,
    /// Base32-encoded TOTP shared secret.
    pub otp_secret: String,
    /// Console log level (default `info`).
    pub log_level: String,
    /// Directory renewal screenshots are written to.
    pub screenshot_dir: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dns_hostname = required(&lookup, "DNS_HOSTNAME")?;
        let noip_username = required(&lookup, "NOIP_USERNAME")?;
        let noip_password = required(&lookup, "NOIP_PASSWORD")?;
        let otp_secret = required(&lookup, "OTP_SECRET")?;

        let log_level = lookup("LOG_LEVEL")
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| "info".to_string());

        let screenshot_dir = lookup("SCREENSHOT_DIR")
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .unwrap_or_else(|| DEFAULT_SCREENSHOT_DIR.to_string());

        Ok(Self {
            dns_hostname,
            noip_username,
            noip_password,
            otp_secret,
            log_level,
            screenshot_dir: resolve_dir(Path::new(&screenshot_dir)),
        })
    }

    /// Log a summary of the loaded configuration, secrets masked.
    pub fn log_summary(&self) {
        info!("Configuration loaded successfully:");
        info!("    - DNS Hostname: {}", self.dns_hostname);
        info!("    - Username: {}", self.noip_username);
        info!("    - Password: {}", "*".repeat(self.noip_password.len()));
        info!("    - OTP Secret: {}", "*".repeat(self.otp_secret.len()));
        info!("    - Screenshot dir: {}", self.screenshot_dir.display());
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("dns_hostname", &self.dns_hostname)
            .field("noip_username", &self.noip_username)
            .field("noip_password", &"********")
            .field("otp_secret", &"********")
            .field("log_level", &self.log_level)
            .field("screenshot_dir", &self.screenshot_dir)
            .finish()
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Configuration(format!(
            "Missing required environment variable: {}. Please ensure your .env file or environment contains {}",
            name, name
        ))),
    }
}

/// Make a relative screenshot directory explicit against the working
/// directory so logs and artifacts carry a full path.
fn resolve_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.to_path_buf())
    }
}
