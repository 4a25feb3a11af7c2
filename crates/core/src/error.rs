//! Error types for the renewal flow

use thiserror::Error;

/// Result type alias using the renewal Error
pub type Result<T> = std::result::Result<T, Error>;

/// Renewal flow error types
///
/// Every stage failure is fatal to the run and carries a user-facing
/// message. `Timeout` and `Driver` are raised by the browser engine;
/// the stages translate them into the context-specific kinds above.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Login failed or took too long. Please verify credentials are correct.")]
    Authentication,

    #[error("Failed to submit login form: {0}")]
    Submission(String),

    #[error("Page structure error: {0}")]
    PageStructure(String),

    #[error("Failed to generate OTP: {0}")]
    OtpGeneration(String),

    #[error("Failed to fill OTP input field {index}: {reason}")]
    FieldFill { index: usize, reason: String },

    #[error("Verify button click failed or page took too long to load. OTP may be incorrect or expired.")]
    Verification,

    #[error("DNS hostname '{hostname}' not found on dashboard. Please verify the hostname exists in your No-IP account.")]
    HostnameNotFound { hostname: String },

    #[error("Expiration banner not found for hostname '{hostname}'. The hostname might already be renewed or not expiring within 7 days.")]
    ExpirationNotFound { hostname: String },

    #[error("Renewal error: {0}")]
    Renewal(String),

    #[error("Screenshot save failed: {0}")]
    Screenshot(String),

    #[error("Operation timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("WebDriver error: {0}")]
    Driver(String),
}

impl Error {
    /// True for timeouts raised by the browser engine.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
