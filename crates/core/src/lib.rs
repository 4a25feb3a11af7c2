//! No-IP Renewal Core
//!
//! Page controllers and supporting pieces for renewing an expiring
//! dynamic DNS hostname through the No-IP web console: login, TOTP
//! two-factor verification, hostname lookup, renewal confirmation and
//! a proof screenshot.

pub mod browser;
pub mod config;
pub mod error;
pub mod flow;
pub mod otp;
pub mod pages;

// Re-export commonly used types
pub use browser::{Locator, PageDriver, Role};
pub use browser::{NAVIGATION_TIMEOUT, SETTLE_TIMEOUT, VISIBILITY_TIMEOUT};
pub use config::Config;
pub use error::{Error, Result};
pub use flow::{run, RenewalReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
