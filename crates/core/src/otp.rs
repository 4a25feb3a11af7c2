//! TOTP code generation for the two-factor challenge

use std::time::{SystemTime, UNIX_EPOCH};

use totp_rs::{Algorithm, Secret, TOTP};
use tracing::debug;

use crate::error::{Error, Result};

/// Digits per generated code.
const DIGITS: usize = 6;

/// Code time step in seconds.
const STEP_SECONDS: u64 = 30;

/// Generate a 6-digit TOTP code for the current time.
///
/// The code is recomputed fresh on every call, never cached; a code is
/// only valid within its 30-second window.
pub fn generate(secret_b32: &str) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::OtpGeneration(e.to_string()))?
        .as_secs();
    generate_at(secret_b32, now)
}

/// Generate a 6-digit TOTP code for a fixed Unix timestamp.
pub fn generate_at(secret_b32: &str, timestamp: u64) -> Result<String> {
    if secret_b32.trim().is_empty() {
        return Err(Error::Configuration(
            "OTP_SECRET is not configured".to_string(),
        ));
    }

    let secret = Secret::Encoded(secret_b32.trim().to_string())
        .to_bytes()
        .map_err(|e| Error::OtpGeneration(format!("Invalid base32 secret: {}", e)))?;

    let totp = TOTP::new(Algorithm::SHA1, DIGITS, 1, STEP_SECONDS, secret)
        .map_err(|e| Error::OtpGeneration(e.to_string()))?;

    let code = totp.generate(timestamp);
    if code.len() != DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::OtpGeneration(format!(
            "Generated invalid OTP code: {}",
            code
        )));
    }

    debug!("OTP code generated: {}****", &code[..2]);
    Ok(code)
}
