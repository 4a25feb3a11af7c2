//! Two-factor verification stage

use tracing::{debug, error, info};

use crate::browser::{Locator, PageDriver, Role, SETTLE_TIMEOUT, VISIBILITY_TIMEOUT};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::otp;
use crate::pages::DashboardPage;

/// Number of single-digit input boxes the challenge page renders.
const OTP_BOXES: usize = 6;

/// Controller for the two-factor challenge page.
pub struct VerifyPage<'a> {
    driver: &'a dyn PageDriver,
    config: &'a Config,
    verify_button: Locator,
    otp_inputs: Locator,
}

impl<'a> VerifyPage<'a> {
    /// Wait for the challenge page and build its controller.
    ///
    /// Blocks until the two-factor heading is visible. A heading that
    /// never appears usually means the login failed or the page layout
    /// changed.
    pub(crate) async fn new(driver: &'a dyn PageDriver, config: &'a Config) -> Result<Self> {
        let header = Locator::role(Role::Heading, "Two-Factor Authentication");

        debug!("Waiting for 2FA page to load...");
        match driver.wait_visible(&header, VISIBILITY_TIMEOUT).await {
            Ok(()) => info!("2FA page loaded successfully"),
            Err(e) if e.is_timeout() => {
                error!("Failed to reach 2FA page - page not found");
                return Err(Error::PageStructure(
                    "Failed to reach 2FA page. This might indicate incorrect login credentials or page structure change."
                        .to_string(),
                ));
            }
            Err(e) => return Err(e),
        }

        Ok(Self {
            driver,
            config,
            verify_button: Locator::role(Role::Button, "Verify"),
            otp_inputs: Locator::css("#totp-input input"),
        })
    }

    /// Generate a fresh code, type it into the six boxes and submit.
    pub async fn enter_auth_code(self) -> Result<DashboardPage<'a>> {
        let code = otp::generate(&self.config.otp_secret)?;

        let count = self.driver.count(&self.otp_inputs).await?;
        debug!("Found {} OTP input fields", count);

        if count == 0 {
            error!("No OTP input fields found on page");
            return Err(Error::PageStructure(
                "No OTP input fields found on page. Page structure may have changed.".to_string(),
            ));
        }
        if count != OTP_BOXES {
            error!("Expected {} OTP inputs, found {}", OTP_BOXES, count);
            return Err(Error::PageStructure(format!(
                "Expected {} OTP input fields, found {}. Page structure may have changed.",
                OTP_BOXES, count
            )));
        }

        debug!("Filling OTP input fields...");
        fill_otp_boxes(self.driver, &self.otp_inputs, &code).await?;
        info!("OTP entered successfully");

        debug!("Clicking verify button...");
        match self.submit().await {
            Ok(()) => {
                info!("2FA verification successful, redirected to dashboard");
                Ok(DashboardPage::new(self.driver, self.config))
            }
            Err(e) if e.is_timeout() => {
                error!("Verify button timeout - OTP may be incorrect or expired");
                Err(Error::Verification)
            }
            Err(e) => Err(e),
        }
    }

    async fn submit(&self) -> Result<()> {
        self.driver.click(&self.verify_button).await?;
        self.driver.wait_settled(SETTLE_TIMEOUT).await
    }
}

/// Type `code` into the discrete OTP boxes, one digit per box, in code
/// order. A failing box is reported 1-indexed.
pub(crate) async fn fill_otp_boxes(
    driver: &dyn PageDriver,
    inputs: &Locator,
    code: &str,
) -> Result<()> {
    for i in 0..code.len() {
        let digit = &code[i..i + 1];
        if let Err(e) = driver.fill_nth(inputs, i, digit).await {
            error!("Failed to fill OTP field {}: {}", i + 1, e);
            return Err(Error::FieldFill {
                index: i + 1,
                reason: e.to_string(),
            });
        }
    }
    Ok(())
}
