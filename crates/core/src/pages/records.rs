//! Records stage

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, error, info, warn};

use crate::browser::{Locator, PageDriver, Role, SETTLE_TIMEOUT, VISIBILITY_TIMEOUT};
use crate::config::Config;
use crate::error::{Error, Result};

/// Controller for a hostname's DNS records page.
pub struct RecordsPage<'a> {
    driver: &'a dyn PageDriver,
    config: &'a Config,
    confirm_button: Locator,
}

impl<'a> RecordsPage<'a> {
    /// Wait for the expiration banner and build the controller.
    ///
    /// A banner that never shows usually means the hostname is not
    /// expiring within the renewal window, which this flow treats as
    /// terminal.
    pub(crate) async fn new(driver: &'a dyn PageDriver, config: &'a Config) -> Result<Self> {
        let banner = Locator::css(format!(
            "[id=\"expiration-banner-hostname-{}\"]",
            config.dns_hostname
        ));

        debug!(
            "Checking for expiration banner for '{}'...",
            config.dns_hostname
        );
        match driver.wait_visible(&banner, VISIBILITY_TIMEOUT).await {
            Ok(()) => info!(
                "Expiration banner found for hostname '{}'",
                config.dns_hostname
            ),
            Err(e) if e.is_timeout() => {
                warn!(
                    "Expiration banner not found for '{}'",
                    config.dns_hostname
                );
                return Err(Error::ExpirationNotFound {
                    hostname: config.dns_hostname.clone(),
                });
            }
            Err(e) => return Err(e),
        }

        Ok(Self {
            driver,
            config,
            confirm_button: Locator::role(Role::Button, "Confirm"),
        })
    }

    /// Confirm the renewal, then capture a best-effort screenshot.
    ///
    /// Returns the screenshot path when one was written. Screenshot
    /// failure is logged and swallowed; it never fails the renewal.
    pub async fn renew_hostname(self) -> Result<Option<PathBuf>> {
        debug!("Clicking confirm button to renew hostname...");
        match self.confirm().await {
            Ok(()) => info!("Hostname renewal confirmed"),
            Err(e) if e.is_timeout() => {
                error!("Confirm button timeout");
                return Err(Error::Renewal(
                    "Failed to confirm hostname renewal - page timeout".to_string(),
                ));
            }
            Err(e) => {
                error!("Confirm button click failed: {}", e);
                return Err(Error::Renewal(format!(
                    "Failed to click confirm button: {}",
                    e
                )));
            }
        }

        match self.capture_screenshot().await {
            Ok(path) => Ok(Some(path)),
            Err(e) => {
                warn!("Screenshot capture failed: {}", e);
                Ok(None)
            }
        }
    }

    async fn confirm(&self) -> Result<()> {
        self.driver.click(&self.confirm_button).await?;
        self.driver.wait_settled(SETTLE_TIMEOUT).await
    }

    async fn capture_screenshot(&self) -> Result<PathBuf> {
        let path = screenshot_path(&self.config.screenshot_dir, Local::now());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Screenshot(e.to_string()))?;
        }

        debug!("Saving screenshot to: {}", path.display());
        self.driver
            .screenshot(&path)
            .await
            .map_err(|e| Error::Screenshot(e.to_string()))?;
        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }
}

/// Screenshot path for a renewal captured at `now`, minute resolution.
fn screenshot_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("dns_renewal_{}.png", now.format("%Y-%m-%d_%H-%M")))
}
