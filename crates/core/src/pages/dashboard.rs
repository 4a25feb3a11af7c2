//! Dashboard stage

use tracing::{debug, error, info};

use crate::browser::{Locator, PageDriver, SETTLE_TIMEOUT, VISIBILITY_TIMEOUT};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pages::RecordsPage;

/// Controller for the account dashboard.
pub struct DashboardPage<'a> {
    driver: &'a dyn PageDriver,
    config: &'a Config,
    hostname_link: Locator,
}

impl<'a> DashboardPage<'a> {
    /// Build the dashboard controller. The hostname link is only
    /// located here; nothing is asserted until `open_dns_record`.
    pub(crate) fn new(driver: &'a dyn PageDriver, config: &'a Config) -> Self {
        debug!(
            "Dashboard page initialized for hostname: {}",
            config.dns_hostname
        );
        Self {
            driver,
            config,
            hostname_link: Locator::text(config.dns_hostname.clone()),
        }
    }

    /// Click through to the DNS records page for the configured hostname.
    pub async fn open_dns_record(self) -> Result<RecordsPage<'a>> {
        debug!("Looking for hostname link: {}", self.config.dns_hostname);
        match self
            .driver
            .wait_visible(&self.hostname_link, VISIBILITY_TIMEOUT)
            .await
        {
            Ok(()) => info!("Hostname '{}' found on dashboard", self.config.dns_hostname),
            Err(e) if e.is_timeout() => {
                error!(
                    "Hostname '{}' not found on dashboard",
                    self.config.dns_hostname
                );
                return Err(Error::HostnameNotFound {
                    hostname: self.config.dns_hostname.clone(),
                });
            }
            Err(e) => return Err(e),
        }

        debug!("Clicking on hostname link...");
        match self.open().await {
            Ok(()) => {
                info!("Successfully navigated to DNS records page");
                RecordsPage::new(self.driver, self.config).await
            }
            Err(e) => {
                error!("Failed to open DNS record: {}", e);
                Err(Error::Navigation(format!(
                    "Failed to open DNS record: {}",
                    e
                )))
            }
        }
    }

    async fn open(&self) -> Result<()> {
        self.driver.click(&self.hostname_link).await?;
        self.driver.wait_settled(SETTLE_TIMEOUT).await
    }
}
