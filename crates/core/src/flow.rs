//! End-to-end renewal flow

use std::path::PathBuf;

use tracing::info;

use crate::browser::PageDriver;
use crate::config::Config;
use crate::error::Result;
use crate::pages::LoginPage;

/// Outcome of a completed renewal run.
#[derive(Debug)]
pub struct RenewalReport {
    /// Hostname that was renewed.
    pub hostname: String,
    /// Screenshot path, when capture succeeded.
    pub screenshot: Option<PathBuf>,
}

/// Drive the full renewal: login, two-factor verification, hostname
/// lookup, renewal confirmation. The first stage failure aborts the run.
pub async fn run(driver: &dyn PageDriver, config: &Config) -> Result<RenewalReport> {
    info!("Starting renewal for hostname '{}'", config.dns_hostname);

    let login = LoginPage::new(driver, config).navigate().await?;
    let verify = login.login().await?;
    let dashboard = verify.enter_auth_code().await?;
    let records = dashboard.open_dns_record().await?;
    let screenshot = records.renew_hostname().await?;

    info!("Renewal completed for hostname '{}'", config.dns_hostname);
    Ok(RenewalReport {
        hostname: config.dns_hostname.clone(),
        screenshot,
    })
}
