//! Login stage

use tracing::{debug, error, info};

use crate::browser::{Locator, PageDriver, Role, NAVIGATION_TIMEOUT, SETTLE_TIMEOUT};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::pages::VerifyPage;

/// No-IP login page URL.
const LOGIN_URL: &str = "https://www.noip.com/login";

/// Controller for the No-IP login page.
pub struct LoginPage<'a> {
    driver: &'a dyn PageDriver,
    config: &'a Config,
    username_field: Locator,
    password_field: Locator,
    login_button: Locator,
}

impl<'a> LoginPage<'a> {
    /// Build the login controller. Nothing is checked until `navigate`.
    pub fn new(driver: &'a dyn PageDriver, config: &'a Config) -> Self {
        Self {
            driver,
            config,
            username_field: Locator::css("#username"),
            password_field: Locator::css("#password"),
            login_button: Locator::role(Role::Button, "Log In"),
        }
    }

    /// Load the login page and wait for it to settle.
    pub async fn navigate(self) -> Result<Self> {
        debug!("Navigating to No-IP login page...");
        match self.load().await {
            Ok(()) => {
                info!("Successfully loaded login page");
                Ok(self)
            }
            Err(e) if e.is_timeout() => {
                error!("Failed to load No-IP login page - timeout");
                Err(Error::Navigation(
                    "Failed to load No-IP login page. Please check your internet connection."
                        .to_string(),
                ))
            }
            Err(e) => {
                error!("Navigation failed: {}", e);
                Err(Error::Navigation(format!(
                    "Navigation to login page failed: {}",
                    e
                )))
            }
        }
    }

    /// Submit credentials and advance to the two-factor challenge.
    pub async fn login(self) -> Result<VerifyPage<'a>> {
        if self.config.noip_username.is_empty() || self.config.noip_password.is_empty() {
            error!("Username or password not configured");
            return Err(Error::Configuration(
                "Username or password not configured".to_string(),
            ));
        }

        debug!("Filling credentials for user: {}", self.config.noip_username);
        match self.submit().await {
            Ok(()) => {
                info!("Login successful, redirected to 2FA page");
                VerifyPage::new(self.driver, self.config).await
            }
            Err(e) if e.is_timeout() => {
                error!("Login timeout - credentials may be incorrect");
                Err(Error::Authentication)
            }
            Err(e) => {
                error!("Login submission failed: {}", e);
                Err(Error::Submission(e.to_string()))
            }
        }
    }

    async fn load(&self) -> Result<()> {
        self.driver.goto(LOGIN_URL, NAVIGATION_TIMEOUT).await?;
        self.driver.wait_settled(NAVIGATION_TIMEOUT).await
    }

    async fn submit(&self) -> Result<()> {
        self.driver
            .fill(&self.username_field, &self.config.noip_username)
            .await?;
        self.driver
            .fill(&self.password_field, &self.config.noip_password)
            .await?;
        self.driver.click(&self.login_button).await?;
        debug!("Login form submitted, waiting for page load...");
        self.driver.wait_settled(SETTLE_TIMEOUT).await
    }
}
