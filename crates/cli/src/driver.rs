//! WebDriver-backed page driver
//!
//! Translates the semantic operations the page controllers need into
//! WebDriver commands via thirtyfour. Text and role locators become
//! XPath because the wire protocol has no text or role engines of its
//! own, and the settle wait polls `document.readyState` because the
//! protocol exposes no network-idle signal.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{debug, trace};

use noip_renew_core::{Error, Locator, PageDriver, Result, Role};

/// Poll interval for visibility and settle waits.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Grace period that lets a just-triggered navigation leave the old
/// document before the settle poll starts.
const SETTLE_GRACE: Duration = Duration::from_millis(500);

/// Page driver over a live WebDriver session.
pub struct WebDriverPage {
    driver: WebDriver,
}

impl WebDriverPage {
    /// Wrap an established WebDriver session.
    pub fn new(driver: WebDriver) -> Self {
        Self { driver }
    }

    fn by(locator: &Locator) -> By {
        match locator {
            Locator::Css(selector) => By::Css(selector),
            Locator::Text(text) => {
                let xpath = format!(
                    "//*[normalize-space(text())={}]",
                    xpath_literal(text)
                );
                By::XPath(&xpath)
            }
            Locator::Role { role, name } => {
                let lit = xpath_literal(name);
                let xpath = match role {
                    Role::Button => format!(
                        "//button[normalize-space(.)={lit}] \
                         | //input[(@type='submit' or @type='button') and @value={lit}] \
                         | //*[@role='button' and normalize-space(.)={lit}]"
                    ),
                    Role::Heading => format!(
                        "//*[self::h1 or self::h2 or self::h3 or self::h4 or self::h5 \
                         or self::h6 or @role='heading'][normalize-space(.)={lit}]"
                    ),
                };
                By::XPath(&xpath)
            }
        }
    }

    /// True when the current document reports `readyState == "complete"`.
    /// Script failures count as not settled; navigations tear down the
    /// script context mid-flight.
    async fn ready_state_complete(&self) -> bool {
        match self
            .driver
            .execute("return document.readyState;", vec![])
            .await
        {
            Ok(ret) => ret.json().as_str() == Some("complete"),
            Err(e) => {
                trace!("readyState check failed: {}", e);
                false
            }
        }
    }

    /// True when at least one matching element is displayed. Element
    /// checks that fail (stale handles mid-render) count as not visible.
    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let elems = self
            .driver
            .find_all(Self::by(locator))
            .await
            .map_err(driver_err)?;
        for elem in elems {
            if elem.is_displayed().await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()> {
        debug!("goto {}", url);
        match tokio::time::timeout(timeout, self.driver.goto(url)).await {
            Ok(result) => result.map_err(driver_err),
            Err(_) => Err(Error::Timeout {
                seconds: timeout.as_secs(),
            }),
        }
    }

    async fn wait_settled(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        tokio::time::sleep(SETTLE_GRACE.min(timeout)).await;

        loop {
            if self.ready_state_complete().await {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        trace!("wait_visible {}", locator);
        let deadline = Instant::now() + timeout;

        loop {
            if self.is_visible(locator).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    seconds: timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        let elems = self
            .driver
            .find_all(Self::by(locator))
            .await
            .map_err(driver_err)?;
        Ok(elems.len())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        trace!("fill {}", locator);
        let elem = self
            .driver
            .find(Self::by(locator))
            .await
            .map_err(driver_err)?;
        elem.clear().await.map_err(driver_err)?;
        elem.send_keys(value).await.map_err(driver_err)
    }

    async fn fill_nth(&self, locator: &Locator, index: usize, value: &str) -> Result<()> {
        let elems = self
            .driver
            .find_all(Self::by(locator))
            .await
            .map_err(driver_err)?;
        let elem = elems.get(index).ok_or_else(|| {
            Error::Driver(format!("No element at index {} for {}", index, locator))
        })?;
        elem.clear().await.map_err(driver_err)?;
        elem.send_keys(value).await.map_err(driver_err)
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        trace!("click {}", locator);
        let elem = self
            .driver
            .find(Self::by(locator))
            .await
            .map_err(driver_err)?;
        elem.click().await.map_err(driver_err)
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.driver.screenshot(path).await.map_err(driver_err)
    }
}

fn driver_err(e: WebDriverError) -> Error {
    Error::Driver(e.to_string())
}

/// Quote a string as an XPath 1.0 literal. XPath has no escape syntax,
/// so values containing both quote kinds need concat().
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
