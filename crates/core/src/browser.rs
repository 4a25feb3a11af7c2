//! Browser engine seam
//!
//! The renewal flow needs a handful of semantic operations from the
//! browser: navigate, settle, locate, fill, click, screenshot. The
//! `PageDriver` trait names exactly those, so the page controllers stay
//! independent of the engine that drives the real browser.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Bound on the initial page navigation.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Bound on post-action page settle waits.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

/// Bound on element visibility checks.
pub const VISIBILITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Accessibility roles used by role-based lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Button,
    Heading,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Heading => "heading",
        }
    }
}

/// How to find an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// Element whose visible text matches exactly.
    Text(String),
    /// Element with an accessibility role and accessible name.
    Role { role: Role, name: String },
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text(text.into())
    }

    pub fn role(role: Role, name: impl Into<String>) -> Self {
        Locator::Role {
            role,
            name: name.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css={}", selector),
            Locator::Text(text) => write!(f, "text={}", text),
            Locator::Role { role, name } => write!(f, "role={}[name={}]", role.as_str(), name),
        }
    }
}

/// Semantic browser operations required by the page controllers.
///
/// Every wait is bounded by the caller-supplied timeout; an elapsed
/// bound surfaces as `Error::Timeout` and the calling stage translates
/// it into its own error kind. "Settled" means the engine's best proxy
/// for "no further loading activity" on the current page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for the initial document.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait until the current page has settled after an action.
    async fn wait_settled(&self, timeout: Duration) -> Result<()>;

    /// Wait until an element matching `locator` is visible.
    async fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<()>;

    /// Number of elements currently matching `locator`.
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Replace the content of the element matching `locator` with `value`.
    async fn fill(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Fill the `index`-th (0-based) element matching `locator`.
    async fn fill_nth(&self, locator: &Locator, index: usize, value: &str) -> Result<()>;

    /// Click the element matching `locator`.
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Write a PNG screenshot of the current viewport to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;
}
