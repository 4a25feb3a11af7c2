//! Renewal flow scenarios driven against a scripted in-memory page.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use noip_renew_core::{flow, Config, Error, Locator, PageDriver, Result};

const OTP_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

/// Scripted page. Settle results are consumed in call order, locators
/// listed in `never_visible` time out, fills and clicks matching
/// `unfillable`/`unclickable` fail with driver errors, and every
/// interaction is recorded for later assertions.
#[derive(Default)]
struct FakePage {
    settle_results: Mutex<VecDeque<Result<()>>>,
    never_visible: Vec<String>,
    unfillable: Vec<String>,
    unclickable: Vec<String>,
    otp_boxes: usize,
    goto_times_out: bool,
    fail_screenshot: bool,
    visits: Mutex<Vec<String>>,
    fills: Mutex<Vec<(String, String)>>,
    nth_fills: Mutex<Vec<(usize, String)>>,
    clicks: Mutex<Vec<String>>,
    screenshots: Mutex<Vec<PathBuf>>,
}

impl FakePage {
    /// A page where every stage succeeds.
    fn happy() -> Self {
        FakePage {
            otp_boxes: 6,
            ..Default::default()
        }
    }

    fn queue_settles(&self, results: Vec<Result<()>>) {
        *self.settle_results.lock().unwrap() = results.into();
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<()> {
        if self.goto_times_out {
            return Err(Error::Timeout { seconds: 30 });
        }
        self.visits.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_settled(&self, _timeout: Duration) -> Result<()> {
        match self.settle_results.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(()),
        }
    }

    async fn wait_visible(&self, locator: &Locator, _timeout: Duration) -> Result<()> {
        let rendered = locator.to_string();
        if self.never_visible.iter().any(|gone| rendered.contains(gone)) {
            return Err(Error::Timeout { seconds: 10 });
        }
        Ok(())
    }

    async fn count(&self, _locator: &Locator) -> Result<usize> {
        Ok(self.otp_boxes)
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        let rendered = locator.to_string();
        if self.unfillable.iter().any(|bad| rendered.contains(bad)) {
            return Err(Error::Driver("element not interactable".to_string()));
        }
        self.fills.lock().unwrap().push((rendered, value.to_string()));
        Ok(())
    }

    async fn fill_nth(&self, _locator: &Locator, index: usize, value: &str) -> Result<()> {
        self.nth_fills
            .lock()
            .unwrap()
            .push((index, value.to_string()));
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let rendered = locator.to_string();
        if self.unclickable.iter().any(|bad| rendered.contains(bad)) {
            return Err(Error::Driver("element not interactable".to_string()));
        }
        self.clicks.lock().unwrap().push(rendered);
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        if self.fail_screenshot {
            return Err(Error::Driver("session lost".to_string()));
        }
        std::fs::write(path, b"png")?;
        self.screenshots.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn test_config(screenshot_dir: &Path) -> Config {
    Config::from_lookup(|name| match name {
        "DNS_HOSTNAME" => Some("example.ddns.net".to_string()),
        "NOIP_USERNAME" => Some("user@example.com".to_string()),
        "NOIP_PASSWORD" => Some("hunter2".to_string()),
        "OTP_SECRET" => Some(OTP_SECRET.to_string()),
        "SCREENSHOT_DIR" => Some(screenshot_dir.display().to_string()),
        _ => None,
    })
    .expect("test config should load")
}

#[tokio::test]
async fn test_renewal_happy_path() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    let config = test_config(dir.path());

    let report = flow::run(&page, &config).await.unwrap();
    assert_eq!(report.hostname, "example.ddns.net");

    // One screenshot artifact, named by run timestamp.
    let screenshot = report.screenshot.expect("screenshot should be captured");
    assert!(screenshot.exists());
    let name = screenshot.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("dns_renewal_"), "name was {}", name);
    assert!(name.ends_with(".png"), "name was {}", name);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(*page.screenshots.lock().unwrap(), vec![screenshot.clone()]);

    // Single navigation to the login page.
    assert_eq!(
        *page.visits.lock().unwrap(),
        vec!["https://www.noip.com/login".to_string()]
    );

    // Credentials went into the login form fields.
    assert_eq!(
        *page.fills.lock().unwrap(),
        vec![
            ("css=#username".to_string(), "user@example.com".to_string()),
            ("css=#password".to_string(), "hunter2".to_string()),
        ]
    );

    // Stages clicked in pipeline order.
    assert_eq!(
        *page.clicks.lock().unwrap(),
        vec![
            "role=button[name=Log In]".to_string(),
            "role=button[name=Verify]".to_string(),
            "text=example.ddns.net".to_string(),
            "role=button[name=Confirm]".to_string(),
        ]
    );

    // Six OTP boxes filled left to right, one digit each.
    let nth_fills = page.nth_fills.lock().unwrap();
    assert_eq!(nth_fills.len(), 6);
    for (i, (index, value)) in nth_fills.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(value.len(), 1);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }
}

#[tokio::test]
async fn test_hostname_missing_aborts_before_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.never_visible.push("text=example.ddns.net".to_string());
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::HostnameNotFound { hostname }) => assert_eq!(hostname, "example.ddns.net"),
        other => panic!("expected HostnameNotFound, got {:?}", other),
    }

    // The records stage was never reached.
    let clicks = page.clicks.lock().unwrap();
    assert!(!clicks.iter().any(|c| c.contains("Confirm")));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_screenshot_failure_does_not_fail_renewal() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.fail_screenshot = true;
    let config = test_config(dir.path());

    let report = flow::run(&page, &config).await.unwrap();
    assert_eq!(report.hostname, "example.ddns.net");
    assert!(report.screenshot.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_blank_credentials_rejected_before_page_touch() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    let mut config = test_config(dir.path());
    config.noip_username = String::new();

    match flow::run(&page, &config).await {
        Err(Error::Configuration(msg)) => {
            assert!(msg.contains("Username or password"), "msg was {}", msg)
        }
        other => panic!("expected Configuration, got {:?}", other),
    }

    // Nothing was typed into the login form.
    assert!(page.fills.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_otp_secret_aborts_verification() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    let mut config = test_config(dir.path());
    config.otp_secret = "not base32!!".to_string();

    match flow::run(&page, &config).await {
        Err(Error::OtpGeneration(_)) => {}
        other => panic!("expected OtpGeneration, got {:?}", other),
    }

    // The code is generated before any box is touched or Verify clicked.
    assert!(page.nth_fills.lock().unwrap().is_empty());
    let clicks = page.clicks.lock().unwrap();
    assert!(!clicks.iter().any(|c| c.contains("Verify")));
}

#[tokio::test]
async fn test_no_otp_boxes_is_page_structure_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.otp_boxes = 0;
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::PageStructure(msg)) => {
            assert!(msg.contains("No OTP input fields found"), "msg was {}", msg)
        }
        other => panic!("expected PageStructure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_wrong_otp_box_count_names_count() {
    for boxes in [5usize, 7] {
        let dir = tempfile::tempdir().unwrap();
        let mut page = FakePage::happy();
        page.otp_boxes = boxes;
        let config = test_config(dir.path());

        match flow::run(&page, &config).await {
            Err(Error::PageStructure(msg)) => {
                assert!(msg.contains("Expected 6"), "msg was {}", msg);
                assert!(msg.contains(&format!("found {}", boxes)), "msg was {}", msg);
            }
            other => panic!("expected PageStructure for {} boxes, got {:?}", boxes, other),
        }
    }
}

#[tokio::test]
async fn test_missing_2fa_heading_is_page_structure_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.never_visible
        .push("Two-Factor Authentication".to_string());
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::PageStructure(msg)) => {
            assert!(msg.contains("Failed to reach 2FA page"), "msg was {}", msg)
        }
        other => panic!("expected PageStructure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_expiration_banner_missing_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.never_visible
        .push("expiration-banner-hostname-example.ddns.net".to_string());
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::ExpirationNotFound { hostname }) => assert_eq!(hostname, "example.ddns.net"),
        other => panic!("expected ExpirationNotFound, got {:?}", other),
    }

    // Renewal was never confirmed.
    let clicks = page.clicks.lock().unwrap();
    assert!(!clicks.iter().any(|c| c.contains("Confirm")));
}

#[tokio::test]
async fn test_goto_timeout_is_navigation_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.goto_times_out = true;
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Navigation(msg)) => {
            assert!(msg.contains("internet connection"), "msg was {}", msg)
        }
        other => panic!("expected Navigation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_login_page_is_navigation_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    page.queue_settles(vec![Err(Error::Timeout { seconds: 30 })]);
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Navigation(msg)) => {
            assert!(msg.contains("internet connection"), "msg was {}", msg)
        }
        other => panic!("expected Navigation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_login_submit_is_authentication_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    page.queue_settles(vec![Ok(()), Err(Error::Timeout { seconds: 15 })]);
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Authentication) => {}
        other => panic!("expected Authentication, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_fill_failure_is_submission_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.unfillable.push("css=#password".to_string());
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Submission(msg)) => {
            assert!(msg.contains("element not interactable"), "msg was {}", msg)
        }
        other => panic!("expected Submission, got {:?}", other),
    }

    // The first field was filled; the submit click was never reached.
    assert_eq!(
        *page.fills.lock().unwrap(),
        vec![("css=#username".to_string(), "user@example.com".to_string())]
    );
    assert!(page.clicks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_verify_submit_is_verification_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    page.queue_settles(vec![Ok(()), Ok(()), Err(Error::Timeout { seconds: 15 })]);
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Verification) => {}
        other => panic!("expected Verification, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_record_open_is_navigation_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    page.queue_settles(vec![
        Ok(()),
        Ok(()),
        Ok(()),
        Err(Error::Timeout { seconds: 15 }),
    ]);
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Navigation(msg)) => {
            assert!(msg.contains("Failed to open DNS record"), "msg was {}", msg)
        }
        other => panic!("expected Navigation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_confirm_is_renewal_error() {
    let dir = tempfile::tempdir().unwrap();
    let page = FakePage::happy();
    page.queue_settles(vec![
        Ok(()),
        Ok(()),
        Ok(()),
        Ok(()),
        Err(Error::Timeout { seconds: 15 }),
    ]);
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Renewal(msg)) => assert!(msg.contains("page timeout"), "msg was {}", msg),
        other => panic!("expected Renewal, got {:?}", other),
    }

    // Failure happened after the confirm click, before any screenshot.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_confirm_click_failure_is_renewal_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut page = FakePage::happy();
    page.unclickable.push("role=button[name=Confirm]".to_string());
    let config = test_config(dir.path());

    match flow::run(&page, &config).await {
        Err(Error::Renewal(msg)) => assert!(
            msg.contains("Failed to click confirm button"),
            "msg was {}",
            msg
        ),
        other => panic!("expected Renewal, got {:?}", other),
    }

    // The renewal never completed, so no artifact was written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
