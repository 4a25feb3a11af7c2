//! No-IP renewal runner
//!
//! Loads configuration from the environment, opens a WebDriver session
//! and drives the renewal flow against the No-IP web console.

use std::path::PathBuf;

use clap::Parser;
use thirtyfour::prelude::*;
use tracing::{error, info, warn};

mod driver;
mod logging;

use driver::WebDriverPage;
use noip_renew_core::{flow, Config};

#[derive(Parser)]
#[command(name = "noip-renew")]
#[command(about = "Renews an expiring No-IP dynamic DNS hostname")]
#[command(version)]
struct Cli {
    /// WebDriver endpoint (chromedriver, selenium, ...)
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    webdriver: String,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    /// Directory for the detailed log file
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Disable the log file, console logging only
    #[arg(long)]
    no_log_file: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Config carries the log level, so it loads before logging starts.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    let log_dir = if cli.no_log_file {
        None
    } else {
        Some(cli.log_dir.as_path())
    };
    let _guard = logging::init(&config.log_level, log_dir);

    info!("noip-renew v{}", noip_renew_core::VERSION);
    config.log_summary();

    let mut caps = DesiredCapabilities::chrome();
    if cli.headless {
        caps.set_headless()?;
    }

    info!("Connecting to WebDriver at {}", cli.webdriver);
    let session = WebDriver::new(cli.webdriver.as_str(), caps).await?;
    let page = WebDriverPage::new(session.clone());

    let outcome = flow::run(&page, &config).await;

    // The session is closed whatever the outcome; a failed run must not
    // leave a browser behind.
    if let Err(e) = session.quit().await {
        warn!("Failed to close WebDriver session: {}", e);
    }

    match outcome {
        Ok(report) => {
            match &report.screenshot {
                Some(path) => info!(
                    "Renewed '{}', screenshot at {}",
                    report.hostname,
                    path.display()
                ),
                None => info!("Renewed '{}' (no screenshot captured)", report.hostname),
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
