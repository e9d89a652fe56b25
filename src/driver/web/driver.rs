//! Browser session implementation using Playwright
//!
//! Frames are tracked explicitly: `enter_frame` resolves the frame element's
//! content frame and every later lookup runs against it until the next
//! `navigate` or `exit_frames`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use playwright::api::frame::FrameState;
use playwright::api::{Browser, BrowserContext, ElementHandle, Frame, Page, Viewport};
use playwright::Playwright;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::driver::traits::{BrowserSession, Locator};
use crate::error::HarnessError;

/// Web browser type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserType {
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "firefox" => BrowserType::Firefox,
            "webkit" => BrowserType::Webkit,
            _ => BrowserType::Chromium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserType::Chromium => "chromium",
            BrowserType::Firefox => "firefox",
            BrowserType::Webkit => "webkit",
        }
    }
}

/// Mocked position handed to the page's geolocation API
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Web Driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Position reported by `navigator.geolocation`; None leaves permission ungranted
    pub geolocation: Option<GeoPoint>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        let headless = std::env::var("ATTENDANCE_HEADLESS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            browser_type: BrowserType::Chromium,
            headless,
            viewport_width: 1920,
            viewport_height: 1080,
            geolocation: None,
        }
    }
}

/// Browser session driven through Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Playwright,
    browser: Browser,
    #[allow(dead_code)]
    context: BrowserContext,
    page: Page,
    /// Innermost frame entered; None means the top-level document
    frame: Mutex<Option<Frame>>,
    config: WebDriverConfig,
}

impl WebDriver {
    /// Launch a browser and open a blank page
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let browser = match config.browser_type {
            BrowserType::Chromium => launch_chromium_browser(&playwright.chromium(), &config).await?,
            BrowserType::Firefox => {
                playwright
                    .firefox()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
            BrowserType::Webkit => {
                playwright
                    .webkit()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
        };

        let context = browser.context_builder().build().await?;

        if let Some(point) = config.geolocation {
            let permissions = vec!["geolocation".to_string()];
            context.grant_permissions(&permissions, None).await?;
            context
                .set_geolocation(Some(&playwright::api::Geolocation {
                    latitude: point.latitude,
                    longitude: point.longitude,
                    accuracy: Some(10.0),
                }))
                .await?;
            debug!(
                "Geolocation mocked at {}, {}",
                point.latitude, point.longitude
            );
        }

        let page = context.new_page().await?;
        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        info!(
            "Launched {} ({}x{}, headless: {})",
            config.browser_type.as_str(),
            config.viewport_width,
            config.viewport_height,
            config.headless
        );

        Ok(Self {
            playwright,
            browser,
            context,
            page,
            frame: Mutex::new(None),
            config,
        })
    }

    async fn current_frame(&self) -> Frame {
        let frame = self.frame.lock().await;
        frame.clone().unwrap_or_else(|| self.page.main_frame())
    }

    async fn find(&self, locator: &Locator) -> Result<ElementHandle> {
        let frame = self.current_frame().await;
        let sel = to_playwright_selector(locator);
        frame
            .query_selector(&sel)
            .await?
            .ok_or_else(|| HarnessError::ElementNotFound(locator.to_string()).into())
    }
}

#[async_trait]
impl BrowserSession for WebDriver {
    fn browser_name(&self) -> &str {
        self.config.browser_type.as_str()
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto_builder(url)
            .goto()
            .await
            .context("Failed to navigate to URL")?;
        *self.frame.lock().await = None;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.page.title().await?)
    }

    async fn wait_for_element(&self, locator: &Locator, timeout_ms: u64) -> Result<bool> {
        let frame = self.current_frame().await;
        let sel = to_playwright_selector(locator);

        let result = frame
            .wait_for_selector_builder(&sel)
            .state(FrameState::Attached)
            .timeout(timeout_ms as f64)
            .wait_for_selector()
            .await;

        if let Err(ref e) = result {
            debug!("wait for {} ended without match: {:?}", locator, e);
        }
        Ok(result.is_ok())
    }

    async fn wait_for_clickable(&self, locator: &Locator, timeout_ms: u64) -> Result<bool> {
        let start = Instant::now();
        let sel = to_playwright_selector(locator);

        while start.elapsed() < Duration::from_millis(timeout_ms) {
            let frame = self.current_frame().await;
            if let Some(el) = frame.query_selector(&sel).await? {
                if el.is_visible().await? && el.is_enabled().await? {
                    return Ok(true);
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Ok(false)
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool> {
        let frame = self.current_frame().await;
        let sel = to_playwright_selector(locator);
        Ok(frame.query_selector(&sel).await?.is_some())
    }

    async fn enter_frame(&self, locator: &Locator) -> Result<()> {
        let el = self.find(locator).await?;
        let inner = el
            .content_frame()
            .await?
            .ok_or_else(|| anyhow::anyhow!("Element {} does not hold a frame", locator))?;
        *self.frame.lock().await = Some(inner);
        debug!("Entered frame {}", locator);
        Ok(())
    }

    async fn exit_frames(&self) -> Result<()> {
        *self.frame.lock().await = None;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let el = self.find(locator).await?;
        el.click_builder()
            .click()
            .await
            .with_context(|| format!("Failed to click {}", locator))?;
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> Result<()> {
        let el = self.find(locator).await?;
        el.fill_builder("").fill().await?;
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let el = self.find(locator).await?;
        el.fill_builder(text).fill().await?;
        Ok(())
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> Result<()> {
        // Presence check first so a missing field reports ElementNotFound
        self.find(locator).await?;
        let frame = self.current_frame().await;
        let sel = to_playwright_selector(locator);
        let js = "(el, v) => { el.value = v; el.dispatchEvent(new Event('input', { bubbles: true })); }";
        frame
            .evaluate_on_selector::<_, ()>(&sel, js, Some(value.to_string()))
            .await?;
        Ok(())
    }

    async fn get_value(&self, locator: &Locator) -> Result<String> {
        self.find(locator).await?;
        let frame = self.current_frame().await;
        let sel = to_playwright_selector(locator);
        let value: String = frame
            .evaluate_on_selector(&sel, "el => el.value ?? ''", None::<String>)
            .await?;
        Ok(value)
    }

    async fn get_text(&self, locator: &Locator) -> Result<String> {
        let el = self.find(locator).await?;
        Ok(el.inner_text().await?)
    }

    async fn take_screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        self.page
            .screenshot_builder()
            .path(path.to_path_buf())
            .screenshot()
            .await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        let frame = self.current_frame().await;
        Ok(frame.content().await?)
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        info!("Browser closed");
        Ok(())
    }
}

/// Convert a Locator to a Playwright selector string
pub fn to_playwright_selector(locator: &Locator) -> String {
    match locator {
        Locator::Id(id) => format!("id={}", id),
        Locator::XPath(xpath) => format!("xpath={}", xpath),
    }
}

/// Launch Chromium, preferring an installed Chrome over Playwright's bundle
async fn launch_chromium_browser(
    chromium: &playwright::api::BrowserType,
    config: &WebDriverConfig,
) -> Result<Browser> {
    let mut launcher = chromium.launcher();
    launcher = launcher.headless(config.headless);

    let env_path = std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
        .ok()
        .map(PathBuf::from);
    let system_path = find_system_browser();

    if let Some(ref path) = env_path {
        info!("Using browser from env: {}", path.display());
        launcher = launcher.executable(path);
    } else if let Some(ref path) = system_path {
        info!("Using discovered browser: {}", path.display());
        launcher = launcher.executable(path);
    } else {
        warn!("No browser executable found. Attempting default launch");
    }

    let args: Vec<String> = [
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    launcher = launcher.args(&args);

    Ok(launcher.launch().await?)
}

fn find_system_browser() -> Option<PathBuf> {
    let common_paths = [
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    common_paths
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}
