use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::driver::traits::Locator;
use crate::driver::web::{BrowserType, GeoPoint, WebDriverConfig};
use crate::runner::fixtures::{default_fixtures, Fixture};

pub const DEFAULT_APP_URL: &str = "https://script.google.com/macros/s/AKfycbzWKHMP6tORLC-KpWSP1db1HIqP1yMTFVLy4SuyJS4u5O3HhRIJDz5CkFbRBiVAeJfB/exec";

/// Harness configuration
///
/// Loaded from an optional YAML file; every key falls back to its default,
/// then `ATTENDANCE_*` environment variables and CLI flags are applied on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Deployed attendance form
    pub app_url: String,

    /// Text the top-level document title must contain
    pub page_title: String,

    pub browser: BrowserSettings,
    pub locators: Locators,
    pub timeouts: Timeouts,

    /// Upper bound for navigation to form-ready, in seconds
    pub load_threshold_secs: f64,

    pub expectations: Expectations,
    pub fixtures: Vec<Fixture>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            app_url: DEFAULT_APP_URL.to_string(),
            page_title: "Attendance Tracking System".to_string(),
            browser: BrowserSettings::default(),
            locators: Locators::default(),
            timeouts: Timeouts::default(),
            load_threshold_secs: 5.0,
            expectations: Expectations::default(),
            fixtures: default_fixtures(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration, falling back to defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("ATTENDANCE_APP_URL") {
            if !url.trim().is_empty() {
                self.app_url = url;
            }
        }
        if let Ok(v) = std::env::var("ATTENDANCE_HEADLESS") {
            self.browser.headless = v == "true" || v == "1";
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_url.trim().is_empty() {
            anyhow::bail!("appUrl must not be empty");
        }
        // Sign-in and sign-out scenarios use the first two students
        if self.fixtures.len() < 2 {
            anyhow::bail!(
                "At least 2 fixtures are required, found {}",
                self.fixtures.len()
            );
        }
        if self.timeouts.poll_interval_ms == 0 {
            anyhow::bail!("timeouts.pollIntervalMs must be greater than zero");
        }
        if self.load_threshold_secs <= 0.0 {
            anyhow::bail!("loadThresholdSecs must be positive");
        }
        Ok(())
    }
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowserSettings {
    pub browser: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub geolocation: Option<GeoPoint>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        let driver = WebDriverConfig::default();
        Self {
            browser: driver.browser_type,
            headless: driver.headless,
            viewport_width: driver.viewport_width,
            viewport_height: driver.viewport_height,
            geolocation: Some(GeoPoint {
                latitude: 12.9716,
                longitude: 77.5946,
            }),
        }
    }
}

impl BrowserSettings {
    pub fn to_driver_config(&self) -> WebDriverConfig {
        WebDriverConfig {
            browser_type: self.browser,
            headless: self.headless,
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            geolocation: self.geolocation,
        }
    }
}

/// Where things live in the page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Locators {
    pub outer_frame: Locator,
    pub inner_frame: Locator,
    pub form: Locator,
    pub email: Locator,
    pub name: Locator,
    pub description: Locator,
    pub latitude: Locator,
    pub longitude: Locator,
    pub location_button: Locator,
    pub sign_in: Locator,
    pub sign_out: Locator,
    pub status: Locator,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            outer_frame: Locator::id("sandboxFrame"),
            inner_frame: Locator::id("userHtmlFrame"),
            form: Locator::id("attendanceForm"),
            email: Locator::id("Email"),
            name: Locator::id("Name"),
            description: Locator::id("Description"),
            latitude: Locator::id("Latitude"),
            longitude: Locator::id("Longitude"),
            location_button: Locator::id("locationBtn"),
            sign_in: Locator::xpath("//button[contains(@class, 'btn-login')]"),
            sign_out: Locator::xpath("//button[contains(@class, 'btn-logout')]"),
            status: Locator::id("status"),
        }
    }
}

/// Wait bounds, all in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timeouts {
    /// Each frame container and the form marker
    pub frame_ms: u64,
    /// Form fields and the location button
    pub field_ms: u64,
    /// Ceiling for the status region to show an expected phrase
    pub status_ms: u64,
    /// Ceiling for the geolocation callback to fill the coordinates
    pub location_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            frame_ms: 30_000,
            field_ms: 10_000,
            status_ms: 5_000,
            location_ms: 5_000,
            poll_interval_ms: 200,
        }
    }
}

/// Acceptable status phrases per scenario, matched case-insensitively
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expectations {
    pub sign_in_success: Vec<String>,
    pub sign_out_success: Vec<String>,
    pub missing_credentials: Vec<String>,
    pub invalid_email: Vec<String>,
    pub missing_name: Vec<String>,
    pub invalid_location: Vec<String>,
}

impl Default for Expectations {
    fn default() -> Self {
        fn phrases(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            sign_in_success: phrases(&["success", "processing", "location captured"]),
            sign_out_success: phrases(&["success", "no active login", "processing"]),
            missing_credentials: phrases(&["email", "name"]),
            invalid_email: phrases(&["email"]),
            missing_name: phrases(&["name"]),
            invalid_location: phrases(&["location"]),
        }
    }
}
