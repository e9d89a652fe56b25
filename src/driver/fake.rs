//! In-memory stand-in for the deployed attendance page
//!
//! Models the frame nesting, the form fields and the validation messages the
//! real form renders into its status region, so everything above the driver
//! can be exercised without a browser.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::driver::traits::{BrowserSession, Locator};
use crate::error::HarnessError;
use crate::utils::config::Locators;

pub const FAKE_LATITUDE: &str = "12.9716";
pub const FAKE_LONGITUDE: &str = "77.5946";

#[derive(Default)]
struct PageState {
    /// 0 = top document, 1 = outer frame, 2 = inner frame
    depth: usize,
    values: HashMap<String, String>,
    status: String,
    /// `get_text` reads left before `pending_status` replaces "Processing..."
    status_lag: u32,
    pending_status: Option<String>,
    /// `get_value` reads left before the location callback fills coordinates
    location_lag: u32,
    location_pending: bool,
    signed_in: HashSet<String>,
    navigations: u32,
    clicks: Vec<String>,
    screenshots: Vec<PathBuf>,
}

/// Scripted attendance page implementing [`BrowserSession`]
pub struct FakeAttendancePage {
    locators: Locators,
    title: String,
    /// Elements the page never renders, keyed by `Locator` display string
    missing: HashSet<String>,
    /// Rendered elements whose clicks do nothing
    inert: HashSet<String>,
    /// Reads before a status or location update becomes visible
    lag: u32,
    state: Mutex<PageState>,
}

impl FakeAttendancePage {
    pub fn new() -> Self {
        Self {
            locators: Locators::default(),
            title: "Attendance Tracking System".to_string(),
            missing: HashSet::new(),
            inert: HashSet::new(),
            lag: 0,
            state: Mutex::new(PageState::default()),
        }
    }

    /// Never render `locator`
    pub fn without(mut self, locator: &Locator) -> Self {
        self.missing.insert(locator.to_string());
        self
    }

    /// Render `locator` but drop every click on it
    pub fn ignoring_clicks_on(mut self, locator: &Locator) -> Self {
        self.inert.insert(locator.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Delay async page updates by `reads` polls
    pub fn with_lag(mut self, reads: u32) -> Self {
        self.lag = reads;
        self
    }

    pub fn navigations(&self) -> u32 {
        self.state.lock().unwrap().navigations
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().screenshots.clone()
    }

    /// Put a value into a field as if the user had typed it
    pub fn prefill(&self, locator: &Locator, value: &str) {
        let mut state = self.state.lock().unwrap();
        state.values.insert(locator.to_string(), value.to_string());
    }

    fn field_locators(&self) -> [&Locator; 5] {
        let l = &self.locators;
        [&l.email, &l.name, &l.description, &l.latitude, &l.longitude]
    }

    fn elements_at(&self, depth: usize) -> Vec<&Locator> {
        let l = &self.locators;
        match depth {
            0 => vec![&l.outer_frame],
            1 => vec![&l.inner_frame],
            _ => {
                let mut all = vec![
                    &l.form,
                    &l.location_button,
                    &l.sign_in,
                    &l.sign_out,
                    &l.status,
                ];
                all.extend(self.field_locators());
                all
            }
        }
    }

    fn exists(&self, state: &PageState, locator: &Locator) -> bool {
        !self.missing.contains(&locator.to_string())
            && self.elements_at(state.depth).contains(&locator)
    }

    fn require(&self, state: &PageState, locator: &Locator) -> Result<()> {
        if self.exists(state, locator) {
            Ok(())
        } else {
            Err(HarnessError::ElementNotFound(locator.to_string()).into())
        }
    }

    fn value_of(&self, state: &PageState, locator: &Locator) -> String {
        state
            .values
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Server-side validation the form applies on submit
    fn validate(&self, state: &PageState) -> Option<String> {
        let l = &self.locators;
        let email = self.value_of(state, &l.email);
        let name = self.value_of(state, &l.name);
        let latitude = self.value_of(state, &l.latitude);
        let longitude = self.value_of(state, &l.longitude);

        if email.trim().is_empty() || name.trim().is_empty() {
            return Some("Please enter both Email and Name.".to_string());
        }
        let valid_email = email
            .split_once('@')
            .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid_email {
            return Some("Please enter a valid email address.".to_string());
        }
        if latitude.is_empty() || longitude.is_empty() {
            return Some("Location not captured. Click Get Location first.".to_string());
        }
        let in_range = match (latitude.parse::<f64>(), longitude.parse::<f64>()) {
            (Ok(lat), Ok(lon)) => (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon),
            _ => false,
        };
        if !in_range {
            return Some("Invalid location coordinates.".to_string());
        }
        None
    }

    fn submit(&self, state: &mut PageState, sign_in: bool) {
        let email = self.value_of(state, &self.locators.email).to_lowercase();
        let outcome = match self.validate(state) {
            Some(error) => error,
            None if sign_in => {
                state.signed_in.insert(email);
                "Sign in successful!".to_string()
            }
            None => {
                if state.signed_in.remove(&email) {
                    "Sign out successful!".to_string()
                } else {
                    "No active login found for today.".to_string()
                }
            }
        };

        if self.lag == 0 {
            state.status = outcome;
        } else {
            state.status = "Processing...".to_string();
            state.pending_status = Some(outcome);
            state.status_lag = self.lag;
        }
    }

    fn fill_location(&self, state: &mut PageState) {
        let l = &self.locators;
        state
            .values
            .insert(l.latitude.to_string(), FAKE_LATITUDE.to_string());
        state
            .values
            .insert(l.longitude.to_string(), FAKE_LONGITUDE.to_string());
        state.location_pending = false;
    }
}

#[async_trait]
impl BrowserSession for FakeAttendancePage {
    fn browser_name(&self) -> &str {
        "fake"
    }

    async fn navigate(&self, _url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.depth = 0;
        state.values.clear();
        state.status.clear();
        state.pending_status = None;
        state.location_pending = false;
        state.navigations += 1;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.title.clone())
    }

    async fn wait_for_element(&self, locator: &Locator, _timeout_ms: u64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.exists(&state, locator))
    }

    async fn wait_for_clickable(&self, locator: &Locator, _timeout_ms: u64) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.exists(&state, locator))
    }

    async fn is_present(&self, locator: &Locator) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.exists(&state, locator))
    }

    async fn enter_frame(&self, locator: &Locator) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        if state.depth >= 2 {
            anyhow::bail!("Element {} does not hold a frame", locator);
        }
        state.depth += 1;
        Ok(())
    }

    async fn exit_frames(&self) -> Result<()> {
        self.state.lock().unwrap().depth = 0;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        state.clicks.push(locator.to_string());
        if self.inert.contains(&locator.to_string()) {
            return Ok(());
        }

        let l = &self.locators;
        if locator == &l.sign_in {
            self.submit(&mut state, true);
        } else if locator == &l.sign_out {
            self.submit(&mut state, false);
        } else if locator == &l.location_button {
            if self.lag == 0 {
                self.fill_location(&mut state);
            } else {
                state.location_pending = true;
                state.location_lag = self.lag;
            }
            state.status = "Location captured.".to_string();
        }
        Ok(())
    }

    async fn clear(&self, locator: &Locator) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        state.values.insert(locator.to_string(), String::new());
        Ok(())
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        state
            .values
            .entry(locator.to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn set_value(&self, locator: &Locator, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        state.values.insert(locator.to_string(), value.to_string());
        Ok(())
    }

    async fn get_value(&self, locator: &Locator) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        if state.location_pending {
            if state.location_lag == 0 {
                self.fill_location(&mut state);
            } else {
                state.location_lag -= 1;
            }
        }
        Ok(self.value_of(&state, locator))
    }

    async fn get_text(&self, locator: &Locator) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        self.require(&state, locator)?;
        if locator != &self.locators.status {
            return Ok(String::new());
        }
        if state.pending_status.is_some() {
            if state.status_lag == 0 {
                let next = state.pending_status.take().unwrap_or_default();
                state.status = next;
            } else {
                state.status_lag -= 1;
            }
        }
        Ok(state.status.clone())
    }

    async fn take_screenshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, b"\x89PNG fake")?;
        self.state.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn page_source(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        Ok(format!(
            "<html><body data-depth=\"{}\">{}</body></html>",
            state.depth, state.status
        ))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
