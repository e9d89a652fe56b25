use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Element locator: a lookup strategy paired with its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum Locator {
    /// Select by element id
    Id(String),
    /// Select by XPath expression
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn value(&self) -> &str {
        match self {
            Locator::Id(v) | Locator::XPath(v) => v,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::XPath(xpath) => write!(f, "xpath={}", xpath),
        }
    }
}

/// Browser automation session
///
/// All element operations act on the current interaction context: the
/// top-level document after `navigate`, or the innermost frame entered with
/// `enter_frame`. Operations on a missing element fail with
/// [`crate::error::HarnessError::ElementNotFound`]; `is_present` and the
/// `wait_*` probes report absence as `false` instead.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Get the browser name (e.g., "chromium")
    fn browser_name(&self) -> &str;

    /// Navigate the top-level document and reset the interaction context to it
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Title of the top-level document
    async fn title(&self) -> Result<String>;

    /// Wait for an element to be attached in the current context
    ///
    /// # Returns
    /// True if the element appeared, false if timeout
    async fn wait_for_element(&self, locator: &Locator, timeout_ms: u64) -> Result<bool>;

    /// Wait for an element to be visible and enabled
    async fn wait_for_clickable(&self, locator: &Locator, timeout_ms: u64) -> Result<bool>;

    /// Check if an element exists in the current context right now
    async fn is_present(&self, locator: &Locator) -> Result<bool>;

    /// Switch the interaction context into the frame held by `locator`
    async fn enter_frame(&self, locator: &Locator) -> Result<()>;

    /// Switch the interaction context back to the top-level document
    async fn exit_frames(&self) -> Result<()>;

    /// Click an element
    async fn click(&self, locator: &Locator) -> Result<()>;

    /// Clear the value of an input element
    async fn clear(&self, locator: &Locator) -> Result<()>;

    /// Type text into an input element
    async fn type_text(&self, locator: &Locator, text: &str) -> Result<()>;

    /// Assign an input's value directly, bypassing readonly state
    async fn set_value(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Current value of an input element
    async fn get_value(&self, locator: &Locator) -> Result<String>;

    /// Rendered text of an element
    async fn get_text(&self, locator: &Locator) -> Result<String>;

    /// Capture the viewport to a PNG file
    async fn take_screenshot(&self, path: &Path) -> Result<()>;

    /// Raw markup of the current interaction context
    async fn page_source(&self) -> Result<String>;

    /// Release the browser
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::id("Email").to_string(), "id=Email");
        assert_eq!(
            Locator::xpath("//button[contains(@class, 'btn-login')]").to_string(),
            "xpath=//button[contains(@class, 'btn-login')]"
        );
    }

    #[test]
    fn test_locator_from_yaml() {
        let locator: Locator = serde_yaml::from_str("{ by: xpath, value: '//button' }").unwrap();
        assert_eq!(locator, Locator::xpath("//button"));

        let locator: Locator = serde_yaml::from_str("by: id\nvalue: status\n").unwrap();
        assert_eq!(locator.value(), "status");
    }
}
