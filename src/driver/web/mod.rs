pub mod driver;

pub use driver::{BrowserType, GeoPoint, WebDriver, WebDriverConfig};
