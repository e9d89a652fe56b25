use log::{debug, warn};
use std::time::{Duration, Instant};

use crate::driver::traits::{BrowserSession, Locator};
use crate::error::{HarnessError, HarnessResult};
use crate::runner::fixtures::Fixture;
use crate::utils::config::{HarnessConfig, Locators, Timeouts};

/// Text inputs of the attendance form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Name,
    Description,
    Latitude,
    Longitude,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Email,
        Field::Name,
        Field::Description,
        Field::Latitude,
        Field::Longitude,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
        }
    }

    pub fn locator<'l>(&self, locators: &'l Locators) -> &'l Locator {
        match self {
            Field::Email => &locators.email,
            Field::Name => &locators.name,
            Field::Description => &locators.description,
            Field::Latitude => &locators.latitude,
            Field::Longitude => &locators.longitude,
        }
    }

    /// The fixture value this field is filled with
    pub fn pick<'f>(&self, fixture: &'f Fixture) -> &'f str {
        match self {
            Field::Email => &fixture.email,
            Field::Name => &fixture.name,
            Field::Description => &fixture.description,
            Field::Latitude => &fixture.latitude,
            Field::Longitude => &fixture.longitude,
        }
    }
}

/// True when the lower-cased `text` contains any of `phrases`
pub fn matches_any(text: &str, phrases: &[String]) -> bool {
    let text = text.to_lowercase();
    phrases
        .iter()
        .any(|phrase| text.contains(&phrase.to_lowercase()))
}

/// Status text read after a submit click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Lower-cased status text
    pub text: String,
    /// False while the region still shows what it showed before the click
    pub changed: bool,
}

impl StatusUpdate {
    pub fn shows_any(&self, phrases: &[String]) -> bool {
        self.changed && matches_any(&self.text, phrases)
    }
}

/// Field-level interaction with the form inside the innermost frame
pub struct AttendanceForm<'a> {
    session: &'a dyn BrowserSession,
    locators: &'a Locators,
    timeouts: &'a Timeouts,
}

impl<'a> AttendanceForm<'a> {
    pub fn new(session: &'a dyn BrowserSession, config: &'a HarnessConfig) -> Self {
        Self {
            session,
            locators: &config.locators,
            timeouts: &config.timeouts,
        }
    }

    /// Empty every text field; fields that are not rendered are skipped
    pub async fn clear_all_fields(&self) {
        for field in Field::ALL {
            let locator = field.locator(self.locators);
            if let Err(e) = self.session.clear(locator).await {
                debug!("Skipping clear of {}: {}", field.label(), e);
            }
        }
    }

    /// Type the fixture's Email, Name and Description, optionally capturing location
    pub async fn fill(&self, fixture: &Fixture, capture_location: bool) -> HarnessResult<()> {
        debug!("Filling form with: {:?}", fixture);

        for field in [Field::Email, Field::Name, Field::Description] {
            let locator = field.locator(self.locators);
            if !self
                .session
                .wait_for_element(locator, self.timeouts.field_ms)
                .await?
            {
                return Err(HarnessError::timeout(
                    locator.to_string(),
                    self.timeouts.field_ms,
                ));
            }
            self.session.clear(locator).await?;
            self.session.type_text(locator, field.pick(fixture)).await?;
        }

        if capture_location {
            self.capture_location().await?;
        }
        Ok(())
    }

    /// Click the location button and wait for the coordinates to arrive
    ///
    /// Reaching the ceiling is not an error here; callers that care assert on
    /// the coordinates themselves.
    pub async fn capture_location(&self) -> HarnessResult<()> {
        let button = &self.locators.location_button;
        if !self
            .session
            .wait_for_clickable(button, self.timeouts.field_ms)
            .await?
        {
            return Err(HarnessError::timeout(
                format!("{} to be clickable", button),
                self.timeouts.field_ms,
            ));
        }
        self.session.click(button).await?;

        if !self.wait_for_coordinates().await? {
            warn!(
                "Coordinates still empty {}ms after requesting location",
                self.timeouts.location_ms
            );
        }
        Ok(())
    }

    /// Write Latitude/Longitude directly
    pub async fn set_coordinates(&self, latitude: &str, longitude: &str) -> HarnessResult<()> {
        self.session
            .set_value(&self.locators.latitude, latitude)
            .await?;
        self.session
            .set_value(&self.locators.longitude, longitude)
            .await?;
        Ok(())
    }

    /// Presence probe; a missing element is `false`, not an error
    pub async fn is_present(&self, locator: &Locator) -> HarnessResult<bool> {
        Ok(self.session.is_present(locator).await?)
    }

    pub async fn field_value(&self, field: Field) -> HarnessResult<String> {
        Ok(self
            .session
            .get_value(field.locator(self.locators))
            .await?)
    }

    pub async fn click(&self, locator: &Locator) -> HarnessResult<()> {
        Ok(self.session.click(locator).await?)
    }

    /// Click sign-in and wait for the status it produces
    pub async fn sign_in(&self, phrases: &[String]) -> HarnessResult<StatusUpdate> {
        self.submit(&self.locators.sign_in, phrases).await
    }

    /// Click sign-out and wait for the status it produces
    pub async fn sign_out(&self, phrases: &[String]) -> HarnessResult<StatusUpdate> {
        self.submit(&self.locators.sign_out, phrases).await
    }

    async fn submit(&self, button: &Locator, phrases: &[String]) -> HarnessResult<StatusUpdate> {
        let before = self.status_text().await?;
        self.click(button).await?;
        self.wait_for_status(&before, phrases).await
    }

    /// Lower-cased text of the status region
    pub async fn status_text(&self) -> HarnessResult<String> {
        let text = self.session.get_text(&self.locators.status).await?;
        Ok(text.to_lowercase())
    }

    /// Poll the status region until it replaces `previous` with one of `phrases`
    ///
    /// Text left over from before the click never counts as a match. At the
    /// ceiling the last text seen is returned as is.
    pub async fn wait_for_status(
        &self,
        previous: &str,
        phrases: &[String],
    ) -> HarnessResult<StatusUpdate> {
        let start = Instant::now();
        let ceiling = Duration::from_millis(self.timeouts.status_ms);

        loop {
            let text = self.status_text().await?;
            let update = StatusUpdate {
                changed: text != previous,
                text,
            };
            if update.shows_any(phrases) || start.elapsed() >= ceiling {
                debug!("Status after {:?}: {:?}", start.elapsed(), update);
                return Ok(update);
            }
            tokio::time::sleep(Duration::from_millis(self.timeouts.poll_interval_ms)).await;
        }
    }

    /// Poll until both coordinates are non-empty; false when the ceiling is hit
    pub async fn wait_for_coordinates(&self) -> HarnessResult<bool> {
        let start = Instant::now();
        let ceiling = Duration::from_millis(self.timeouts.location_ms);

        loop {
            let latitude = self.field_value(Field::Latitude).await?;
            let longitude = self.field_value(Field::Longitude).await?;
            if !latitude.is_empty() && !longitude.is_empty() {
                return Ok(true);
            }
            if start.elapsed() >= ceiling {
                return Ok(false);
            }
            tokio::time::sleep(Duration::from_millis(self.timeouts.poll_interval_ms)).await;
        }
    }
}
