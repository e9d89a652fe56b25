use log::debug;
use std::time::{Duration, Instant};

use crate::driver::traits::{BrowserSession, Locator};
use crate::error::{HarnessError, HarnessResult};
use crate::utils::config::HarnessConfig;

/// Walks from the top-level document down to the form's frame
///
/// The form is served inside two nested frames (outer sandbox, inner user
/// frame). Every case starts from a fresh top-level navigation, so the descent
/// is repeated each time.
pub struct FrameNavigator<'a> {
    session: &'a dyn BrowserSession,
    outer: &'a Locator,
    inner: &'a Locator,
    form: &'a Locator,
    timeout_ms: u64,
}

impl<'a> FrameNavigator<'a> {
    pub fn new(session: &'a dyn BrowserSession, config: &'a HarnessConfig) -> Self {
        Self {
            session,
            outer: &config.locators.outer_frame,
            inner: &config.locators.inner_frame,
            form: &config.locators.form,
            timeout_ms: config.timeouts.frame_ms,
        }
    }

    /// Load `url` and descend to the form, returning how long it took
    pub async fn open(&self, url: &str) -> HarnessResult<Duration> {
        let start = Instant::now();
        self.session.navigate(url).await?;
        self.enter_form().await?;
        Ok(start.elapsed())
    }

    /// Enter both frames from the top-level document and wait for the form marker
    pub async fn enter_form(&self) -> HarnessResult<()> {
        self.session.exit_frames().await?;
        self.descend(self.outer).await?;
        self.descend(self.inner).await?;
        self.wait_for(self.form).await?;
        debug!("Form {} ready", self.form);
        Ok(())
    }

    async fn descend(&self, container: &Locator) -> HarnessResult<()> {
        self.wait_for(container).await?;
        self.session.enter_frame(container).await?;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator) -> HarnessResult<()> {
        if self
            .session
            .wait_for_element(locator, self.timeout_ms)
            .await?
        {
            Ok(())
        } else {
            Err(HarnessError::timeout(locator.to_string(), self.timeout_ms))
        }
    }
}
