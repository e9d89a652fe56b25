use regex::Regex;
use std::path::Path;

use crate::driver::traits::BrowserSession;
use crate::error::{ensure, HarnessError, HarnessResult};
use crate::page::diagnostics::{self, PERFORMANCE_ERROR};
use crate::page::{AttendanceForm, Field, FrameNavigator};
use crate::utils::config::HarnessConfig;

/// What a case does once the form is ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    PageLoads,
    FormElementsExist,
    SignIn,
    SignOut,
    SignInRequiresCredentials,
    SignOutRequiresCredentials,
    LocationUpdatesFields,
    InvalidEmail,
    MissingName,
    InvalidLocation,
    PageLoadPerformance,
}

#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    pub id: &'static str,
    pub name: &'static str,
    /// Verbose label printed by the console listener
    pub method: &'static str,
    pub kind: CaseKind,
}

/// All cases in execution order
pub const TEST_CASES: [TestCase; 11] = [
    TestCase {
        id: "TC_01",
        name: "Page Loading Test",
        method: "test_01_page_loads_correctly",
        kind: CaseKind::PageLoads,
    },
    TestCase {
        id: "TC_02",
        name: "Form Elements Test",
        method: "test_02_form_elements_exist",
        kind: CaseKind::FormElementsExist,
    },
    TestCase {
        id: "TC_03",
        name: "Sign In Test",
        method: "test_03_successful_sign_in",
        kind: CaseKind::SignIn,
    },
    TestCase {
        id: "TC_04",
        name: "Sign Out Test",
        method: "test_04_successful_sign_out",
        kind: CaseKind::SignOut,
    },
    TestCase {
        id: "TC_05",
        name: "Sign In Empty Fields Test",
        method: "test_05_sign_in_requires_email_and_name",
        kind: CaseKind::SignInRequiresCredentials,
    },
    TestCase {
        id: "TC_06",
        name: "Sign Out Empty Fields Test",
        method: "test_06_sign_out_requires_email_and_name",
        kind: CaseKind::SignOutRequiresCredentials,
    },
    TestCase {
        id: "TC_07",
        name: "Get Location Updates Fields Test",
        method: "test_07_get_location_button_updates_fields",
        kind: CaseKind::LocationUpdatesFields,
    },
    TestCase {
        id: "TC_08",
        name: "Invalid Email Validation",
        method: "test_08_invalid_email",
        kind: CaseKind::InvalidEmail,
    },
    TestCase {
        id: "TC_09",
        name: "Missing Name Validation",
        method: "test_09_missing_name",
        kind: CaseKind::MissingName,
    },
    TestCase {
        id: "TC_10",
        name: "Invalid Location Validation",
        method: "test_10_invalid_location",
        kind: CaseKind::InvalidLocation,
    },
    TestCase {
        id: "TC_11",
        name: "Page Load Performance Test",
        method: "test_11_page_load_performance",
        kind: CaseKind::PageLoadPerformance,
    },
];

/// Cases whose id matches `filter`, in declared order
pub fn select(filter: Option<&Regex>) -> Vec<&'static TestCase> {
    TEST_CASES
        .iter()
        .filter(|case| filter.map_or(true, |re| re.is_match(case.id)))
        .collect()
}

/// Everything a case body may touch
pub struct CaseContext<'a> {
    pub session: &'a dyn BrowserSession,
    pub config: &'a HarnessConfig,
    pub output_dir: &'a Path,
}

impl<'a> CaseContext<'a> {
    pub fn form(&self) -> AttendanceForm<'a> {
        AttendanceForm::new(self.session, self.config)
    }

    pub fn navigator(&self) -> FrameNavigator<'a> {
        FrameNavigator::new(self.session, self.config)
    }
}

impl TestCase {
    /// Run the case body against a form that is already loaded and cleared
    ///
    /// Returns the comment recorded with a PASS.
    pub async fn run(&self, ctx: &CaseContext<'_>) -> HarnessResult<String> {
        let form = ctx.form();
        let expect = &ctx.config.expectations;
        let locators = &ctx.config.locators;

        match self.kind {
            CaseKind::PageLoads => {
                let title = ctx.session.title().await?;
                let expected = &ctx.config.page_title;
                ensure(
                    title.contains(expected.as_str()),
                    format!("'{}' not found in '{}'", expected, title),
                )?;
                ensure(
                    form.is_present(&locators.form).await?,
                    "Form not found on page",
                )?;
            }

            CaseKind::FormElementsExist => {
                let required = [
                    (&locators.email, "Email field not found"),
                    (&locators.name, "Name field not found"),
                    (&locators.description, "Description field not found"),
                    (&locators.latitude, "Latitude field not found"),
                    (&locators.longitude, "Longitude field not found"),
                    (&locators.location_button, "Get Location button not found"),
                    (&locators.sign_in, "Sign In button not found"),
                    (&locators.sign_out, "Sign Out button not found"),
                ];
                for (locator, message) in required {
                    ensure(form.is_present(locator).await?, message)?;
                }
            }

            CaseKind::SignIn => {
                form.fill(&ctx.config.fixtures[0], true).await?;
                let status = form.sign_in(&expect.sign_in_success).await?;
                ensure(
                    status.shows_any(&expect.sign_in_success),
                    "Sign In status message not found",
                )?;
            }

            CaseKind::SignOut => {
                form.fill(&ctx.config.fixtures[1], true).await?;
                let status = form.sign_out(&expect.sign_out_success).await?;
                ensure(
                    status.shows_any(&expect.sign_out_success),
                    "Sign Out status message not found",
                )?;
            }

            CaseKind::SignInRequiresCredentials => {
                let status = form.sign_in(&expect.missing_credentials).await?;
                ensure(
                    status.shows_any(&expect.missing_credentials),
                    "Sign In did not show error for missing Email or Name",
                )?;
            }

            CaseKind::SignOutRequiresCredentials => {
                let status = form.sign_out(&expect.missing_credentials).await?;
                ensure(
                    status.shows_any(&expect.missing_credentials),
                    "Sign Out did not show error for missing Email or Name",
                )?;
            }

            CaseKind::LocationUpdatesFields => {
                form.click(&locators.location_button).await?;
                form.wait_for_coordinates().await?;
                let latitude = form.field_value(Field::Latitude).await?;
                let longitude = form.field_value(Field::Longitude).await?;
                ensure(
                    !latitude.is_empty() && !longitude.is_empty(),
                    "Latitude and Longitude fields were not updated after clicking 'Get Location'",
                )?;
            }

            CaseKind::InvalidEmail => {
                let fixture = ctx.config.fixtures[0].with_email("invalid-email");
                form.fill(&fixture, true).await?;
                let status = form.sign_in(&expect.invalid_email).await?;
                ensure(
                    status.shows_any(&expect.invalid_email),
                    "Email validation error message not found",
                )?;
            }

            CaseKind::MissingName => {
                let fixture = ctx.config.fixtures[0].with_name("");
                form.fill(&fixture, true).await?;
                let status = form.sign_in(&expect.missing_name).await?;
                ensure(
                    status.shows_any(&expect.missing_name),
                    "Name validation error message not found",
                )?;
            }

            CaseKind::InvalidLocation => {
                let fixture = ctx.config.fixtures[0].with_coordinates("999", "999");
                form.fill(&fixture, false).await?;
                form.set_coordinates(&fixture.latitude, &fixture.longitude)
                    .await?;
                let status = form.sign_in(&expect.invalid_location).await?;
                ensure(
                    status.shows_any(&expect.invalid_location),
                    "Location validation error message not found",
                )?;
            }

            CaseKind::PageLoadPerformance => return page_load_performance(ctx).await,
        }

        Ok(String::new())
    }
}

async fn page_load_performance(ctx: &CaseContext<'_>) -> HarnessResult<String> {
    let threshold = ctx.config.load_threshold_secs;

    let elapsed = match ctx.navigator().open(&ctx.config.app_url).await {
        Ok(elapsed) => elapsed,
        Err(e) => {
            diagnostics::capture(ctx.session, ctx.output_dir, PERFORMANCE_ERROR).await;
            log::error!("Could not reach the form while timing page load: {}", e);
            return Err(e);
        }
    };

    let load_time = elapsed.as_secs_f64();
    if load_time <= threshold {
        Ok(format!(
            "Load time: {:.2}s (Threshold: {:.1}s)",
            load_time, threshold
        ))
    } else {
        Err(HarnessError::Assertion(format!(
            "Load time: {:.2}s exceeds threshold of {:.1}s",
            load_time, threshold
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakeAttendancePage;
    use crate::utils::config::HarnessConfig;

    fn fast_config() -> HarnessConfig {
        let mut config = HarnessConfig::default();
        config.timeouts.status_ms = 200;
        config.timeouts.location_ms = 200;
        config.timeouts.poll_interval_ms = 1;
        config
    }

    fn case(id: &str) -> &'static TestCase {
        TEST_CASES.iter().find(|c| c.id == id).unwrap()
    }

    async fn run(page: &FakeAttendancePage, config: &HarnessConfig, id: &str) -> HarnessResult<String> {
        let dir = std::env::temp_dir();
        let ctx = CaseContext {
            session: page,
            config,
            output_dir: &dir,
        };
        ctx.navigator().open(&config.app_url).await?;
        ctx.form().clear_all_fields().await;
        case(id).run(&ctx).await
    }

    #[test]
    fn test_case_table() {
        let ids: Vec<_> = TEST_CASES.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 11);
        assert_eq!(ids[0], "TC_01");
        assert_eq!(ids[10], "TC_11");
        assert!(TEST_CASES.iter().all(|c| c.method.starts_with("test_")));
    }

    #[test]
    fn test_select_filters_by_id() {
        assert_eq!(select(None).len(), 11);

        let re = Regex::new("^TC_0[3-5]$").unwrap();
        let picked: Vec<_> = select(Some(&re)).iter().map(|c| c.id).collect();
        assert_eq!(picked, vec!["TC_03", "TC_04", "TC_05"]);
    }

    #[tokio::test]
    async fn test_page_loads() {
        let page = FakeAttendancePage::new();
        assert_eq!(run(&page, &fast_config(), "TC_01").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_page_loads_wrong_title() {
        let page = FakeAttendancePage::new().with_title("Google Apps Script");
        let err = run(&page, &fast_config(), "TC_01").await.unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(
            err.to_string(),
            "'Attendance Tracking System' not found in 'Google Apps Script'"
        );
    }

    #[tokio::test]
    async fn test_form_elements_missing_sign_out() {
        let config = fast_config();
        let page = FakeAttendancePage::new().without(&config.locators.sign_out);
        let err = run(&page, &config, "TC_02").await.unwrap_err();
        assert_eq!(err.to_string(), "Sign Out button not found");
    }

    #[tokio::test]
    async fn test_sign_in_and_sign_out() {
        let page = FakeAttendancePage::new().with_lag(2);
        let config = fast_config();

        run(&page, &config, "TC_03").await.unwrap();
        run(&page, &config, "TC_04").await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_in_without_effect_fails() {
        let config = fast_config();
        let page = FakeAttendancePage::new().ignoring_clicks_on(&config.locators.sign_in);

        let err = run(&page, &config, "TC_03").await.unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Sign In status message not found");
        assert!(page.clicks().contains(&config.locators.sign_in.to_string()));
    }

    #[tokio::test]
    async fn test_sign_out_without_login_still_passes() {
        let page = FakeAttendancePage::new();
        run(&page, &fast_config(), "TC_04").await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_form_is_rejected() {
        let page = FakeAttendancePage::new();
        let config = fast_config();
        run(&page, &config, "TC_05").await.unwrap();
        run(&page, &config, "TC_06").await.unwrap();
    }

    #[tokio::test]
    async fn test_location_fills_coordinates() {
        let page = FakeAttendancePage::new().with_lag(3);
        run(&page, &fast_config(), "TC_07").await.unwrap();
    }

    #[tokio::test]
    async fn test_validation_cases() {
        let page = FakeAttendancePage::new().with_lag(1);
        let config = fast_config();
        for id in ["TC_08", "TC_09", "TC_10"] {
            run(&page, &config, id).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_unexpected_status_fails_with_message() {
        let mut config = fast_config();
        config.expectations.invalid_email = vec!["correo".to_string()];
        let page = FakeAttendancePage::new();

        let err = run(&page, &config, "TC_08").await.unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Email validation error message not found");
    }

    #[tokio::test]
    async fn test_page_load_within_threshold() {
        let page = FakeAttendancePage::new();
        let comment = run(&page, &fast_config(), "TC_11").await.unwrap();
        assert!(comment.starts_with("Load time: 0.0"));
        assert!(comment.ends_with("(Threshold: 5.0s)"));
        assert_eq!(page.navigations(), 2);
    }

    #[tokio::test]
    async fn test_page_load_over_threshold() {
        let mut config = fast_config();
        config.load_threshold_secs = 1e-9;
        let page = FakeAttendancePage::new();

        let err = run(&page, &config, "TC_11").await.unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("exceeds threshold of 0.0s"));
    }
}
