use thiserror::Error;

/// Failure raised while driving the attendance form.
///
/// `Assertion` is a test failure; every other variant is an error in the
/// unittest sense (the case could not reach its assertion).
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("{0}")]
    Assertion(String),

    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

impl HarnessError {
    pub fn timeout(what: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout_ms,
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, HarnessError::Assertion(_))
    }
}

pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Fail the current case with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> HarnessResult<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::Assertion(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure() {
        assert!(ensure(true, "unused").is_ok());
        let err = ensure(false, "Form not found on page").unwrap_err();
        assert!(err.is_assertion());
        assert_eq!(err.to_string(), "Form not found on page");
    }

    #[test]
    fn test_timeout_message() {
        let err = HarnessError::timeout("id=sandboxFrame", 30000);
        assert!(!err.is_assertion());
        assert_eq!(
            err.to_string(),
            "Timed out after 30000ms waiting for id=sandboxFrame"
        );
    }
}
