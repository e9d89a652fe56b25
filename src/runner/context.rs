use std::path::{Path, PathBuf};

/// Runtime information shared by every case of one run
pub struct RunContext {
    /// Session identifier shown in the console and the JSON/JUnit reports
    pub session_id: String,

    /// Output directory for reports and diagnostic snapshots
    pub output_dir: PathBuf,
}

impl RunContext {
    pub fn new(output_dir: &Path) -> Self {
        // Snapshot and report writes under this directory will fail as well
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            log::warn!(
                "Could not create output directory {}: {}",
                output_dir.display(),
                e
            );
        }

        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Get output path for a file
    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let dir = std::env::temp_dir().join(format!("attendance-ctx-{}", uuid::Uuid::new_v4()));
        let context = RunContext::new(&dir);

        assert!(dir.is_dir());
        assert_eq!(context.output_path("report.csv"), dir.join("report.csv"));
        assert_eq!(context.session_id.len(), 36);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_uncreatable_output_dir_does_not_panic() {
        let file = std::env::temp_dir().join(format!("attendance-file-{}", uuid::Uuid::new_v4()));
        std::fs::write(&file, b"not a directory").unwrap();

        let context = RunContext::new(&file.join("reports"));
        assert!(!context.output_dir.is_dir());
        assert_eq!(context.output_path("a.csv"), file.join("reports").join("a.csv"));

        std::fs::remove_file(&file).ok();
    }
}
