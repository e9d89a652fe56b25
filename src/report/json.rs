use super::types::TestResults;
use anyhow::Result;
use std::path::Path;

/// Generate JSON report
pub fn generate(results: &TestResults, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;

    if let Some(path) = output {
        std::fs::write(path, json)?;
        println!("JSON report saved to: {}", path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

/// Load results saved by a previous run
pub fn load(path: &Path) -> Result<TestResults> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::sample_results;

    #[test]
    fn test_saved_results_load_back() {
        let path = std::env::temp_dir().join(format!("attendance-{}.json", uuid::Uuid::new_v4()));
        let results = sample_results();

        generate(&results, Some(&path)).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"Test ID\": \"SUMMARY\""));
        assert!(raw.contains("\"sessionId\": \"test-session\""));

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.outcomes, results.outcomes);
        assert_eq!(loaded.totals, results.totals);
        assert_eq!(loaded.errored, vec!["TC_04".to_string()]);

        std::fs::remove_file(&path).ok();
    }
}
