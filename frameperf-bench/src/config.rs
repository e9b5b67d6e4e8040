//! Benchmark run configuration.

use crate::{BenchError, BenchResult, DEFAULT_TEST_TRIALS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one benchmark run. Every field has a default, so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Trials per operation.
    pub trials: u32,
    /// Height of the generated base dataset.
    pub rows: usize,
    /// Seed for the dataset generator.
    pub seed: u64,
    /// Registry names of the operations to benchmark, in run order.
    pub operations: Vec<String>,
    /// Directory for CSV and JSON exports.
    pub export: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TEST_TRIALS,
            rows: 10_000,
            seed: 42,
            operations: vec![
                "rows.identity".to_string(),
                "eager.identity".to_string(),
                "lazy.collect".to_string(),
            ],
            export: None,
        }
    }
}

impl BenchConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml(path: &Path) -> BenchResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BenchError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> BenchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reject settings that would produce a degenerate run.
    pub fn validate(&self) -> BenchResult<()> {
        if self.trials == 0 {
            return Err(BenchError::InvalidTrialCount(self.trials));
        }
        if self.rows == 0 {
            return Err(BenchError::Config("rows must be positive".into()));
        }
        if self.operations.is_empty() {
            return Err(BenchError::NoOperations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.trials, DEFAULT_TEST_TRIALS);
        assert_eq!(cfg.operations.len(), 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = BenchConfig::from_toml_str(
            r#"
trials = 5
operations = ["lazy.collect"]
"#,
        )
        .unwrap();

        assert_eq!(cfg.trials, 5);
        assert_eq!(cfg.operations, vec!["lazy.collect".to_string()]);
        assert_eq!(cfg.rows, 10_000);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.export, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = BenchConfig::from_toml_str("trails = 5").unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_degenerate_runs() {
        let cfg = BenchConfig {
            trials: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::InvalidTrialCount(0))));

        let cfg = BenchConfig {
            rows: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::Config(_))));

        let cfg = BenchConfig {
            operations: Vec::new(),
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::NoOperations)));
    }

    #[test]
    fn test_load_toml_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rows = 250\nseed = 7\nexport = \"out\"").unwrap();

        let cfg = BenchConfig::load_toml(file.path()).unwrap();
        assert_eq!(cfg.rows, 250);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.export, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = BenchConfig::load_toml(Path::new("/nonexistent/frameperf.toml")).unwrap_err();
        assert!(err.to_string().contains("frameperf.toml"));
    }
}
