//! Configuration for the scanning pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SweepError};

/// Dash-like code points. Accepted between the endpoints of a numeric range
/// in rule-row text, and inside candidate numbers as delimiters.
pub const DASH_CHARS: &[char] = &['-', '–', '‑', '‐', '᠆', '﹣', '－', '⁃', '−'];

/// Non-dash delimiter characters tolerated inside candidate numbers.
pub const DELIMITER_CHARS: &[char] = &[' ', '\t', ',', 'x'];

/// Scanning and pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Minimum digit count for a candidate.
    pub min_digits: usize,

    /// Maximum digit count for a candidate.
    pub max_digits: usize,

    /// Delimiters tolerated between candidate digits, in addition to `dashes`.
    pub delimiters: Vec<char>,

    /// Dash-like code points, also tolerated between candidate digits.
    pub dashes: Vec<char>,

    /// Characters of context captured on each side of a match.
    pub context_len: usize,

    /// Worker pool size. `None` uses the available parallelism.
    pub workers: Option<usize>,

    /// Completed-document count between progress notifications.
    pub progress_interval: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_digits: 12,
            max_digits: 19,
            delimiters: DELIMITER_CHARS.to_vec(),
            dashes: DASH_CHARS.to_vec(),
            context_len: 20,
            workers: None,
            progress_interval: 20,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| SweepError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| SweepError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the configuration for values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.min_digits == 0 || self.min_digits > self.max_digits {
            return Err(SweepError::Config(format!(
                "invalid digit bounds {}..={}",
                self.min_digits, self.max_digits
            )));
        }
        if self.progress_interval == 0 {
            return Err(SweepError::Config(
                "progress interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_digits, 12);
        assert_eq!(config.max_digits, 19);
        assert_eq!(config.context_len, 20);
        assert_eq!(config.progress_interval, 20);
    }

    #[test]
    fn test_rejects_reversed_bounds() {
        let config = ScanConfig {
            min_digits: 20,
            max_digits: 12,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_progress_interval() {
        let config = ScanConfig {
            progress_interval: 0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"min_digits": 13}"#).unwrap();
        assert_eq!(config.min_digits, 13);
        assert_eq!(config.max_digits, 19);
    }
}
