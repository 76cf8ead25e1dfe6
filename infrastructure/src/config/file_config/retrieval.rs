//! Retrieval configuration from TOML (`[retrieval]` section)

use concierge_application::RetrievalParams;
use concierge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retrieval configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Minimum similarity score for a knowledge-store hit (0.0 - 1.0)
    pub similarity_threshold: f32,
    /// Documents requested from the knowledge store
    pub top_k: usize,
    /// Per-source timeout in seconds
    pub timeout_secs: u64,
    /// Web snippets requested on a knowledge-store miss
    pub web_max_results: usize,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        let defaults = RetrievalParams::default();
        Self {
            similarity_threshold: defaults.similarity_threshold,
            top_k: defaults.top_k,
            timeout_secs: defaults.source_timeout.as_secs(),
            web_max_results: defaults.web_max_results,
        }
    }
}

impl FileRetrievalConfig {
    /// Convert to [`RetrievalParams`], replacing out-of-range values with defaults.
    pub fn to_params(&self) -> (RetrievalParams, Vec<ConfigIssue>) {
        let mut params = RetrievalParams::default();
        let mut issues = Vec::new();

        if (0.0..=1.0).contains(&self.similarity_threshold) {
            params.similarity_threshold = self.similarity_threshold;
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "retrieval.similarity_threshold: {} is outside 0.0-1.0, using {}",
                    self.similarity_threshold, params.similarity_threshold
                ),
            ));
        }

        if self.top_k > 0 {
            params.top_k = self.top_k;
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!("retrieval.top_k must be at least 1, using {}", params.top_k),
            ));
        }

        if self.timeout_secs > 0 {
            params.source_timeout = Duration::from_secs(self.timeout_secs);
        } else {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange,
                format!(
                    "retrieval.timeout_secs must be at least 1, using {}",
                    params.source_timeout.as_secs()
                ),
            ));
        }

        params.web_max_results = self.web_max_results;
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_values_fall_back() {
        let config = FileRetrievalConfig {
            similarity_threshold: 1.5,
            top_k: 0,
            timeout_secs: 3,
            web_max_results: 2,
        };
        let (params, issues) = config.to_params();
        assert_eq!(issues.len(), 2);
        assert_eq!(params.similarity_threshold, 0.25);
        assert_eq!(params.top_k, 5);
        assert_eq!(params.source_timeout, Duration::from_secs(3));
        assert_eq!(params.web_max_results, 2);
    }
}
