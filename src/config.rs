//! `tictoc.toml` configuration for the demo/bench caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Workload and instrumentation settings for the bench pipeline.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BenchConfig {
    /// How many times the pipeline runs per bench invocation.
    #[serde(default = "BenchConfig::default_iterations")]
    pub iterations: u64,
    /// Number of synthetic samples the pipeline processes per run. Larger
    /// values make each timed block proportionally longer.
    #[serde(default = "BenchConfig::default_sample_points")]
    pub sample_points: usize,
    /// Whether the timers start enabled. Disabled runs measure the
    /// pass-through overhead of the instrumentation points.
    #[serde(default = "BenchConfig::default_enabled")]
    pub enabled: bool,
}

impl BenchConfig {
    fn default_iterations() -> u64 {
        100
    }
    fn default_sample_points() -> usize {
        65_536
    }
    fn default_enabled() -> bool {
        true
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let cfg: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn default_example() -> Self {
        Self::default()
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: Self::default_iterations(),
            sample_points: Self::default_sample_points(),
            enabled: Self::default_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: BenchConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.iterations, 100);
        assert_eq!(cfg.sample_points, 65_536);
        assert!(cfg.enabled);
    }

    #[test]
    fn test_partial_config() {
        let cfg: BenchConfig = toml::from_str("iterations = 5\nenabled = false\n").unwrap();
        assert_eq!(cfg.iterations, 5);
        assert!(!cfg.enabled);
        assert_eq!(cfg.sample_points, 65_536);
    }

    #[test]
    fn test_example_round_trips() {
        let text = toml::to_string_pretty(&BenchConfig::default_example()).unwrap();
        let cfg: BenchConfig = toml::from_str(&text).unwrap();
        assert_eq!(cfg.iterations, 100);
    }
}
