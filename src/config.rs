use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::ensemble::EnsembleOptions;
use crate::error::{SimError, SimResult};

/// Run parameters read from TOML:
///
/// ```toml
/// end_time = 100.0
/// replicates = 32
/// threads = 8      # optional
/// seed = 42        # optional
/// max_steps = 10000000  # optional
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub end_time: f64,
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_steps: Option<u64>,
}

fn default_replicates() -> usize {
    1
}

impl RunConfig {
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        if !self.end_time.is_finite() || self.end_time <= 0.0 {
            return Err(SimError::InvalidArgument(format!(
                "end_time must be positive and finite, got {}",
                self.end_time
            )));
        }
        if self.replicates == 0 {
            return Err(SimError::InvalidArgument(
                "replicates must be greater than zero".into(),
            ));
        }
        if self.threads == Some(0) {
            return Err(SimError::InvalidArgument(
                "threads must be greater than zero".into(),
            ));
        }
        if self.max_steps == Some(0) {
            return Err(SimError::InvalidArgument(
                "max_steps must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn ensemble_options(&self) -> EnsembleOptions {
        EnsembleOptions {
            threads: self.threads,
            seed: self.seed,
            max_steps: self.max_steps,
            cancel: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config = RunConfig::from_toml_str("end_time = 50.0").unwrap();
        assert_eq!(config.replicates, 1);
        assert_eq!(config.threads, None);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn full_config_maps_to_ensemble_options() {
        let config = RunConfig::from_toml_str(
            "end_time = 10.0\nreplicates = 8\nthreads = 2\nseed = 7\nmax_steps = 1000\n",
        )
        .unwrap();
        let options = config.ensemble_options();
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.max_steps, Some(1000));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            RunConfig::from_toml_str("end_time = -1.0"),
            Err(SimError::InvalidArgument(msg)) if msg.contains("end_time")
        ));
        assert!(matches!(
            RunConfig::from_toml_str("end_time = 1.0\nreplicates = 0"),
            Err(SimError::InvalidArgument(msg)) if msg.contains("replicates")
        ));
        assert!(matches!(
            RunConfig::from_toml_str("end_time = 1.0\nunknown = 3"),
            Err(SimError::Config(_))
        ));
    }
}
