//! Configuration
//!
//! ```toml
//! max_size_mib = 10.0
//! top_keywords = 5
//! ```
//!
//! Missing keys take their defaults; unknown keys are rejected.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tos_registry::{CappingPolicy, FileRegistry};
use tos_tree::DEFAULT_TOP_KEYWORDS;

/// Default upload budget in MiB
pub const DEFAULT_MAX_SIZE_MIB: f64 = 10.0;

/// Tree of Science configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TosConfig {
    /// Upload budget in MiB; files past it are capped
    pub max_size_mib: f64,
    /// Keywords shown per band
    pub top_keywords: usize,
}

impl TosConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With upload budget in MiB
    #[inline]
    #[must_use]
    pub fn with_max_size_mib(mut self, mib: f64) -> Self {
        self.max_size_mib = mib;
        self
    }

    /// With keywords per band
    #[inline]
    #[must_use]
    pub fn with_top_keywords(mut self, k: usize) -> Self {
        self.top_keywords = k;
        self
    }

    /// # Errors
    /// [`ConfigError::InvalidBudget`] or [`ConfigError::InvalidTopKeywords`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_size_mib.is_finite() || self.max_size_mib <= 0.0 {
            return Err(ConfigError::InvalidBudget(self.max_size_mib));
        }
        if self.top_keywords == 0 {
            return Err(ConfigError::InvalidTopKeywords);
        }
        Ok(())
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Parse errors and validation failures.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Read`] on I/O failure, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Upload budget in bytes
    #[inline]
    #[must_use]
    pub fn budget_bytes(&self) -> u64 {
        self.capping_policy().budget_bytes()
    }

    #[inline]
    #[must_use]
    pub fn capping_policy(&self) -> CappingPolicy {
        CappingPolicy::from_mib(self.max_size_mib)
    }

    /// Empty registry capped at this budget
    #[must_use]
    pub fn registry(&self) -> FileRegistry {
        FileRegistry::new(self.capping_policy())
    }
}

impl Default for TosConfig {
    fn default() -> Self {
        Self {
            max_size_mib: DEFAULT_MAX_SIZE_MIB,
            top_keywords: DEFAULT_TOP_KEYWORDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tos_registry::MIB;

    #[test]
    fn defaults() {
        let config = TosConfig::new();
        assert_eq!(config.budget_bytes(), 10 * MIB);
        assert_eq!(config.top_keywords, 5);
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TosConfig::from_toml_str("top_keywords = 3").unwrap();
        assert_eq!(config, TosConfig::new().with_top_keywords(3));
    }

    #[test]
    fn fractional_budget() {
        let config = TosConfig::from_toml_str("max_size_mib = 0.5").unwrap();
        assert_eq!(config.budget_bytes(), MIB / 2);
        assert_eq!(config.registry().policy().budget_bytes(), MIB / 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            TosConfig::from_toml_str("max_size_mib = 0.0"),
            Err(ConfigError::InvalidBudget(_))
        ));
        assert!(matches!(
            TosConfig::from_toml_str("max_size_mib = -2.0"),
            Err(ConfigError::InvalidBudget(_))
        ));
        assert!(matches!(
            TosConfig::from_toml_str("max_size_mib = nan"),
            Err(ConfigError::InvalidBudget(_))
        ));
        assert!(matches!(
            TosConfig::from_toml_str("top_keywords = 0"),
            Err(ConfigError::InvalidTopKeywords)
        ));
        assert!(matches!(
            TosConfig::from_toml_str("max_size = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_size_mib = 2.5\ntop_keywords = 7").unwrap();

        let config = TosConfig::load(file.path()).await.unwrap();
        assert_eq!(config.top_keywords, 7);
        assert_eq!(config.budget_bytes(), 5 * MIB / 2);
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = tokio_test::block_on(TosConfig::load(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
