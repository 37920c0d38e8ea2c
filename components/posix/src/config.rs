//! POSIX layer configuration
//!
//! Loaded from TOML, e.g.
//!
//! ```toml
//! wait_operation = "wait"
//! flock_operation = "flock"
//! forward_argv0 = true
//! strict_wait_pid = false
//! ```
//!
//! Missing keys take their defaults.

use serde::Deserialize;

use crate::error::{PosixError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PosixConfig {
    /// Asynchronous host operation used by `wait4`
    pub wait_operation: String,

    /// Synchronous filesystem operation used by `flock`
    pub flock_operation: String,

    /// Pass `argv[0]` to the host as the `argv0` spawn option
    pub forward_argv0: bool,

    /// Fail `wait4` when the host reports a pid other than the one requested
    pub strict_wait_pid: bool,
}

impl Default for PosixConfig {
    fn default() -> Self {
        Self {
            wait_operation: "wait".to_string(),
            flock_operation: "flock".to_string(),
            forward_argv0: true,
            strict_wait_pid: false,
        }
    }
}

impl PosixConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: PosixConfig =
            toml::from_str(source).map_err(|e| PosixError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.wait_operation.trim().is_empty() {
            return Err(PosixError::Configuration(
                "wait_operation cannot be empty".to_string(),
            ));
        }

        if self.flock_operation.trim().is_empty() {
            return Err(PosixError::Configuration(
                "flock_operation cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PosixConfig::default();
        assert_eq!(config.wait_operation, "wait");
        assert_eq!(config.flock_operation, "flock");
        assert!(config.forward_argv0);
        assert!(!config.strict_wait_pid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PosixConfig::from_toml_str("strict_wait_pid = true").expect("valid config");
        assert!(config.strict_wait_pid);
        assert_eq!(config.wait_operation, "wait");
    }

    #[test]
    fn test_rejects_empty_operation() {
        let err = PosixConfig::from_toml_str("wait_operation = \"  \"").expect_err("empty op");
        assert_eq!(
            err.to_string(),
            "Configuration error: wait_operation cannot be empty"
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            PosixConfig::from_toml_str("spawn_timeout = 5"),
            Err(PosixError::Configuration(_))
        ));
    }
}
