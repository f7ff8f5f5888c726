//! Configuration loading and validation for the vault shell.
//!
//! Values are read from `PASSKEEP_`-prefixed environment variables at startup.
//! Every setting has a default; an unparsable or out-of-range value stops the
//! process with a clear error message.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::credentials::DEFAULT_MAX_PROMPT_ATTEMPTS;
use crate::generator;
use crate::session::DEFAULT_TTL;

/// Prefix shared by every environment variable the vault reads.
pub const ENV_PREFIX: &str = "PASSKEEP";

/// Validated vault configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// How long (milliseconds) a supplied passphrase stays cached.
    #[serde(default = "default_passphrase_ttl_ms")]
    pub passphrase_ttl_ms: u64,

    /// Passphrase prompts allowed per seal/reveal before giving up.
    #[serde(default = "default_max_prompt_attempts")]
    pub max_prompt_attempts: u32,

    /// Length of passwords produced by `generate` without an argument.
    #[serde(default = "default_generated_password_len")]
    pub generated_password_len: usize,

    /// Tracing log level (e.g. `"warn"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_passphrase_ttl_ms() -> u64 {
    u64::try_from(DEFAULT_TTL.as_millis()).unwrap_or(u64::MAX)
}
fn default_max_prompt_attempts() -> u32 {
    DEFAULT_MAX_PROMPT_ATTEMPTS
}
fn default_generated_password_len() -> usize {
    generator::DEFAULT_LENGTH
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            passphrase_ttl_ms: default_passphrase_ttl_ms(),
            max_prompt_attempts: default_max_prompt_attempts(),
            generated_password_len: default_generated_password_len(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(source: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(source.try_parsing(true))
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// TTL applied to a freshly cached or extended passphrase.
    pub fn passphrase_ttl(&self) -> Duration {
        Duration::from_millis(self.passphrase_ttl_ms)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.passphrase_ttl_ms == 0 {
            anyhow::bail!("{ENV_PREFIX}_PASSPHRASE_TTL_MS must be > 0");
        }
        if self.max_prompt_attempts == 0 {
            anyhow::bail!("{ENV_PREFIX}_MAX_PROMPT_ATTEMPTS must be > 0");
        }
        if self.generated_password_len == 0 {
            anyhow::bail!("{ENV_PREFIX}_GENERATED_PASSWORD_LEN must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("{ENV_PREFIX}_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_are_correct() {
        let cfg = Config::default();
        assert_eq!(cfg.passphrase_ttl_ms, 300_000);
        assert_eq!(cfg.passphrase_ttl(), Duration::from_secs(300));
        assert_eq!(cfg.max_prompt_attempts, 3);
        assert_eq!(cfg.generated_password_len, 16);
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = Config::from_source(env(&[])).unwrap();
        assert_eq!(cfg.passphrase_ttl_ms, 300_000);
        assert_eq!(cfg.log_level, "warn");
    }

    #[test]
    fn reads_prefixed_variables() {
        let cfg = Config::from_source(env(&[
            ("PASSKEEP_PASSPHRASE_TTL_MS", "60000"),
            ("PASSKEEP_MAX_PROMPT_ATTEMPTS", "5"),
            ("PASSKEEP_GENERATED_PASSWORD_LEN", "24"),
            ("PASSKEEP_LOG_LEVEL", "debug"),
            ("UNRELATED_PASSPHRASE_TTL_MS", "1"),
        ]))
        .unwrap();
        assert_eq!(cfg.passphrase_ttl(), Duration::from_secs(60));
        assert_eq!(cfg.max_prompt_attempts, 5);
        assert_eq!(cfg.generated_password_len, 24);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn rejects_unparsable_value() {
        assert!(Config::from_source(env(&[("PASSKEEP_PASSPHRASE_TTL_MS", "soon")])).is_err());
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let cfg = Config {
            passphrase_ttl_ms: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let cfg = Config {
            max_prompt_attempts: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_log_level() {
        let cfg = Config {
            log_level: "  ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}
