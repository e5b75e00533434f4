//! Search configuration.
//!
//! Settings are read from the `[search]` table of `config/config.toml` and from
//! environment variables prefixed `SCOPED_SEARCH__` (e.g.
//! `SCOPED_SEARCH__SEARCH__IGNORE_BLANK_VALUES=true`). Defaults apply when neither
//! source provides the section.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "SCOPED_SEARCH";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Skip arity-1 conditions whose value is null or blank text when composing.
    #[serde(default)]
    pub ignore_blank_values: bool,
}

impl SearchConfig {
    /// Load the search configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // File present but unreadable: retry with env only
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!(
                        "failed to load {}, falling back to env. Error: {}",
                        CONFIG_FILE,
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        match settings.get::<SearchConfig>("search") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(SearchConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Search configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_blank_values() {
        assert!(!SearchConfig::default().ignore_blank_values);
    }

    #[test]
    fn test_load_without_sources_uses_defaults() {
        // No config/config.toml ships with the crate and the env prefix is unused in tests.
        assert_eq!(SearchConfig::load().unwrap(), SearchConfig::default());
    }

    #[test]
    fn test_deserialize_section() {
        let settings = Config::builder()
            .add_source(config::File::from_str(
                "[search]\nignore_blank_values = true\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let loaded: SearchConfig = settings.get("search").unwrap();
        assert!(loaded.ignore_blank_values);
    }
}
