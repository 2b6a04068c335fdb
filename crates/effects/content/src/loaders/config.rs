//! Engine configuration loader.

use std::path::Path;

use effects_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to `EngineConfig` defaults, so a partial
    /// file such as `budget_cap = 3` is valid.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = ConfigLoader::parse(
            "budget_cap = 7\nmax_effect_count = 2\nfield_tick_period = 10\n",
        )
        .unwrap();
        assert_eq!(config.budget_cap, 7);
        assert_eq!(config.max_effect_count, 2);
        assert_eq!(config.field_tick_period, 10);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("budget_cap = 3\n").unwrap();
        assert_eq!(config.budget_cap, 3);
        assert_eq!(config.max_effect_count, EngineConfig::MAX_LOADOUT);
        assert_eq!(
            config.field_tick_period,
            EngineConfig::DEFAULT_FIELD_TICK_PERIOD
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(ConfigLoader::parse("budget_cap = ").is_err());
    }
}
