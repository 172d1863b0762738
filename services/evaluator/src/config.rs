use std::collections::HashMap;

use serde::Deserialize;

use formula::FormulaConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub formula: FormulaConfig,

    // Keys are lowercased when read from the environment
    pub variables: HashMap<String, f64>,
}

impl Config {
    /// Reads `APP_` prefixed variables, with `__` separating nested keys
    pub fn from_env() -> Result<Self, ::config::ConfigError> {
        let mut cfg = ::config::Config::new();
        cfg.merge(::config::Environment::new().prefix("APP").separator("__"))?;
        cfg.try_into()
    }
}
