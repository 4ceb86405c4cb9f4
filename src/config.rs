use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use crate::{Ident, RegistryError, RegistryResult};

/// Resolution mode, fixed once when a registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// Only the compiled mappings are consulted. Mutation is rejected.
    Compiled,
    /// Runtime bindings first, then compiled mappings.
    Runtime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RegistryConfig {
    #[serde(default)]
    pub compile: bool,

    /// Ordered (logical, implementation) pairs. Later pairs win.
    #[serde(default)]
    pub mappings: Vec<(Ident, Ident)>,
}

impl RegistryConfig {
    pub fn compiled() -> Self {
        Self {
            compile: true,
            ..Default::default()
        }
    }

    pub fn runtime() -> Self {
        Self::default()
    }

    pub fn with_mapping(
        mut self,
        logical: impl Into<Ident>,
        implementation: impl Into<Ident>,
    ) -> Self {
        self.mappings.push((logical.into(), implementation.into()));
        self
    }

    pub fn mode(&self) -> Mode {
        if self.compile {
            Mode::Compiled
        } else {
            Mode::Runtime
        }
    }

    /// Collapse the ordered mapping list into the compiled mapping set.
    pub fn compiled_mappings(&self) -> HashMap<Ident, Ident> {
        self.mappings
            .iter()
            .map(|(logical, implementation)| (logical.clone(), implementation.clone()))
            .collect()
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> RegistryResult<T> {
    let file = File::open(path)
        .map_err(|e| RegistryError::config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| RegistryError::config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> RegistryResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| RegistryError::config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_config_is_runtime_without_mappings() {
        let config = RegistryConfig::default();
        assert!(!config.compile);
        assert!(config.mappings.is_empty());
        assert_eq!(config.mode(), Mode::Runtime);
    }

    #[test]
    fn test_parse_config_from_json() {
        let config: RegistryConfig = from_str(
            r#"{
                "compile": true,
                "mappings": [["Sensor", "MockSensor"], ["Clock", "FixedClock"]]
            }"#,
        )
        .unwrap();
        assert_eq!(config.mode(), Mode::Compiled);
        assert_eq!(
            config.mappings,
            vec![
                (Ident::from("Sensor"), Ident::from("MockSensor")),
                (Ident::from("Clock"), Ident::from("FixedClock")),
            ]
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: RegistryConfig = from_str("{}").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn test_later_mapping_wins() {
        let config = RegistryConfig::runtime()
            .with_mapping("Sensor", "MockSensor")
            .with_mapping("Sensor", "OtherSensor");
        let mappings = config.compiled_mappings();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings.get("Sensor"), Some(&Ident::from("OtherSensor")));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result: RegistryResult<RegistryConfig> = from_str("{ compile: ");
        assert!(matches!(result, Err(RegistryError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result: RegistryResult<RegistryConfig> = from_file("/nonexistent/rebind.json");
        assert!(matches!(result, Err(RegistryError::Config(_))));
    }

    #[test]
    fn test_mode_display_and_parse() {
        assert_eq!(Mode::Compiled.to_string(), "compiled");
        assert_eq!(Mode::from_str("runtime").unwrap(), Mode::Runtime);
    }
}
