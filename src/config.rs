use crate::recorder::{FileStorage, Format};
use crate::traits::DrillError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_RESULTS: &str = "results.json";

/// Settings shared by the front ends, fields that are missing in a file take their default.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Statistics file, json or yaml depending on the extension.
    pub results: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            results: PathBuf::from(DEFAULT_RESULTS),
        }
    }
}

impl Config {
    /// Read the configuration from a json or yaml file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, DrillError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
        // An empty file means all defaults.
        if text.trim().is_empty() {
            return Ok(Default::default());
        }
        let config: Config = match format {
            Format::Json => serde_json::from_str(&text)
                .map_err(|e| format!("failed to parse {}: {e}", path.display()))?,
            Format::Yaml => serde_yaml::from_str(&text)
                .map_err(|e| format!("failed to parse {}: {e}", path.display()))?,
        };
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Start from the file if there is one, then apply the overrides.
    pub fn resolve(file: Option<&Path>, results: Option<PathBuf>) -> Result<Config, DrillError> {
        let mut config = match file {
            Some(path) => Config::load(path)?,
            None => Default::default(),
        };
        if let Some(results) = results {
            config.results = results;
        }
        Ok(config)
    }

    pub fn storage(&self) -> Result<FileStorage, DrillError> {
        FileStorage::new(&self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.results, PathBuf::from("results.json"));
        assert_eq!(config.storage().unwrap().format(), Format::Json);
        assert_eq!(Config::resolve(None, None).unwrap(), config);
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("drill.yaml");
        std::fs::write(&yaml, "results: /var/lib/drill/stats.yaml\n").unwrap();
        let config = Config::load(&yaml).unwrap();
        assert_eq!(config.results, PathBuf::from("/var/lib/drill/stats.yaml"));
        assert_eq!(config.storage().unwrap().format(), Format::Yaml);

        let empty = dir.path().join("empty.yml");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(Config::load(&empty).unwrap(), Config::default());

        let json = dir.path().join("drill.json");
        std::fs::write(&json, "{}").unwrap();
        assert_eq!(Config::load(&json).unwrap(), Config::default());

        assert!(Config::load(dir.path().join("absent.yaml")).is_err());
        assert!(Config::load(dir.path().join("drill.toml")).is_err());
    }

    #[test]
    fn test_resolve_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("drill.yaml");
        std::fs::write(&yaml, "results: from_file.json\n").unwrap();

        let config = Config::resolve(Some(yaml.as_path()), None).unwrap();
        assert_eq!(config.results, PathBuf::from("from_file.json"));

        let flag = Some(PathBuf::from("flag.yaml"));
        let config = Config::resolve(Some(yaml.as_path()), flag).unwrap();
        assert_eq!(config.results, PathBuf::from("flag.yaml"));
    }
}
