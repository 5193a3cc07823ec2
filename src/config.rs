use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::city::City;

/// Default location of the city CSV files when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = ".";

/// Resolves where each city's trip data lives.
///
/// Files default to `<data_dir>/<city file name>`. Individual cities can be
/// pointed elsewhere with a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "/srv/bikeshare/chicago_2017.csv",
///   "new york city": "nyc.csv"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataConfig {
    data_dir: PathBuf,
    overrides: HashMap<City, PathBuf>,
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Reads `BIKESHARE_DATA_DIR`, falling back to [`DEFAULT_DATA_DIR`].
    pub fn from_env() -> Self {
        let data_dir =
            std::env::var("BIKESHARE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::new(data_dir)
    }

    /// Loads per-city path overrides from a JSON file at `path`.
    pub fn with_overrides_file(mut self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Config file '{}' is not a JSON object", path.display()))?;

        for (key, value) in entries {
            let city: City = key
                .parse()
                .with_context(|| format!("Bad entry in config file '{}'", path.display()))?;
            self.overrides.insert(city, PathBuf::from(value));
        }
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the CSV path for `city`, honouring any override.
    pub fn path_for(&self, city: City) -> PathBuf {
        match self.overrides.get(&city) {
            Some(path) => path.clone(),
            None => self.data_dir.join(city.file_name()),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_default_paths_use_data_dir() {
        let config = DataConfig::new("/data");
        assert_eq!(
            config.path_for(City::NewYorkCity),
            PathBuf::from("/data/new_york_city.csv")
        );
    }

    #[test]
    fn test_overrides_file() {
        let path = temp_path("bikeshare_stats_test_overrides.json");
        fs::write(&path, r#"{ "Chicago": "/tmp/chi.csv" }"#).unwrap();

        let config = DataConfig::new("/data").with_overrides_file(&path).unwrap();

        assert_eq!(config.path_for(City::Chicago), PathBuf::from("/tmp/chi.csv"));
        assert_eq!(
            config.path_for(City::Washington),
            PathBuf::from("/data/washington.csv")
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_overrides_file_rejects_unknown_city() {
        let path = temp_path("bikeshare_stats_test_bad_overrides.json");
        fs::write(&path, r#"{ "boston": "boston.csv" }"#).unwrap();

        let result = DataConfig::default().with_overrides_file(&path);
        assert!(result.is_err());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_overrides_file() {
        let result =
            DataConfig::default().with_overrides_file(&temp_path("bikeshare_stats_missing.json"));
        assert!(result.is_err());
    }
}
