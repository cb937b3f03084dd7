use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the chat-completion API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "Config::default_bind_addr")]
    pub bind_addr: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    /// Input files and database location for the dataset loader.
    #[serde(default)]
    pub datasets: DatasetConfig,
    /// Map rendering configuration.
    #[serde(default)]
    pub map: MapConfig,
    /// Chat-completion API configuration.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    fn default_bind_addr() -> String {
        "0.0.0.0:3000".to_string()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Where the tabular inputs live and where the SQLite store is written.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "DatasetConfig::default_routes_csv")]
    pub routes_csv: PathBuf,
    #[serde(default = "DatasetConfig::default_stops_csv")]
    pub stops_csv: PathBuf,
    #[serde(default = "DatasetConfig::default_db_path")]
    pub db_path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            routes_csv: Self::default_routes_csv(),
            stops_csv: Self::default_stops_csv(),
            db_path: Self::default_db_path(),
        }
    }
}

impl DatasetConfig {
    fn default_routes_csv() -> PathBuf {
        PathBuf::from("data/bus_routes.csv")
    }
    fn default_stops_csv() -> PathBuf {
        PathBuf::from("data/bus_stops.csv")
    }
    fn default_db_path() -> PathBuf {
        PathBuf::from("database/bus_routes.db")
    }
}

/// Map centering and marker display settings.
///
/// The defaults center on Baltimore, the city the sample datasets cover.
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "MapConfig::default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "MapConfig::default_center_longitude")]
    pub center_longitude: f64,
    #[serde(default = "MapConfig::default_zoom")]
    pub zoom: u8,
    /// Maximum number of stop markers rendered on the map.
    #[serde(default = "MapConfig::default_marker_cap")]
    pub marker_cap: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: Self::default_center_latitude(),
            center_longitude: Self::default_center_longitude(),
            zoom: Self::default_zoom(),
            marker_cap: Self::default_marker_cap(),
        }
    }
}

impl MapConfig {
    fn default_center_latitude() -> f64 {
        39.2904
    }
    fn default_center_longitude() -> f64 {
        -76.6122
    }
    fn default_zoom() -> u8 {
        13
    }
    fn default_marker_cap() -> usize {
        100
    }
}

/// Chat-completion endpoint settings. The credential itself is read from the
/// `OPENAI_API_KEY` environment variable, never from this file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "ChatConfig::default_api_base")]
    pub api_base: String,
    #[serde(default = "ChatConfig::default_model")]
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: Self::default_api_base(),
            model: Self::default_model(),
        }
    }
}

impl ChatConfig {
    fn default_api_base() -> String {
        "https://api.openai.com/v1".to_string()
    }
    fn default_model() -> String {
        "gpt-4".to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.map.marker_cap, 100);
        assert_eq!(config.map.zoom, 13);
        assert!((config.map.center_latitude - 39.2904).abs() < f64::EPSILON);
        assert_eq!(config.chat.model, "gpt-4");
        assert!(!config.cors_permissive);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn sections_override_defaults() {
        let yaml = r#"
bind_addr: "127.0.0.1:8080"
map:
  zoom: 11
  marker_cap: 25
chat:
  model: gpt-4o-mini
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.map.zoom, 11);
        assert_eq!(config.map.marker_cap, 25);
        assert_eq!(config.chat.model, "gpt-4o-mini");
        // Untouched sections keep their defaults.
        assert_eq!(
            config.datasets.routes_csv,
            PathBuf::from("data/bus_routes.csv")
        );
    }
}
