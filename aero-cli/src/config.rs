//! Aero configuration loading from `.aerorc.toml`.
//!
//! Configuration is optional. Every setting has a default and command-line
//! flags override whatever the file says.
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! endpoint = "https://query.wikidata.org/sparql"
//! limit = 2000
//! user_agent = "aero/0.1"
//! timeout_secs = 60
//!
//! [flights]
//! max_rows = 5000
//!
//! [paths]
//! ontology = "airports_ontology.rdf"
//! airports = "populated_airports.owl"
//! flights = "populated_flights.owl"
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aero_core::wikidata::{DEFAULT_ENDPOINT, DEFAULT_LIMIT};

/// Config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".aerorc.toml";

/// Root configuration structure loaded from `.aerorc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct AeroConfig {
    /// Remote airport source.
    #[serde(default)]
    pub source: SourceConfig,

    /// Flight file reading.
    #[serde(default)]
    pub flights: FlightsConfig,

    /// Default file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Remote SPARQL endpoint settings.
#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Row limit appended to the airport query.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Sent with every request; the public endpoint rejects anonymous clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_user_agent() -> String {
    format!("aero/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            limit: default_limit(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Flight CSV settings.
#[derive(Debug, Deserialize)]
pub struct FlightsConfig {
    /// Rows past this many are ignored.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_max_rows() -> usize {
    5000
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
        }
    }
}

/// Default graph file locations.
#[derive(Debug, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_ontology")]
    pub ontology: PathBuf,
    #[serde(default = "default_airports")]
    pub airports: PathBuf,
    #[serde(default = "default_flights")]
    pub flights: PathBuf,
}

fn default_ontology() -> PathBuf {
    PathBuf::from("airports_ontology.rdf")
}

fn default_airports() -> PathBuf {
    PathBuf::from("populated_airports.owl")
}

fn default_flights() -> PathBuf {
    PathBuf::from("populated_flights.owl")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ontology: default_ontology(),
            airports: default_airports(),
            flights: default_flights(),
        }
    }
}

/// Output formatting preferences.
///
/// Valid formats: `table`, `json`, `csv`.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub color: Option<bool>,
}

/// Endpoint settings after flag overrides are applied.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub endpoint: String,
    pub limit: usize,
    pub user_agent: String,
    pub timeout: Duration,
}

impl AeroConfig {
    /// Load configuration from `.aerorc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Endpoint settings with optional flag overrides.
    pub fn source_settings(&self, endpoint: Option<String>, limit: Option<usize>) -> SourceSettings {
        SourceSettings {
            endpoint: endpoint.unwrap_or_else(|| self.source.endpoint.clone()),
            limit: limit.unwrap_or(self.source.limit),
            user_agent: self.source.user_agent.clone(),
            timeout: Duration::from_secs(self.source.timeout_secs),
        }
    }

    pub fn max_rows(&self) -> usize {
        self.flights.max_rows
    }

    pub fn ontology_path(&self) -> PathBuf {
        self.paths.ontology.clone()
    }

    pub fn airports_path(&self) -> PathBuf {
        self.paths.airports.clone()
    }

    pub fn flights_path(&self) -> PathBuf {
        self.paths.flights.clone()
    }

    /// The flights graph if it exists, otherwise the airports graph.
    pub fn default_graph_path(&self) -> PathBuf {
        if self.paths.flights.exists() {
            self.flights_path()
        } else {
            self.airports_path()
        }
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AeroConfig::default();
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.source.limit, 2000);
        assert_eq!(config.max_rows(), 5000);
        assert_eq!(config.airports_path(), PathBuf::from("populated_airports.owl"));
        assert!(config.default_format().is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
endpoint = "http://localhost:9999/sparql"
limit = 50
user_agent = "tests/1.0"
timeout_secs = 5

[flights]
max_rows = 10

[paths]
ontology = "base.rdf"
airports = "out/airports.owl"
flights = "out/flights.owl"

[output]
format = "json"
color = false
"#;
        let config: AeroConfig = toml::from_str(toml_content).unwrap();

        let source = config.source_settings(None, None);
        assert_eq!(source.endpoint, "http://localhost:9999/sparql");
        assert_eq!(source.limit, 50);
        assert_eq!(source.user_agent, "tests/1.0");
        assert_eq!(source.timeout, Duration::from_secs(5));

        assert_eq!(config.max_rows(), 10);
        assert_eq!(config.ontology_path(), PathBuf::from("base.rdf"));
        assert_eq!(config.flights_path(), PathBuf::from("out/flights.owl"));
        assert_eq!(config.default_format(), Some("json"));
        assert_eq!(config.use_color(), Some(false));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AeroConfig = toml::from_str("[source]\nlimit = 10\n").unwrap();
        assert_eq!(config.source.limit, 10);
        assert_eq!(config.source.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.source.timeout_secs, 60);
    }

    #[test]
    fn test_flag_overrides() {
        let config = AeroConfig::default();
        let source = config.source_settings(Some("http://example.org/sparql".into()), Some(3));
        assert_eq!(source.endpoint, "http://example.org/sparql");
        assert_eq!(source.limit, 3);
    }

    #[test]
    fn test_load_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[source\nlimit = ").unwrap();
        let config = AeroConfig::load(dir.path());
        assert_eq!(config.source.limit, DEFAULT_LIMIT);
    }
}
