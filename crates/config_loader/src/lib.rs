//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Apply environment overrides
//! - Validate configuration legality
//! - Produce `GathererSettings` (the feature-flag source)
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let settings = ConfigLoader::load_from_path(Path::new("item-stats.toml")).unwrap();
//! println!("Endpoint: {}", settings.project_endpoint);
//! ```

mod overrides;
mod parser;
mod validator;

pub use contracts::GathererSettings;
pub use overrides::{EnvOverrides, ENV_PROJECT_ENDPOINT, ENV_PROJECT_INFO};
pub use parser::ConfigFormat;
pub use validator::{MAX_CHANNEL_CAPACITY, MAX_TIMEOUT_MS};

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<GathererSettings, ContractError> {
        Self::load_from_path_with(path, &EnvOverrides::default())
    }

    /// Load configuration from file path, applying `overrides` before validation
    pub fn load_from_path_with(
        path: &Path,
        overrides: &EnvOverrides,
    ) -> Result<GathererSettings, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str_with(&content, format, overrides)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<GathererSettings, ContractError> {
        Self::load_from_str_with(content, format, &EnvOverrides::default())
    }

    /// Load configuration from string, applying `overrides` before validation
    pub fn load_from_str_with(
        content: &str,
        format: ConfigFormat,
        overrides: &EnvOverrides,
    ) -> Result<GathererSettings, ContractError> {
        let mut settings = parser::parse(content, format)?;
        overrides.apply(&mut settings)?;
        validator::validate(&settings)?;
        Ok(settings)
    }

    /// Validate settings built elsewhere (e.g. after CLI overrides)
    pub fn validate(settings: &GathererSettings) -> Result<(), ContractError> {
        validator::validate(settings)
    }

    /// Serialize GathererSettings to TOML string
    pub fn to_toml(settings: &GathererSettings) -> Result<String, ContractError> {
        toml::to_string_pretty(settings)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize GathererSettings to JSON string
    pub fn to_json(settings: &GathererSettings) -> Result<String, ContractError> {
        serde_json::to_string_pretty(settings)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
project_info = true
project_endpoint = "http://stats.local/api/projects"

[host]
root_url = "http://ci.example/"

[pubsub]
topic = "jobs"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let settings = result.unwrap();
        assert_eq!(settings.pubsub.topic, "jobs");
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let settings = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(settings.host.root_url, "http://ci.example/");
    }

    #[test]
    fn test_load_from_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_round_trip_toml() {
        let settings = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&settings).unwrap();
        let settings2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(settings.project_endpoint, settings2.project_endpoint);
        assert_eq!(settings.pubsub.topic, settings2.pubsub.topic);
    }

    #[test]
    fn test_round_trip_json() {
        let settings = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&settings).unwrap();
        let settings2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(settings.host.root_url, settings2.host.root_url);
    }

    #[test]
    fn test_overrides_apply_before_validation() {
        // Enabled without endpoint is invalid on its own
        let content = "project_info = true\n";
        assert!(ConfigLoader::load_from_str(content, ConfigFormat::Toml).is_err());

        let overrides = EnvOverrides {
            project_info: None,
            project_endpoint: Some("https://stats.local/api/projects".to_string()),
        };
        let settings =
            ConfigLoader::load_from_str_with(content, ConfigFormat::Toml, &overrides).unwrap();
        assert_eq!(settings.project_endpoint, "https://stats.local/api/projects");
    }
}
