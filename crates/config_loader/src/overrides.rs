//! Environment overrides
//!
//! Deployment scripts flip the feature flag or repoint the endpoint without
//! editing the config file.

use contracts::{ContractError, GathererSettings};

/// Overrides `project_info` (`true`/`false`/`1`/`0`/`yes`/`no`)
pub const ENV_PROJECT_INFO: &str = "ITEM_STATS_PROJECT_INFO";

/// Overrides `project_endpoint`
pub const ENV_PROJECT_ENDPOINT: &str = "ITEM_STATS_PROJECT_ENDPOINT";

/// Raw override values, parsed when applied
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub project_info: Option<String>,
    pub project_endpoint: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            project_info: lookup(ENV_PROJECT_INFO),
            project_endpoint: lookup(ENV_PROJECT_ENDPOINT),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.project_info.is_none() && self.project_endpoint.is_none()
    }

    /// Apply overrides in place
    ///
    /// # Errors
    /// `ConfigParse` when the flag text is not a boolean.
    pub fn apply(&self, settings: &mut GathererSettings) -> Result<(), ContractError> {
        if let Some(raw) = &self.project_info {
            settings.project_info = parse_flag(raw).ok_or_else(|| {
                ContractError::config_parse(format!(
                    "{ENV_PROJECT_INFO}: expected a boolean, got '{raw}'"
                ))
            })?;
        }
        if let Some(endpoint) = &self.project_endpoint {
            settings.project_endpoint = endpoint.trim().to_string();
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup() {
        let vars = HashMap::from([
            (ENV_PROJECT_INFO, "1".to_string()),
            (ENV_PROJECT_ENDPOINT, " http://stats.local/api ".to_string()),
        ]);
        let overrides = EnvOverrides::from_lookup(|k| vars.get(k).cloned());
        assert!(!overrides.is_empty());

        let mut settings = GathererSettings::default();
        overrides.apply(&mut settings).unwrap();
        assert!(settings.project_info);
        assert_eq!(settings.project_endpoint, "http://stats.local/api");
    }

    #[test]
    fn test_empty_overrides_leave_settings() {
        let overrides = EnvOverrides::from_lookup(|_| None);
        assert!(overrides.is_empty());

        let mut settings = GathererSettings {
            project_info: true,
            ..Default::default()
        };
        overrides.apply(&mut settings).unwrap();
        assert!(settings.project_info);
    }

    #[test]
    fn test_invalid_flag_is_parse_error() {
        let overrides = EnvOverrides {
            project_info: Some("maybe".to_string()),
            project_endpoint: None,
        };
        let err = overrides
            .apply(&mut GathererSettings::default())
            .unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_flag_variants() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
