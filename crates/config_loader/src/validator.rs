//! 配置校验模块
//!
//! 校验规则：
//! - project_info 开启时 project_endpoint 必须是 http/https URL
//! - delivery.timeout_ms 在 1..=30000 之间
//! - pubsub.topic 非空，udp 传输需要合法的 addr
//! - user id 非空且唯一

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{ContractError, GathererSettings, PubSubTransport};

/// Per-sink timeout upper bound (ms)
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// In-process channel capacity upper bound
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// 校验 GathererSettings 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(settings: &GathererSettings) -> Result<(), ContractError> {
    validate_endpoint(settings)?;
    validate_delivery(settings)?;
    validate_pubsub(settings)?;
    validate_users(settings)?;
    Ok(())
}

/// 校验 REST endpoint
fn validate_endpoint(settings: &GathererSettings) -> Result<(), ContractError> {
    if !settings.project_info && settings.project_endpoint.is_empty() {
        return Ok(());
    }

    let endpoint = settings.project_endpoint.trim();
    if endpoint.is_empty() {
        return Err(ContractError::config_validation(
            "project_endpoint",
            "project_endpoint is required when project_info is enabled",
        ));
    }

    let url = url::Url::parse(endpoint).map_err(|e| {
        ContractError::config_validation(
            "project_endpoint",
            format!("invalid URL '{endpoint}': {e}"),
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ContractError::config_validation(
            "project_endpoint",
            format!("unsupported scheme '{other}', expected http or https"),
        )),
    }
}

/// 校验投递超时
fn validate_delivery(settings: &GathererSettings) -> Result<(), ContractError> {
    let timeout_ms = settings.delivery.timeout_ms;
    if timeout_ms == 0 || timeout_ms > MAX_TIMEOUT_MS {
        return Err(ContractError::config_validation(
            "delivery.timeout_ms",
            format!("timeout_ms must be in 1..={MAX_TIMEOUT_MS}, got {timeout_ms}"),
        ));
    }
    Ok(())
}

/// 校验 pub/sub 配置
fn validate_pubsub(settings: &GathererSettings) -> Result<(), ContractError> {
    let pubsub = &settings.pubsub;

    if pubsub.topic.trim().is_empty() {
        return Err(ContractError::config_validation(
            "pubsub.topic",
            "topic cannot be empty",
        ));
    }

    match pubsub.transport {
        PubSubTransport::Udp => {
            let addr = pubsub.addr.as_deref().ok_or_else(|| {
                ContractError::config_validation("pubsub.addr", "udp transport requires addr")
            })?;
            addr.parse::<SocketAddr>().map_err(|e| {
                ContractError::config_validation(
                    "pubsub.addr",
                    format!("invalid address '{addr}': {e}"),
                )
            })?;
        }
        PubSubTransport::Channel => {
            let capacity = pubsub.channel_capacity;
            if capacity == 0 || capacity > MAX_CHANNEL_CAPACITY {
                return Err(ContractError::config_validation(
                    "pubsub.channel_capacity",
                    format!("channel_capacity must be in 1..={MAX_CHANNEL_CAPACITY}, got {capacity}"),
                ));
            }
        }
    }

    Ok(())
}

/// 校验用户目录
fn validate_users(settings: &GathererSettings) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, user) in settings.users.iter().enumerate() {
        if user.id.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("users[{}].id", idx),
                "user id cannot be empty",
            ));
        }
        if !seen.insert(&user.id) {
            return Err(ContractError::config_validation(
                format!("users[id={}]", user.id),
                "duplicate user id",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::UserConfig;

    fn enabled() -> GathererSettings {
        GathererSettings {
            project_info: true,
            project_endpoint: "http://stats.local/api/projects".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate(&GathererSettings::default()).is_ok());
        assert!(validate(&enabled()).is_ok());
    }

    #[test]
    fn test_enabled_requires_endpoint() {
        let mut settings = enabled();
        settings.project_endpoint = String::new();
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("project_endpoint"));
    }

    #[test]
    fn test_endpoint_scheme() {
        let mut settings = enabled();
        settings.project_endpoint = "ftp://stats.local/".to_string();
        assert!(validate(&settings).is_err());

        settings.project_endpoint = "not a url".to_string();
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut settings = enabled();
        settings.delivery.timeout_ms = 0;
        assert!(validate(&settings).is_err());

        settings.delivery.timeout_ms = MAX_TIMEOUT_MS + 1;
        assert!(validate(&settings).is_err());

        settings.delivery.timeout_ms = MAX_TIMEOUT_MS;
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_udp_requires_addr() {
        let mut settings = enabled();
        settings.pubsub.transport = PubSubTransport::Udp;
        assert!(validate(&settings).is_err());

        settings.pubsub.addr = Some("localhost".to_string());
        assert!(validate(&settings).is_err());

        settings.pubsub.addr = Some("127.0.0.1:7400".to_string());
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_channel_capacity_bounds() {
        let mut settings = enabled();
        settings.pubsub.channel_capacity = 0;
        assert!(validate(&settings).is_err());

        settings.pubsub.channel_capacity = MAX_CHANNEL_CAPACITY + 1;
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("channel_capacity"));

        settings.pubsub.channel_capacity = usize::MAX;
        assert!(validate(&settings).is_err());

        settings.pubsub.channel_capacity = MAX_CHANNEL_CAPACITY;
        assert!(validate(&settings).is_ok());
    }

    #[test]
    fn test_duplicate_user() {
        let mut settings = enabled();
        settings.users = vec![
            UserConfig {
                id: "alice".to_string(),
                full_name: None,
            },
            UserConfig {
                id: "alice".to_string(),
                full_name: Some("Alice".to_string()),
            },
        ];
        let err = validate(&settings).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
