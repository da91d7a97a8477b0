//! StaticHostContext - fixed host identity

use std::collections::HashMap;

use contracts::{GathererSettings, HostContext, UserRecord};

/// Host context with a fixed principal and user directory
#[derive(Debug, Clone, Default)]
pub struct StaticHostContext {
    root_url: String,
    principal: Option<String>,
    users: HashMap<String, UserRecord>,
}

impl StaticHostContext {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            ..Default::default()
        }
    }

    /// Build from settings; `principal` overrides `host.principal`
    pub fn from_settings(settings: &GathererSettings, principal: Option<String>) -> Self {
        let mut context = Self::new(settings.host.root_url.clone());
        context.principal = principal.or_else(|| settings.host.principal.clone());

        for user in &settings.users {
            let full_name = user.full_name.clone().unwrap_or_else(|| user.id.clone());
            context = context.with_user(user.id.clone(), full_name);
        }
        context
    }

    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Register a user reachable by its id
    pub fn with_user(mut self, id: impl Into<String>, full_name: impl Into<String>) -> Self {
        let id = id.into();
        self.users.insert(
            id.clone(),
            UserRecord {
                id,
                full_name: full_name.into(),
            },
        );
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl HostContext for StaticHostContext {
    fn root_url(&self) -> &str {
        &self.root_url
    }

    fn current_principal(&self) -> Option<String> {
        self.principal.clone()
    }

    fn find_user(&self, name: &str) -> Option<UserRecord> {
        self.users.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::UserConfig;

    #[test]
    fn test_from_settings() {
        let mut settings = GathererSettings::default();
        settings.host.root_url = "https://ci.example/".to_string();
        settings.host.principal = Some("bob".to_string());
        settings.users = vec![
            UserConfig {
                id: "alice".to_string(),
                full_name: Some("Alice Liddell".to_string()),
            },
            UserConfig {
                id: "bob".to_string(),
                full_name: None,
            },
        ];

        let host = StaticHostContext::from_settings(&settings, None);
        assert_eq!(host.root_url(), "https://ci.example/");
        assert_eq!(host.current_principal().as_deref(), Some("bob"));
        assert_eq!(host.find_user("bob").unwrap().full_name, "bob");
        assert_eq!(host.find_user("alice").unwrap().full_name, "Alice Liddell");
        assert_eq!(host.user_count(), 2);

        let host = StaticHostContext::from_settings(&settings, Some("alice".to_string()));
        assert_eq!(host.current_principal().as_deref(), Some("alice"));
    }

    #[test]
    fn test_unknown_user_is_none() {
        let host = StaticHostContext::new("http://ci/").with_principal("ghost");
        assert!(host.find_user("ghost").is_none());
    }
}
