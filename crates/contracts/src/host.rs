//! Host context and feature flags
//!
//! Passed explicitly into listener entry points instead of being looked up
//! from process-wide state.

/// User directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub full_name: String,
}

/// Host identity and root locator
pub trait HostContext: Send + Sync {
    /// Root URL of the host instance
    fn root_url(&self) -> &str;

    /// Name of the currently authenticated principal
    fn current_principal(&self) -> Option<String>;

    /// Look up a user record by principal name
    fn find_user(&self, name: &str) -> Option<UserRecord>;
}

/// Process-wide switches read by the listener
pub trait FeatureFlags: Send + Sync {
    /// "project info enabled"
    fn project_info_enabled(&self) -> bool;

    /// REST endpoint that receives project records
    fn project_endpoint(&self) -> &str;
}

impl<T: FeatureFlags + ?Sized> FeatureFlags for std::sync::Arc<T> {
    fn project_info_enabled(&self) -> bool {
        (**self).project_info_enabled()
    }

    fn project_endpoint(&self) -> &str {
        (**self).project_endpoint()
    }
}
