//! Host item source
//!
//! Items are host-managed units whose lifecycle is observable. Only the
//! configurable variant carries a raw configuration blob.

use crate::ContractError;

/// Host-managed item as seen by listeners
pub trait Item: Send + Sync {
    /// Identifying name at event time
    fn name(&self) -> &str;

    /// Name shown to operators (used in log lines)
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Host-relative locator
    fn url(&self) -> &str;

    /// Narrow to the configurable variant
    ///
    /// Plain containers return `None`.
    fn as_configurable(&self) -> Option<&dyn ConfigurableItem> {
        None
    }
}

/// Item variant that owns a serialized configuration
pub trait ConfigurableItem: Item {
    /// Read the raw configuration (XML) as currently stored
    fn config_as_string(&self) -> std::io::Result<String>;
}

/// Narrow `item`, turning a plain container into `NotConfigurable`
pub fn require_configurable(item: &dyn Item) -> Result<&dyn ConfigurableItem, ContractError> {
    item.as_configurable()
        .ok_or_else(|| ContractError::not_configurable(item.display_name()))
}
