//! ItemListener trait - host registration interface
//!
//! The host calls exactly one entry point per lifecycle transition.
//! Entry points return nothing: listener failures never reach the host.

use crate::{HostContext, Item};

/// Item lifecycle listener
#[trait_variant::make(ItemListener: Send)]
pub trait LocalItemListener {
    /// Item was created
    async fn on_created(&self, item: &dyn Item, host: &dyn HostContext);

    /// Item configuration was saved
    async fn on_updated(&self, item: &dyn Item, host: &dyn HostContext);

    /// Item is being removed
    async fn on_deleted(&self, item: &dyn Item, host: &dyn HostContext);
}
