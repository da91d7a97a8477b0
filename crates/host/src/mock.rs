//! Mock host collaborators
//!
//! 用于无宿主环境的测试。

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contracts::{ConfigurableItem, HostContext, Item, UserRecord};

/// Configurable item with fixed config text or a forced read error
#[derive(Debug, Clone)]
pub struct MockItem {
    name: String,
    display_name: String,
    url: String,
    config: Result<String, io::ErrorKind>,
    reads: Arc<AtomicU64>,
}

impl MockItem {
    /// Item whose config reads as `config`
    pub fn new(name: &str, config: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: name.to_string(),
            url: format!("job/{name}/"),
            config: Ok(config.to_string()),
            reads: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Item whose config read always fails with `kind`
    pub fn unreadable(name: &str, kind: io::ErrorKind) -> Self {
        Self {
            config: Err(kind),
            ..Self::new(name, "")
        }
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    /// Number of config reads so far
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }
}

impl Item for MockItem {
    fn name(&self) -> &str {
        &self.name
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn as_configurable(&self) -> Option<&dyn ConfigurableItem> {
        Some(self)
    }
}

impl ConfigurableItem for MockItem {
    fn config_as_string(&self) -> io::Result<String> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        match &self.config {
            Ok(text) => Ok(text.clone()),
            Err(kind) => Err(io::Error::new(*kind, "mock config read failure")),
        }
    }
}

/// Non-configurable container
#[derive(Debug, Clone)]
pub struct MockFolder {
    name: String,
    url: String,
}

impl MockFolder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: format!("job/{name}/"),
        }
    }
}

impl Item for MockFolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }
}

/// Host context with an optional principal and user
#[derive(Debug, Clone, Default)]
pub struct MockHostContext {
    pub root_url: String,
    pub principal: Option<String>,
    pub user: Option<UserRecord>,
}

impl MockHostContext {
    /// Anonymous host at `root_url`
    pub fn new(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            ..Default::default()
        }
    }

    /// Authenticated as `id`, resolvable to `full_name`
    pub fn with_user(mut self, id: &str, full_name: &str) -> Self {
        self.principal = Some(id.to_string());
        self.user = Some(UserRecord {
            id: id.to_string(),
            full_name: full_name.to_string(),
        });
        self
    }

    /// Authenticated as `id`, with no matching user record
    pub fn with_unknown_principal(mut self, id: &str) -> Self {
        self.principal = Some(id.to_string());
        self.user = None;
        self
    }
}

impl HostContext for MockHostContext {
    fn root_url(&self) -> &str {
        &self.root_url
    }

    fn current_principal(&self) -> Option<String> {
        self.principal.clone()
    }

    fn find_user(&self, name: &str) -> Option<UserRecord> {
        self.user.clone().filter(|u| u.id == name)
    }
}
