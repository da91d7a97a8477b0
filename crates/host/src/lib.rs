//! # Host
//!
//! Host-side collaborators for the item-stats listener.
//!
//! - `FsItem`: items read from a directory tree (a job is a directory holding
//!   `config.xml`, anything else is a folder)
//! - `StaticHostContext`: root URL, principal and a fixed user directory
//! - `mock`: in-memory doubles for tests
//!
//! ## Usage Example
//!
//! ```ignore
//! use host::{FsItem, StaticHostContext};
//!
//! let host = StaticHostContext::from_settings(&settings, Some("alice".into()));
//! let item = FsItem::open("jobs/nightly")?;
//! listener.on_updated(&item, &host).await;
//! ```

mod context;
mod fs;
pub mod mock;

pub use context::StaticHostContext;
pub use fs::{FsFolder, FsItem, FsJob, CONFIG_FILE};
