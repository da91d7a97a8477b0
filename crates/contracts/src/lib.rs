//! # Contracts
//!
//! Frozen interface contracts between the item-stats crates and the host
//! that emits item lifecycle events.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Record Model
//! - One `StatusRecord` is built per lifecycle event and never mutated after dispatch
//! - Timestamps are UTC; exactly one of `createdAt` / `updatedAt` is set

mod error;
mod host;
mod item;
mod listener;
mod record;
mod settings;
mod sink;

pub use error::*;
pub use host::*;
pub use item::*;
pub use listener::*;
pub use record::*;
pub use settings::*;
pub use sink::*;
