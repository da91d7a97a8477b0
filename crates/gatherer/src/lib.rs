//! # Gatherer
//!
//! 条目生命周期事件 → 状态记录 → 多 sink 分发。
//!
//! 负责：
//! - 根据功能开关与条目类型过滤事件
//! - 构建 `StatusRecord`（条目、宿主、用户、配置）
//! - 从 XML 配置推断 `disabled` 状态（解析失败按启用处理）
//! - 交给 `Dispatcher` 分发，任何失败都不会传回宿主
//!
//! ## 使用示例
//!
//! ```ignore
//! use gatherer::ItemStatsListener;
//!
//! let dispatcher = Arc::new(create_dispatcher(&settings).await?);
//! let listener = ItemStatsListener::new(dispatcher, settings.clone());
//! listener.on_updated(&item, &host).await;
//! ```

pub mod builder;
pub mod error;
pub mod inspector;
pub mod listener;

pub use builder::RecordBuilder;
pub use error::{GathererError, Result};
pub use inspector::{inspect, is_disabled, ConfigNode, ConfigTree};
pub use listener::ItemStatsListener;
