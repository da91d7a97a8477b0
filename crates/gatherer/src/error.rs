//! Gatherer 错误类型

use thiserror::Error;

/// Gatherer 错误
#[derive(Debug, Error)]
pub enum GathererError {
    /// 配置不是合法 XML
    #[error("config is not well-formed XML: {0}")]
    ConfigSyntax(#[from] roxmltree::Error),

    /// `disabled` 的值不是布尔值
    #[error("disabled flag is not a boolean: {found}")]
    DisabledNotBoolean {
        /// 实际找到的值
        found: String,
    },
}

/// Gatherer Result 类型别名
pub type Result<T> = std::result::Result<T, GathererError>;
