//! StatusRecord - Record Builder output, Dispatcher input
//!
//! The normalized snapshot of one item lifecycle observation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status carried by a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Active,
    Disabled,
    Deleted,
}

impl ItemStatus {
    /// Map the config-state inspection result to a status
    pub fn from_disabled(disabled: bool) -> Self {
        if disabled {
            Self::Disabled
        } else {
            Self::Active
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Disabled => "DISABLED",
            Self::Deleted => "DELETED",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host lifecycle transition that triggered a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemEvent {
    Created,
    Updated,
    Deleted,
}

impl ItemEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ItemEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized telemetry record for one item event
///
/// Field names on the wire match the published record schema
/// (`itemName`, `itemURL`, `ciURL`, ...). Unset optional fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Item name at event time
    #[serde(rename = "itemName")]
    pub item_name: String,

    /// Host-relative locator of the item
    #[serde(rename = "itemURL")]
    pub item_url: String,

    /// Root locator of the host instance
    #[serde(rename = "ciURL")]
    pub ci_url: String,

    /// Acting user id (unset when the principal is unknown)
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Acting user display name
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Raw configuration at event time (unset when unreadable or on delete)
    #[serde(rename = "configContent", default, skip_serializing_if = "Option::is_none")]
    pub config_content: Option<String>,

    /// Set by creation events only
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Set by update and delete events
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    pub status: ItemStatus,
}

impl StatusRecord {
    /// Compare every field except the event timestamps
    pub fn eq_ignoring_timestamps(&self, other: &Self) -> bool {
        self.item_name == other.item_name
            && self.item_url == other.item_url
            && self.ci_url == other.ci_url
            && self.user_id == other.user_id
            && self.user_name == other.user_name
            && self.config_content == other.config_content
            && self.status == other.status
    }

    /// Serialize as a JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize as JSON bytes (message payloads)
    pub fn to_json_vec(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
