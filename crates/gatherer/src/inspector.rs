//! Config-state inspector
//!
//! Converts an item's XML configuration into a generic key/value tree and
//! reads the `disabled` flag from it. Only the first nested section among
//! the top-level keys is examined.

use std::borrow::Cow;

use roxmltree::{Document, Node, ParsingOptions};
use tracing::warn;

use crate::error::{GathererError, Result};

/// Key of the operational flag
pub const DISABLED_KEY: &str = "disabled";

/// Key holding element text that sits next to child elements
const CONTENT_KEY: &str = "content";

/// Substitute for character references XML 1.0 cannot carry
const REPLACEMENT_REF: &str = "&#xFFFD;";

/// C0 control characters allowed as references in XML 1.1 but not in 1.0
fn is_restricted(c: u32) -> bool {
    matches!(c, 0x1..=0x8 | 0xB | 0xC | 0xE..=0x1F)
}

/// Rewrite restricted character references (`&#x1b;`, `&#27;`) to U+FFFD
fn neutralize_char_refs(raw: &str) -> Cow<'_, str> {
    if !raw.contains("&#") {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("&#") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 2..];
        let code = tail.find(';').and_then(|end| {
            let digits = &tail[..end];
            let value = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => digits.parse::<u32>().ok(),
            };
            value.map(|v| (v, end))
        });

        match code {
            Some((value, end)) if is_restricted(value) => {
                out.push_str(REPLACEMENT_REF);
                rest = &tail[end + 1..];
            }
            _ => {
                out.push_str("&#");
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// One value in the configuration tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNode {
    /// Leaf text (trimmed), empty for empty elements
    Text(String),
    /// Attributes then child elements, in document order
    Map(Vec<(String, ConfigNode)>),
    /// Repeated sibling elements sharing a name
    List(Vec<ConfigNode>),
}

impl ConfigNode {
    /// Entry `key` of a map node
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// `true`/`false` text, case-insensitive
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Text(text) if text.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(text) if text.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("'{text}'"),
            Self::Map(_) => "a nested section".to_string(),
            Self::List(items) => format!("{} repeated elements", items.len()),
        }
    }

    fn from_element(node: Node<'_, '_>) -> Self {
        let mut entries: Vec<(String, ConfigNode)> = node
            .attributes()
            .map(|a| (a.name().to_string(), Self::Text(a.value().trim().to_string())))
            .collect();
        let mut text = String::new();

        for child in node.children() {
            if child.is_element() {
                insert(&mut entries, child.tag_name().name(), Self::from_element(child));
            } else if child.is_text() {
                text.push_str(child.text().unwrap_or_default());
            }
        }

        let text = text.trim();
        if entries.is_empty() {
            return Self::Text(text.to_string());
        }
        if !text.is_empty() {
            insert(&mut entries, CONTENT_KEY, Self::Text(text.to_string()));
        }
        Self::Map(entries)
    }
}

fn insert(entries: &mut Vec<(String, ConfigNode)>, key: &str, value: ConfigNode) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some((_, ConfigNode::List(items))) => items.push(value),
        Some((_, existing)) => {
            let first = std::mem::replace(existing, ConfigNode::List(Vec::new()));
            *existing = ConfigNode::List(vec![first, value]);
        }
        None => entries.push((key.to_string(), value)),
    }
}

/// Configuration converted to a key/value tree
///
/// The document element is the single top-level key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    entries: Vec<(String, ConfigNode)>,
}

impl ConfigTree {
    /// Parse raw XML
    ///
    /// Accepts a DOCTYPE and XML 1.1 control-character references.
    pub fn parse(raw: &str) -> Result<Self> {
        let text = neutralize_char_refs(raw);
        let mut options = ParsingOptions::default();
        options.allow_dtd = true;
        let doc = Document::parse_with_options(&text, options)?;
        let root = doc.root_element();

        Ok(Self {
            entries: vec![(
                root.tag_name().name().to_string(),
                ConfigNode::from_element(root),
            )],
        })
    }

    /// Top-level entries
    pub fn entries(&self) -> &[(String, ConfigNode)] {
        &self.entries
    }

    /// First top-level value that is a nested section
    pub fn first_section(&self) -> Option<&ConfigNode> {
        self.entries.iter().map(|(_, v)| v).find(|v| v.is_map())
    }
}

/// Read the disabled flag
///
/// `Ok(false)` when there is no nested section or it has no `disabled` key.
///
/// # Errors
/// Malformed XML, or a `disabled` value that is not a boolean.
pub fn inspect(raw: &str) -> Result<bool> {
    let tree = ConfigTree::parse(raw)?;
    let Some(section) = tree.first_section() else {
        return Ok(false);
    };

    match section.get(DISABLED_KEY) {
        None => Ok(false),
        Some(value) => value.as_bool().ok_or_else(|| GathererError::DisabledNotBoolean {
            found: value.describe(),
        }),
    }
}

/// Fail-open form of [`inspect`]: any parse failure reads as enabled
pub fn is_disabled(raw: &str) -> bool {
    inspect(raw).unwrap_or_else(|e| {
        warn!(error = %e, "Disabled flag inspection failed, treating item as active");
        false
    })
}
