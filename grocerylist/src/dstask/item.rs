//! Grocery item records as reported by dstask

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier the external tool uses for an item
///
/// dstask reports ids as integers in JSON and as leading digits in text
/// output; callers pass them back as strings. The token is never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string token
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the token is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Integer(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Option::<RawId>::deserialize(deserializer)? {
            None => Self::default(),
            Some(RawId::Integer(n)) => Self(n.to_string()),
            // Integral floats such as `4.0` are the same task as `4`
            Some(RawId::Float(n)) if n.is_finite() && n.fract() == 0.0 => {
                Self(format!("{n:.0}"))
            }
            Some(RawId::Float(n)) => Self(n.to_string()),
            Some(RawId::Text(s)) => Self(s),
        })
    }
}

/// A single task on the grocery list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Tool-assigned identifier, blank when the record carried none
    #[serde(default)]
    pub id: ItemId,
    /// Free-text description
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    /// Lifecycle state such as `pending` or `resolved`
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Labels attached by the tool
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Priority, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Stable identifier across id reassignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Project the task belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Resolution timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    /// Due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

/// Go marshals nil slices and empty values as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GroceryItem {
    /// Create an item with just the fields line-mode output carries
    pub fn new(
        id: impl Into<ItemId>,
        status: impl Into<String>,
        summary: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            summary: summary.into(),
            status: status.into(),
            tags,
            priority: None,
            uuid: None,
            notes: None,
            project: None,
            created: None,
            resolved: None,
            due: None,
        }
    }

    /// Check whether the item carries `tag`, with or without its leading `+`
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim_start_matches('+');
        self.tags
            .iter()
            .any(|t| t.trim_start_matches('+') == wanted)
    }

    /// The priority worth showing, if it differs from `default_priority`
    pub fn notable_priority(&self, default_priority: &str) -> Option<&str> {
        self.priority
            .as_deref()
            .filter(|p| !p.is_empty() && *p != default_priority)
    }

    /// Summary prefixed with `[priority] ` when the priority is not the default
    pub fn label(&self, default_priority: &str) -> String {
        match self.notable_priority(default_priority) {
            Some(priority) => format!("[{priority}] {}", self.summary),
            None => self.summary.clone(),
        }
    }
}
