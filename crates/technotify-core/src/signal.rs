//! Broadcast message model
//!
//! Every broadcast produced by the notifier is a property change on the
//! manager object. How a [`Signal`] is encoded on the wire is up to the
//! [`crate::Transport`] that carries it.

use serde::{Deserialize, Serialize};

/// Value of a changed manager property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Array of strings (technology lists)
    StringArray(Vec<String>),
    /// Single string (default technology)
    String(String),
    /// Boolean flag (offline mode)
    Bool(bool),
}

/// A property change broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Object path the signal is emitted from
    pub path: String,
    /// Interface the signal belongs to
    pub interface: String,
    /// Signal member name
    pub member: String,
    /// Name of the changed property
    pub property: String,
    /// New value of the property
    pub value: PropertyValue,
    /// Time the signal was built
    pub emitted_at: chrono::DateTime<chrono::Utc>,
}

impl Signal {
    /// Build a signal stamped with the current time
    pub fn new(
        path: impl Into<String>,
        interface: impl Into<String>,
        member: impl Into<String>,
        property: impl Into<String>,
        value: PropertyValue,
    ) -> Self {
        Self {
            path: path.into(),
            interface: interface.into(),
            member: member.into(),
            property: property.into(),
            value,
            emitted_at: chrono::Utc::now(),
        }
    }

    /// Serialize the signal as a single JSON line (for logging)
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
