//! Configuration types for the notification system

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Notifier configuration
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Object path broadcasts are emitted from
    #[serde(default = "default_manager_path")]
    pub manager_path: String,

    /// Interface broadcasts belong to
    #[serde(default = "default_manager_interface")]
    pub manager_interface: String,

    /// Signal member used for property changes
    #[serde(default = "default_signal_name")]
    pub signal_name: String,

    /// Capacity of the in-process broadcast channel
    ///
    /// Slow subscribers that fall this far behind miss signals (the channel
    /// reports how many were skipped).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl NotifierConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            manager_path: default_manager_path(),
            manager_interface: default_manager_interface(),
            signal_name: default_signal_name(),
            channel_capacity: default_channel_capacity(),
        }
    }

    /// Set the manager object path
    pub fn with_manager_path(mut self, path: impl Into<String>) -> Self {
        self.manager_path = path.into();
        self
    }

    /// Set the manager interface
    pub fn with_manager_interface(mut self, interface: impl Into<String>) -> Self {
        self.manager_interface = interface.into();
        self
    }

    /// Set the broadcast channel capacity
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.manager_path.starts_with('/') {
            return Err(crate::Error::config(format!(
                "Manager path must be absolute, got '{}'",
                self.manager_path
            )));
        }

        if self.manager_interface.is_empty() || !self.manager_interface.contains('.') {
            return Err(crate::Error::config(format!(
                "Manager interface must be a dotted name, got '{}'",
                self.manager_interface
            )));
        }

        if self.signal_name.is_empty() {
            return Err(crate::Error::config("Signal name cannot be empty"));
        }

        if self.channel_capacity == 0 {
            return Err(crate::Error::config("Channel capacity must be > 0"));
        }

        Ok(())
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_manager_path() -> String {
    "/".to_string()
}

fn default_manager_interface() -> String {
    "org.moblin.connman.Manager".to_string()
}

fn default_signal_name() -> String {
    "PropertyChanged".to_string()
}

fn default_channel_capacity() -> usize {
    64
}
