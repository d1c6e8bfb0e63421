//! Technology kinds and aggregate categories
//!
//! [`TechnologyKind`] is the closed set of network technology categories a
//! service can belong to. Only the *trackable* subset takes part in counting;
//! the others are accepted everywhere and ignored by every counting operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network technology category
///
/// Declaration order is the enumeration order used when listing kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechnologyKind {
    Unknown,
    System,
    Ethernet,
    Wifi,
    Wimax,
    Bluetooth,
    Cellular,
    Vpn,
}

impl TechnologyKind {
    /// Kinds that participate in reference counting, in enumeration order
    pub const TRACKABLE: [TechnologyKind; 5] = [
        TechnologyKind::Ethernet,
        TechnologyKind::Wifi,
        TechnologyKind::Wimax,
        TechnologyKind::Bluetooth,
        TechnologyKind::Cellular,
    ];

    /// Whether this kind participates in counting
    pub fn is_trackable(self) -> bool {
        self.slot().is_some()
    }

    /// Index into per-kind counter arrays, `None` for untracked kinds
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            TechnologyKind::Unknown | TechnologyKind::System | TechnologyKind::Vpn => None,
            TechnologyKind::Ethernet => Some(0),
            TechnologyKind::Wifi => Some(1),
            TechnologyKind::Wimax => Some(2),
            TechnologyKind::Bluetooth => Some(3),
            TechnologyKind::Cellular => Some(4),
        }
    }

    /// Published name of the kind
    ///
    /// Only trackable kinds resolve; `Unknown`, `System` and `Vpn` have no
    /// published name.
    pub fn name(self) -> Option<&'static str> {
        if self.is_trackable() {
            Some(self.as_str())
        } else {
            None
        }
    }

    /// Identifier used for display and parsing, defined for every kind
    pub fn as_str(self) -> &'static str {
        match self {
            TechnologyKind::Unknown => "unknown",
            TechnologyKind::System => "system",
            TechnologyKind::Ethernet => "ethernet",
            TechnologyKind::Wifi => "wifi",
            TechnologyKind::Wimax => "wimax",
            TechnologyKind::Bluetooth => "bluetooth",
            TechnologyKind::Cellular => "cellular",
            TechnologyKind::Vpn => "vpn",
        }
    }
}

impl fmt::Display for TechnologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechnologyKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unknown" => Ok(TechnologyKind::Unknown),
            "system" => Ok(TechnologyKind::System),
            "ethernet" => Ok(TechnologyKind::Ethernet),
            "wifi" => Ok(TechnologyKind::Wifi),
            "wimax" => Ok(TechnologyKind::Wimax),
            "bluetooth" => Ok(TechnologyKind::Bluetooth),
            "cellular" => Ok(TechnologyKind::Cellular),
            "vpn" => Ok(TechnologyKind::Vpn),
            other => Err(crate::Error::invalid_input(format!(
                "unknown technology '{}'",
                other
            ))),
        }
    }
}

/// Aggregate fact tracked per technology kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// At least one device of the kind is registered
    Registered,
    /// At least one device of the kind is enabled
    Enabled,
    /// At least one service of the kind is connected
    Connected,
}

impl Category {
    /// All categories, in counter-array order
    pub const ALL: [Category; 3] = [Category::Registered, Category::Enabled, Category::Connected];

    pub(crate) fn slot(self) -> usize {
        match self {
            Category::Registered => 0,
            Category::Enabled => 1,
            Category::Connected => 2,
        }
    }

    /// Manager property carrying the list of kinds in this category
    pub fn property_name(self) -> &'static str {
        match self {
            Category::Registered => "AvailableTechnologies",
            Category::Enabled => "EnabledTechnologies",
            Category::Connected => "ConnectedTechnologies",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Registered => "registered",
            Category::Enabled => "enabled",
            Category::Connected => "connected",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trackable_subset() {
        for kind in TechnologyKind::TRACKABLE {
            assert!(kind.is_trackable(), "{} should be trackable", kind);
        }

        assert!(!TechnologyKind::Unknown.is_trackable());
        assert!(!TechnologyKind::System.is_trackable());
        assert!(!TechnologyKind::Vpn.is_trackable());
    }

    #[test]
    fn test_slots_are_distinct() {
        let slots: Vec<usize> = TechnologyKind::TRACKABLE
            .iter()
            .filter_map(|k| k.slot())
            .collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_names() {
        assert_eq!(TechnologyKind::Wifi.name(), Some("wifi"));
        assert_eq!(TechnologyKind::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_untracked_kinds_have_no_name() {
        for kind in [TechnologyKind::Unknown, TechnologyKind::System, TechnologyKind::Vpn] {
            assert_eq!(kind.name(), None, "{} should not resolve", kind);
        }

        // Display and parsing still know them
        assert_eq!(TechnologyKind::Vpn.to_string(), "vpn");
        assert_eq!("vpn".parse::<TechnologyKind>().unwrap(), TechnologyKind::Vpn);
        assert_eq!("system".parse::<TechnologyKind>().unwrap(), TechnologyKind::System);
    }

    #[test]
    fn test_parse() {
        assert_eq!("wifi".parse::<TechnologyKind>().unwrap(), TechnologyKind::Wifi);
        assert_eq!(
            " Ethernet ".parse::<TechnologyKind>().unwrap(),
            TechnologyKind::Ethernet
        );
        assert!("token-ring".parse::<TechnologyKind>().is_err());
    }

    #[test]
    fn test_property_names() {
        assert_eq!(Category::Registered.property_name(), "AvailableTechnologies");
        assert_eq!(Category::Enabled.property_name(), "EnabledTechnologies");
        assert_eq!(Category::Connected.property_name(), "ConnectedTechnologies");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TechnologyKind::Bluetooth).unwrap();
        assert_eq!(json, "\"bluetooth\"");

        let category: Category = serde_json::from_str("\"connected\"").unwrap();
        assert_eq!(category, Category::Connected);
    }
}
