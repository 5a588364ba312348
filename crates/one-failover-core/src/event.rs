//! VRRP notification event model

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of a keepalived notification
///
/// Only sync-group notifications drive failover transitions. Everything
/// else is classified but otherwise ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum VrrpEventKind {
    /// A `vrrp_sync_group` notification
    Group,

    /// A single `vrrp_instance` notification
    Instance,

    /// Any other notification type keepalived might emit
    Unknown,
}

impl VrrpEventKind {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("GROUP") {
            Self::Group
        } else if name.eq_ignore_ascii_case("INSTANCE") {
            Self::Instance
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "GROUP",
            Self::Instance => "INSTANCE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for VrrpEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A VRRP protocol state as announced by keepalived
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum VrrpState {
    Master,
    Backup,
    Fault,
    Stop,
    Deleted,

    /// Never announced by keepalived, used for anything unrecognized and
    /// for a store that has not been written yet
    Unknown,
}

impl VrrpState {
    /// Total, case-insensitive mapping from an announced state name
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("MASTER") {
            Self::Master
        } else if name.eq_ignore_ascii_case("BACKUP") {
            Self::Backup
        } else if name.eq_ignore_ascii_case("FAULT") {
            Self::Fault
        } else if name.eq_ignore_ascii_case("STOP") {
            Self::Stop
        } else if name.eq_ignore_ascii_case("DELETED") {
            Self::Deleted
        } else {
            Self::Unknown
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "MASTER",
            Self::Backup => "BACKUP",
            Self::Fault => "FAULT",
            Self::Stop => "STOP",
            Self::Deleted => "DELETED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// The fixed state classification table
    ///
    /// Only MASTER and BACKUP carry a direction. FAULT, STOP and DELETED
    /// leave the services as they are.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::Master => Direction::Up,
            Self::Backup => Direction::Down,
            Self::Fault | Self::Stop | Self::Deleted | Self::Unknown => Direction::Stay,
        }
    }
}

impl fmt::Display for VrrpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VrrpState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VrrpState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// The derived action for one event, never stored
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Stay,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stay => "stay",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keepalived notification, constructed per FIFO line
///
/// Trailing fields missing from the notification are `None`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VrrpEvent {
    pub kind: VrrpEventKind,
    pub name: Option<String>,
    pub state: Option<VrrpState>,

    /// VRRP priority, informational only
    pub priority: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_names_are_case_insensitive() {
        assert_eq!(VrrpState::Master, VrrpState::from_name("MASTER"));
        assert_eq!(VrrpState::Master, VrrpState::from_name("master"));
        assert_eq!(VrrpState::Backup, VrrpState::from_name("Backup"));
        assert_eq!(VrrpState::Unknown, VrrpState::from_name("SHUTDOWN"));
        assert_eq!(VrrpState::Unknown, VrrpState::from_name(""));
    }

    #[test]
    fn classification_table() {
        assert_eq!(Direction::Up, VrrpState::Master.direction());
        assert_eq!(Direction::Down, VrrpState::Backup.direction());
        assert_eq!(Direction::Stay, VrrpState::Fault.direction());
        assert_eq!(Direction::Stay, VrrpState::Stop.direction());
        assert_eq!(Direction::Stay, VrrpState::Deleted.direction());
        assert_eq!(Direction::Stay, VrrpState::Unknown.direction());
    }

    #[test]
    fn kind_names_are_case_insensitive() {
        assert_eq!(VrrpEventKind::Group, VrrpEventKind::from_name("group"));
        assert_eq!(VrrpEventKind::Instance, VrrpEventKind::from_name("INSTANCE"));
        assert_eq!(VrrpEventKind::Unknown, VrrpEventKind::from_name("MISC"));
    }
}
