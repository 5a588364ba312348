//! Failover state control for OpenNebula virtual router appliances
//!
//! Consumes keepalived VRRP notifications, decides whether the local
//! instance has to bring its network functions up or down, and records
//! the last observed VRRP state on disk.

mod event;

pub use self::event::{Direction, VrrpEvent, VrrpEventKind, VrrpState};

pub mod notify;
pub mod retry;
pub mod store;
pub mod transition;
