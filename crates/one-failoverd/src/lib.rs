//! keepalived VRRP notify worker for OpenNebula virtual routers
//!
//! Reads notifications from the keepalived FIFO and toggles the
//! network-function services of the appliance according to the local
//! MASTER/BACKUP role.

pub mod command;
pub mod config;
pub mod driver;
pub mod envfile;
pub mod service;
pub mod toggler;
