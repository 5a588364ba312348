//! Worker configuration
//!
//! Everything is resolved once at process start and passed by reference
//! into the components. Only the per-service enable flags are re-read at
//! runtime, on every `up` pass.

use std::{env, path::PathBuf, time::Duration};

use one_failover_core::retry::RetryPolicy;

use crate::envfile::EnvOverlay;

pub const DEFAULT_FIFO_PATH: &str = "/run/keepalived/vrrp_notify_fifo.sock";
pub const DEFAULT_STATE_PATH: &str = "/run/one-failover.state";
pub const DEFAULT_ENV_PATH: &str = "/run/one-context/one_env";

const DEFAULT_READINESS_RETRY: RetryPolicy = RetryPolicy::new(12, Duration::from_secs(5));
const DEFAULT_SHUTDOWN_RETRY: RetryPolicy = RetryPolicy::new(5, Duration::from_secs(1));
const DEFAULT_REOPEN_DELAY: Duration = Duration::from_secs(1);

/// One supervised network-function service
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ServiceDescriptor {
    /// OpenRC service name
    pub name: &'static str,

    /// Context variable that opts the service into the `up` pass
    pub enabled_by: Option<&'static str>,

    /// Fallback when the variable is unset everywhere
    pub enabled_default: bool,

    /// Dependency services are only ever toggled through their owner
    pub dependency: bool,
}

impl ServiceDescriptor {
    /// Evaluate the enabling flag
    ///
    /// Lookup order: context overlay, process environment, table fallback.
    #[must_use]
    pub fn enabled(&self, overlay: &EnvOverlay) -> bool {
        let Self {
            enabled_by,
            enabled_default,
            ..
        } = self;
        match enabled_by {
            Some(name) => overlay
                .get(name)
                .map(parse_flag)
                .or_else(|| env::var(name).ok().map(|value| parse_flag(&value)))
                .unwrap_or(*enabled_default),
            None => *enabled_default,
        }
    }
}

/// The fixed service fleet, in toggle order
///
/// `haproxy` is listed so the ownership is on record, but it is only ever
/// started and stopped through `one-haproxy`.
fn service_table() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor {
            name: "one-router4",
            enabled_by: Some("ONEAPP_VNF_ROUTER4_ENABLED"),
            enabled_default: true,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-nat4",
            enabled_by: Some("ONEAPP_VNF_NAT4_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-sdnat4",
            enabled_by: Some("ONEAPP_VNF_SDNAT4_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-lvs",
            enabled_by: Some("ONEAPP_VNF_LB_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-haproxy",
            enabled_by: Some("ONEAPP_VNF_HAPROXY_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-dns",
            enabled_by: Some("ONEAPP_VNF_DNS_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-dhcp4",
            enabled_by: Some("ONEAPP_VNF_DHCP4_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "one-wg",
            enabled_by: Some("ONEAPP_VNF_WG_ENABLED"),
            enabled_default: false,
            dependency: false,
        },
        ServiceDescriptor {
            name: "haproxy",
            enabled_by: None,
            enabled_default: false,
            dependency: true,
        },
    ]
}

#[derive(Debug, Clone)]
pub struct Config {
    pub fifo_path: PathBuf,
    pub state_path: PathBuf,
    pub env_path: PathBuf,
    pub services: Vec<ServiceDescriptor>,
    pub readiness_retry: RetryPolicy,
    pub shutdown_retry: RetryPolicy,

    /// Pause before the FIFO is reopened after a faulted cycle
    pub reopen_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fifo_path: PathBuf::from(DEFAULT_FIFO_PATH),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            env_path: PathBuf::from(DEFAULT_ENV_PATH),
            services: service_table(),
            readiness_retry: DEFAULT_READINESS_RETRY,
            shutdown_retry: DEFAULT_SHUTDOWN_RETRY,
            reopen_delay: DEFAULT_REOPEN_DELAY,
        }
    }
}

impl Config {
    /// Table entries that may be toggled directly
    pub fn managed_services(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter().filter(|service| !service.dependency)
    }
}

/// `YES`/`1` (any case) opt in, everything else opts out
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("YES") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values() {
        assert!(parse_flag("YES"));
        assert!(parse_flag("yes"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("NO"));
        assert!(!parse_flag("no"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("true"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn dependency_services_are_not_managed() {
        let config = Config::default();
        let managed: Vec<_> = config
            .managed_services()
            .map(|service| service.name)
            .collect();
        assert!(!managed.contains(&"haproxy"));
        assert_eq!(config.services.len() - 1, managed.len());
    }

    #[test]
    fn overlay_takes_precedence_over_fallback() {
        let service = ServiceDescriptor {
            name: "one-dns",
            enabled_by: Some("ONEAPP_VNF_DNS_TEST_FLAG"),
            enabled_default: false,
            dependency: false,
        };

        let overlay = EnvOverlay::parse("export ONEAPP_VNF_DNS_TEST_FLAG=\"YES\"\n");
        assert!(service.enabled(&overlay));

        assert!(!service.enabled(&EnvOverlay::default()));
    }

    #[test]
    fn dependency_entry_falls_back_to_default() {
        let service = ServiceDescriptor {
            name: "haproxy",
            enabled_by: None,
            enabled_default: false,
            dependency: true,
        };
        assert!(!service.enabled(&EnvOverlay::default()));
    }
}
