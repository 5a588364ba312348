//! OpenRC service control

use crate::command::{CommandRunner, Result};

/// Live status of a supervised service
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ServiceStatus {
    Started,
    Stopped,

    /// Started once but no longer running, or the probe itself failed
    Crashed,
}

impl ServiceStatus {
    #[must_use]
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

/// The service-manager primitives the failover passes need
pub trait ServiceManager {
    fn start(&self, name: &str) -> Result<()>;
    fn stop(&self, name: &str) -> Result<()>;
    fn restart(&self, name: &str) -> Result<()>;

    /// Probe the live status of a single service
    fn status(&self, name: &str) -> ServiceStatus;

    /// Add the service to the default runlevel
    fn enable(&self, name: &str) -> Result<()>;

    /// Remove the service from the default runlevel
    fn disable(&self, name: &str) -> Result<()>;

    /// Re-register the enabled set with the supervisor
    fn update_registration(&self) -> Result<()>;
}

// `rc-service <name> status` exit codes
const RC_STATUS_STOPPED: i32 = 3;

/// `rc-service`/`rc-update` backed implementation
#[derive(Debug, Clone)]
pub struct OpenRc<R> {
    runner: R,
}

impl<R> OpenRc<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R> ServiceManager for OpenRc<R>
where
    R: CommandRunner,
{
    fn start(&self, name: &str) -> Result<()> {
        self.runner.run("rc-service", &[name, "start"])
    }

    fn stop(&self, name: &str) -> Result<()> {
        self.runner.run("rc-service", &[name, "stop"])
    }

    fn restart(&self, name: &str) -> Result<()> {
        self.runner.run("rc-service", &[name, "restart"])
    }

    fn status(&self, name: &str) -> ServiceStatus {
        match self.runner.run("rc-service", &[name, "status"]) {
            Ok(()) => ServiceStatus::Started,
            Err(err) if err.exit_code() == Some(RC_STATUS_STOPPED) => ServiceStatus::Stopped,
            Err(_) => ServiceStatus::Crashed,
        }
    }

    fn enable(&self, name: &str) -> Result<()> {
        self.runner.run("rc-update", &["add", name, "default"])
    }

    fn disable(&self, name: &str) -> Result<()> {
        self.runner.run("rc-update", &["del", name, "default"])
    }

    fn update_registration(&self) -> Result<()> {
        self.runner.run("rc-update", &["-u"])
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{cell::RefCell, collections::HashSet, rc::Rc};

    use super::{Result, ServiceManager, ServiceStatus};

    /// Records every invocation and keeps a fake running set
    #[derive(Debug, Default, Clone)]
    pub struct RecordingManager {
        pub calls: Rc<RefCell<Vec<String>>>,
        pub running: Rc<RefCell<HashSet<String>>>,
    }

    impl RecordingManager {
        pub fn with_running(names: &[&str]) -> Self {
            let manager = Self::default();
            for name in names {
                manager.running.borrow_mut().insert((*name).to_owned());
            }
            manager
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn count_calls(&self, call: &str) -> usize {
            self.calls.borrow().iter().filter(|c| *c == call).count()
        }

        fn record(&self, call: String) {
            self.calls.borrow_mut().push(call);
        }
    }

    impl ServiceManager for RecordingManager {
        fn start(&self, name: &str) -> Result<()> {
            self.record(format!("start {}", name));
            self.running.borrow_mut().insert(name.to_owned());
            Ok(())
        }

        fn stop(&self, name: &str) -> Result<()> {
            self.record(format!("stop {}", name));
            self.running.borrow_mut().remove(name);
            Ok(())
        }

        fn restart(&self, name: &str) -> Result<()> {
            self.record(format!("restart {}", name));
            self.running.borrow_mut().insert(name.to_owned());
            Ok(())
        }

        fn status(&self, name: &str) -> ServiceStatus {
            self.record(format!("status {}", name));
            if self.running.borrow().contains(name) {
                ServiceStatus::Started
            } else {
                ServiceStatus::Stopped
            }
        }

        fn enable(&self, name: &str) -> Result<()> {
            self.record(format!("enable {}", name));
            Ok(())
        }

        fn disable(&self, name: &str) -> Result<()> {
            self.record(format!("disable {}", name));
            Ok(())
        }

        fn update_registration(&self) -> Result<()> {
            self.record("update".to_owned());
            Ok(())
        }
    }
}
