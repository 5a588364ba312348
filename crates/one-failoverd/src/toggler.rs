//! Driving the service fleet up and down

use std::thread;

use one_failover_core::retry::RetryPolicy;

use crate::{
    config::Config,
    envfile::EnvOverlay,
    service::{ServiceManager, ServiceStatus},
};

// Readiness collaborators, queried but never toggled
const CONTEXT_SERVICE: &str = "one-context";
const KEEPALIVED_SERVICE: &str = "keepalived";

/// Applies an `up` or `down` pass to the supervised fleet
///
/// Both passes are convergent and tolerate individual command failures.
/// One broken service never blocks the rest of a pass.
#[derive(Debug)]
pub struct ServiceToggler<'a, M> {
    config: &'a Config,
    manager: M,
}

impl<'a, M> ServiceToggler<'a, M>
where
    M: ServiceManager,
{
    pub fn new(config: &'a Config, manager: M) -> Self {
        Self { config, manager }
    }

    /// Restart every enabled service, stop every disabled one
    ///
    /// Re-reads the context environment first so freshly written enable
    /// flags are honored. Finishes with one registration refresh so the
    /// runlevel changes take effect.
    pub fn up(&self) {
        log::info!("Bringing services up");
        self.wait_ready("master");
        let overlay = self.reload_env();
        for service in self.config.managed_services() {
            let result = if service.enabled(&overlay) {
                self.manager
                    .enable(service.name)
                    .and_then(|()| self.manager.restart(service.name))
            } else {
                self.manager
                    .stop(service.name)
                    .and_then(|()| self.manager.disable(service.name))
            };
            if let Err(err) = result {
                log::warn!("Skipping {}: {}", service.name, err);
            }
        }
        if let Err(err) = self.manager.update_registration() {
            log::warn!("Failed to refresh the service registration: {}", err);
        }
    }

    /// Stop every managed service that still runs, until none does
    ///
    /// Stops may race with the supervisor's own dependency ordering, so a
    /// single unconditional pass is not enough. Polls and stops only the
    /// remaining subset until it is empty or the budget is exhausted.
    pub fn down(&self) {
        log::info!("Taking services down");
        self.wait_ready("standby");
        let RetryPolicy { max_attempts, delay } = self.config.shutdown_retry;
        let mut attempt = 0;
        loop {
            let running = self.running_services();
            if running.is_empty() {
                log::debug!("All managed services are stopped");
                return;
            }
            if attempt >= max_attempts {
                log::error!(
                    "Services still running after {} attempts: {}",
                    max_attempts,
                    running.join(", ")
                );
                return;
            }
            attempt += 1;
            for name in &running {
                if let Err(err) = self.manager.stop(name) {
                    log::warn!("Failed to stop {}: {}", name, err);
                }
            }
            thread::sleep(delay);
        }
    }

    fn running_services(&self) -> Vec<&'static str> {
        self.config
            .managed_services()
            .filter(|service| !self.manager.status(service.name).is_stopped())
            .map(|service| service.name)
            .collect()
    }

    fn reload_env(&self) -> EnvOverlay {
        match EnvOverlay::load(&self.config.env_path) {
            Ok(overlay) => overlay,
            Err(err) => {
                log::debug!(
                    "No context environment at {}: {}",
                    self.config.env_path.display(),
                    err
                );
                EnvOverlay::default()
            }
        }
    }

    /// Best-effort wait for the readiness collaborators
    ///
    /// An exhausted budget is logged and the pass proceeds anyway,
    /// availability wins over strict ordering.
    fn wait_ready(&self, role: &str) {
        for name in [CONTEXT_SERVICE, KEEPALIVED_SERVICE] {
            let probe = self
                .config
                .readiness_retry
                .run(|| match self.manager.status(name) {
                    ServiceStatus::Started => Ok(()),
                    status => Err(status),
                });
            match probe {
                Ok(()) => log::debug!("{} is ready for the {} role", name, role),
                Err(status) => log::warn!(
                    "Proceeding for the {} role although {} is {:?}",
                    role,
                    name,
                    status
                ),
            }
        }
    }
}
