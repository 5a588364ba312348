//! FIFO event loop
//!
//! keepalived writes one notification per line into the FIFO. The loop is
//! the single reader; a second reader would nondeterministically split the
//! notification stream.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    thread,
};

use anyhow::Result;

use one_failover_core::{notify, transition::Resolver, Direction};

use crate::{config::Config, service::ServiceManager, toggler::ServiceToggler};

/// Reads keepalived notifications and dispatches them until the process
/// is killed
#[derive(Debug)]
pub struct EventLoop<'a, M> {
    config: &'a Config,
    resolver: Resolver,
    toggler: ServiceToggler<'a, M>,
}

impl<'a, M> EventLoop<'a, M>
where
    M: ServiceManager,
{
    pub fn new(config: &'a Config, resolver: Resolver, toggler: ServiceToggler<'a, M>) -> Self {
        Self {
            config,
            resolver,
            toggler,
        }
    }

    /// Serve the FIFO forever
    ///
    /// Every cycle failure is isolated: the error is logged, the services
    /// are forced down so no two instances can both act as MASTER, and the
    /// FIFO is reopened after a short pause. End-of-file only means the
    /// writer went away; reopening blocks until the next one appears.
    pub fn run(&self) -> ! {
        loop {
            if let Err(err) = self.cycle() {
                log::error!("Failover cycle failed: {:#}", err);
                self.toggler.down();
                thread::sleep(self.config.reopen_delay);
            }
        }
    }

    fn cycle(&self) -> Result<()> {
        let fifo = File::open(&self.config.fifo_path)?;
        log::debug!("Listening on {}", self.config.fifo_path.display());
        self.serve(BufReader::new(fifo))
    }

    fn serve(&self, reader: impl BufRead) -> Result<()> {
        for line in reader.lines() {
            self.dispatch(&line?)?;
        }
        Ok(())
    }

    fn dispatch(&self, line: &str) -> Result<()> {
        let event = notify::parse_notify_line(line);
        let resolution = self.resolver.resolve(&event)?;
        log::info!("{}", resolution);
        match resolution.direction {
            Direction::Up => self.toggler.up(),
            Direction::Down => self.toggler.down(),
            Direction::Stay => log::debug!("Nothing to do"),
        }
        Ok(())
    }
}
