//! VRRP state transition resolution

use std::fmt;

use crate::{
    event::{Direction, VrrpEvent, VrrpEventKind, VrrpState},
    store::{Result, StateStore},
};

/// Outcome of matching one event against the recorded state
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Resolution {
    pub event: VrrpEvent,
    pub from: VrrpState,
    pub to: VrrpState,
    pub direction: Direction,

    /// Set for every notification that is not a sync-group notification
    pub ignored: bool,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.event.name.as_deref().unwrap_or("?");
        if self.ignored {
            write!(f, "{} \"{}\": ignored", self.event.kind, name)
        } else {
            write!(
                f,
                "{} \"{}\": {} -> {} ({})",
                self.event.kind, name, self.from, self.to, self.direction
            )
        }
    }
}

/// Decides the direction for incoming events and keeps the store current
#[derive(Debug, Clone)]
pub struct Resolver {
    store: StateStore,
}

impl Resolver {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// Classify `event` against the previously recorded state
    ///
    /// For sync-group events the raw announced state is recorded afterwards,
    /// independent of the computed direction. The store always reflects the
    /// last VRRP state seen, not the last direction acted upon.
    pub fn resolve(&self, event: &VrrpEvent) -> Result<Resolution> {
        let to = event.state.unwrap_or(VrrpState::Unknown);
        let from = self.store.load()?.state;
        let (direction, ignored) = if event.kind != VrrpEventKind::Group {
            (Direction::Stay, true)
        } else if to == VrrpState::Backup {
            // Losing mastership always forces a down pass, even when the
            // recorded state is already BACKUP. After a crash-restart the
            // recorded "already down" cannot be trusted.
            (Direction::Down, false)
        } else if to.direction() == from.direction() {
            // Same direction class, nothing would change
            (Direction::Stay, false)
        } else {
            (to.direction(), false)
        };
        if event.kind == VrrpEventKind::Group {
            self.store.save(to)?;
        }
        Ok(Resolution {
            event: event.clone(),
            from,
            to,
            direction,
            ignored,
        })
    }
}
