// Licensed under the Apache-2.0 license

//! Pin request semantics and the shared-pin drive model.

use crate::io::{PinDef, IO_COMMON, IO_REV_1_7, IO_REV_2_0};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use ulx3s_config::{BoardRevision, SocConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("pin {0:?} is not in the board's pin table")]
    MissingPin(String),

    #[error("pin {0:?} was already requested by another consumer")]
    PinAlreadyRequested(String),

    #[error("extension pin {0:?} collides with an existing pin")]
    DuplicatePin(String),
}

/// Logical consumer currently driving a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOwner {
    /// Undriven; reset state until some logic evaluates.
    None,
    /// SD-card peripheral output forwarded onto the pin.
    SdCard,
    /// Wireless module control path.
    Wifi,
}

#[derive(Clone)]
struct PinState {
    level: Rc<Cell<bool>>,
    owner: Rc<Cell<PinOwner>>,
}

impl PinState {
    fn new() -> Self {
        Self {
            level: Rc::new(Cell::new(false)),
            owner: Rc::new(Cell::new(PinOwner::None)),
        }
    }
}

/// Exclusive driver handle for one physical pin. Handed out once per
/// composed system.
pub struct Pin {
    def: PinDef,
    state: PinState,
}

impl Pin {
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn site(&self) -> &'static str {
        self.def.site
    }

    /// Drive the pin. Owner and level change together so there is never an
    /// instant where two sources reach the pin.
    pub fn drive(&self, owner: PinOwner, level: bool) {
        self.state.owner.set(owner);
        self.state.level.set(level);
    }

    pub fn level(&self) -> bool {
        self.state.level.get()
    }

    pub fn owner(&self) -> PinOwner {
        self.state.owner.get()
    }
}

/// Read-only observer of a pin's electrical state.
#[derive(Clone)]
pub struct PinProbe {
    state: PinState,
}

impl PinProbe {
    pub fn level(&self) -> bool {
        self.state.level.get()
    }

    pub fn owner(&self) -> PinOwner {
        self.state.owner.get()
    }
}

struct PinSlot {
    def: PinDef,
    state: PinState,
    requested: bool,
}

/// The board's pin table, built from a validated configuration.
pub struct Platform {
    revision: BoardRevision,
    part_number: String,
    slots: Vec<PinSlot>,
}

impl Platform {
    pub fn new(config: &SocConfig) -> Self {
        let revision_io = match config.revision {
            BoardRevision::Rev1_7 => IO_REV_1_7,
            BoardRevision::Rev2_0 => IO_REV_2_0,
        };
        let slots = IO_COMMON
            .iter()
            .chain(revision_io.iter())
            .map(|def| PinSlot {
                def: *def,
                state: PinState::new(),
                requested: false,
            })
            .collect();
        Self {
            revision: config.revision,
            part_number: config.device.part_number(),
            slots,
        }
    }

    pub fn revision(&self) -> BoardRevision {
        self.revision
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    /// Append extension pins to the table. Rejects names that collide with
    /// the stock definition.
    pub fn extend_io(&mut self, defs: &[PinDef]) -> Result<(), PlatformError> {
        for def in defs {
            if self.slots.iter().any(|s| s.def.name == def.name) {
                return Err(PlatformError::DuplicatePin(def.name.to_string()));
            }
            self.slots.push(PinSlot {
                def: *def,
                state: PinState::new(),
                requested: false,
            });
        }
        Ok(())
    }

    pub fn has_pin(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.def.name == name)
    }

    /// Hand out the exclusive driver handle for a named pin.
    pub fn request(&mut self, name: &str) -> Result<Pin, PlatformError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.def.name == name)
            .ok_or_else(|| PlatformError::MissingPin(name.to_string()))?;
        if slot.requested {
            return Err(PlatformError::PinAlreadyRequested(name.to_string()));
        }
        slot.requested = true;
        Ok(Pin {
            def: slot.def,
            state: slot.state.clone(),
        })
    }

    /// Observer for a named pin; usable alongside the driver handle.
    pub fn probe(&self, name: &str) -> Result<PinProbe, PlatformError> {
        let slot = self
            .slots
            .iter()
            .find(|s| s.def.name == name)
            .ok_or_else(|| PlatformError::MissingPin(name.to_string()))?;
        Ok(PinProbe {
            state: slot.state.clone(),
        })
    }
}
