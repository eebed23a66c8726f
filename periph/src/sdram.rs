/*++

Licensed under the Apache-2.0 license.

File Name:

    sdram.rs

Abstract:

    File contains the SDRAM crossbar write-port model.

--*/

use std::cell::RefCell;
use std::rc::Rc;
use ulx3s_bus::{Bus, Ram, RvAddr, RvData, RvSize};

/// One arbitrated write port of the shared memory crossbar. The handshake
/// is per-cycle: a consumer offers at most one word per cycle and the port
/// either accepts it or stalls it. A stall is backpressure, never an error.
pub trait DramPort {
    /// Offer one word this cycle. Returns false when the port stalls.
    fn try_write(&mut self, addr: RvAddr, data: RvData) -> bool;
}

/// The shared SDRAM crossbar. Owns the backing store and hands out write
/// ports, one per consumer.
pub struct SdramCrossbar {
    ram: Rc<RefCell<Ram>>,
    refresh_interval: u64,
}

impl SdramCrossbar {
    /// Cycles between refresh stalls on issued ports.
    pub const REFRESH_INTERVAL: u64 = 64;

    pub fn new(ram: Rc<RefCell<Ram>>) -> Self {
        Self {
            ram,
            refresh_interval: Self::REFRESH_INTERVAL,
        }
    }

    /// Crossbar without refresh contention; every offer is accepted.
    pub fn without_refresh(ram: Rc<RefCell<Ram>>) -> Self {
        Self {
            ram,
            refresh_interval: 0,
        }
    }

    pub fn ram(&self) -> Rc<RefCell<Ram>> {
        self.ram.clone()
    }

    pub fn get_port(&mut self) -> CrossbarWritePort {
        CrossbarWritePort {
            ram: self.ram.clone(),
            refresh_interval: self.refresh_interval,
            offers: 0,
        }
    }
}

/// Write port issued by [`SdramCrossbar`]. Stalls one offer out of every
/// refresh interval to mimic refresh contention.
pub struct CrossbarWritePort {
    ram: Rc<RefCell<Ram>>,
    refresh_interval: u64,
    offers: u64,
}

impl DramPort for CrossbarWritePort {
    fn try_write(&mut self, addr: RvAddr, data: RvData) -> bool {
        self.offers += 1;
        if self.refresh_interval != 0 && self.offers % self.refresh_interval == 0 {
            return false;
        }
        // Out-of-window addresses cannot happen for a correctly composed
        // consumer; treat a failed store as a stall rather than losing data.
        self.ram
            .borrow_mut()
            .write(RvSize::Word, addr, data)
            .is_ok()
    }
}
