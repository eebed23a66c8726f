/*++

Licensed under the Apache-2.0 license.

File Name:

    blitter.rs

Abstract:

    File contains the constant-fill blitter DMA engine.

--*/

use crate::sdram::DramPort;
use log::debug;
use std::collections::VecDeque;
use ulx3s_bus::{Bus, BusError, CsrAccess, CsrStorage, RvAddr, RvData, RvSize};

/// Continuous constant-fill DMA engine. A single 32-bit CSR holds the fill
/// word; the engine sweeps a fixed window of the SDRAM and writes the word
/// at whatever rate the crossbar port accepts. There is no start/stop
/// register, no completion signal and no terminal state: once composed the
/// fill runs for the lifetime of the system and the only flow control is
/// the port's per-cycle handshake.
pub struct Blitter {
    value: CsrStorage,
    port: Box<dyn DramPort>,
    base: RvAddr,
    size: u32,
    /// Pending burst addresses. Data is not buffered here: the write data
    /// lines are combinationally tied to the CSR, so each accepted element
    /// carries the value stored at the instant the port accepts it.
    pending: VecDeque<RvAddr>,
    next_addr: RvAddr,
}

impl Blitter {
    /// Fill value CSR.
    pub const CSR_VALUE: RvAddr = 0x0000_0000;

    /// Depth of the address FIFO between the CSR clock domain and the
    /// memory port's burst sequencing.
    pub const FIFO_DEPTH: usize = 16;

    /// `base` and `size` fix the target window at composition time. The
    /// composition layer validates alignment and bounds before the engine
    /// is constructed.
    pub fn new(port: Box<dyn DramPort>, base: RvAddr, size: u32) -> Self {
        Self {
            value: CsrStorage::new("blitter_value", 32),
            port,
            base,
            size,
            pending: VecDeque::with_capacity(Self::FIFO_DEPTH),
            next_addr: base,
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        4
    }

    pub fn window(&self) -> (RvAddr, u32) {
        (self.base, self.size)
    }

    pub fn csrs(&self) -> [(&'static str, RvAddr, u32, CsrAccess); 1] {
        [(
            self.value.name(),
            Self::CSR_VALUE,
            self.value.width(),
            CsrAccess::Storage,
        )]
    }

    fn refill_pending(&mut self) {
        while self.pending.len() < Self::FIFO_DEPTH {
            self.pending.push_back(self.next_addr);
            self.next_addr += 4;
            if self.next_addr >= self.base + self.size {
                self.next_addr = self.base;
            }
        }
    }
}

impl Bus for Blitter {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match (size, addr) {
            (RvSize::Word, Self::CSR_VALUE) => Ok(self.value.read()),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match (size, addr) {
            (RvSize::Word, Self::CSR_VALUE) => {
                debug!("blitter: fill value set to {:#010x}", val);
                self.value.write(val);
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }

    fn poll(&mut self) {
        self.refill_pending();
        // One port transaction per cycle. A stalled head stays pending;
        // nothing is dropped.
        if let Some(&addr) = self.pending.front() {
            let data = self.value.read();
            if self.port.try_write(addr, data) {
                self.pending.pop_front();
            }
        }
    }
}
