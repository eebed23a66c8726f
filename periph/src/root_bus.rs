/*++

Licensed under the Apache-2.0 license.

File Name:

    root_bus.rs

Abstract:

    File contains the CSR root bus: address decode for the attached
    register files and the published register map.

--*/

use crate::blitter::Blitter;
use crate::wifi_ctrl::WifiCtrl;
use std::fmt::Write as _;
use ulx3s_bus::{Bus, BusError, CsrAccess, RvAddr, RvData, RvSize};

/// CSR block placement. One block per register file, LiteX-style fixed
/// stride below the CSR base.
#[derive(Debug, Clone)]
pub struct SocCsrOffsets {
    pub wifi_offset: u32,
    pub wifi_size: u32,
    pub blitter_offset: u32,
    pub blitter_size: u32,
}

impl Default for SocCsrOffsets {
    fn default() -> Self {
        Self {
            wifi_offset: 0xF000_0800,
            wifi_size: 0x800,
            blitter_offset: 0xF000_1000,
            blitter_size: 0x800,
        }
    }
}

/// One row of the published register map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrMapEntry {
    pub name: &'static str,
    pub addr: RvAddr,
    pub width: u32,
    pub access: CsrAccess,
}

/// Root bus of the control plane. Out-of-range accesses are rejected here,
/// by the decoder, not by the register files.
pub struct SocRootBus {
    pub wifi: Option<WifiCtrl>,
    pub blitter: Option<Blitter>,
    offsets: SocCsrOffsets,
}

impl SocRootBus {
    pub fn new(offsets: SocCsrOffsets) -> Self {
        Self {
            wifi: None,
            blitter: None,
            offsets,
        }
    }

    pub fn offsets(&self) -> &SocCsrOffsets {
        &self.offsets
    }

    /// Stable, uniquely named register map of the composed system. The same
    /// composition always publishes the same table.
    pub fn csr_map(&self) -> Vec<CsrMapEntry> {
        let mut map = Vec::new();
        if let Some(wifi) = &self.wifi {
            for (name, offset, width, access) in wifi.csrs() {
                map.push(CsrMapEntry {
                    name,
                    addr: self.offsets.wifi_offset + offset,
                    width,
                    access,
                });
            }
        }
        if let Some(blitter) = &self.blitter {
            for (name, offset, width, access) in blitter.csrs() {
                map.push(CsrMapEntry {
                    name,
                    addr: self.offsets.blitter_offset + offset,
                    width,
                    access,
                });
            }
        }
        map
    }

    /// Human-readable register table for host software.
    pub fn render_csr_csv(&self) -> String {
        let mut out = String::from("#name,address,width,access\n");
        for entry in self.csr_map() {
            let _ = writeln!(
                out,
                "{},0x{:08x},{},{}",
                entry.name, entry.addr, entry.width, entry.access
            );
        }
        out
    }

    fn wifi_range(&self, addr: RvAddr) -> bool {
        addr >= self.offsets.wifi_offset && addr < self.offsets.wifi_offset + self.offsets.wifi_size
    }

    fn blitter_range(&self, addr: RvAddr) -> bool {
        addr >= self.offsets.blitter_offset
            && addr < self.offsets.blitter_offset + self.offsets.blitter_size
    }
}

impl Bus for SocRootBus {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if self.wifi_range(addr) {
            if let Some(wifi) = self.wifi.as_mut() {
                return wifi.read(size, addr - self.offsets.wifi_offset);
            }
        }
        if self.blitter_range(addr) {
            if let Some(blitter) = self.blitter.as_mut() {
                return blitter.read(size, addr - self.offsets.blitter_offset);
            }
        }
        Err(BusError::LoadAccessFault)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if self.wifi_range(addr) {
            if let Some(wifi) = self.wifi.as_mut() {
                return wifi.write(size, addr - self.offsets.wifi_offset, val);
            }
        }
        if self.blitter_range(addr) {
            if let Some(blitter) = self.blitter.as_mut() {
                return blitter.write(size, addr - self.offsets.blitter_offset, val);
            }
        }
        Err(BusError::StoreAccessFault)
    }

    fn poll(&mut self) {
        if let Some(wifi) = self.wifi.as_mut() {
            wifi.poll();
        }
        if let Some(blitter) = self.blitter.as_mut() {
            blitter.poll();
        }
    }
}
