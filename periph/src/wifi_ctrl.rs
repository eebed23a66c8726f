/*++

Licensed under the Apache-2.0 license.

File Name:

    wifi_ctrl.rs

Abstract:

    File contains the wifi enable CSR and the shared-pin signal arbiter.

--*/

use log::debug;
use std::cell::Cell;
use std::rc::Rc;
use ulx3s_bus::{Bus, BusError, CsrAccess, CsrStorage, RvAddr, RvData, RvSize};
use ulx3s_platform::{Pin, PinOwner};

/// The shared line both the wireless module's control path and the SD-card
/// peripheral contend for, together with the two candidate sources. The
/// arbiter forwards exactly one source per selector value.
pub struct SharedLine {
    pin: Pin,
    sd_out: Rc<Cell<bool>>,
    wifi_out: Rc<Cell<bool>>,
}

impl SharedLine {
    pub fn new(pin: Pin) -> Self {
        Self {
            pin,
            sd_out: Rc::new(Cell::new(false)),
            wifi_out: Rc::new(Cell::new(false)),
        }
    }

    /// Handle the SD-card peripheral drives its output level through.
    pub fn sd_out(&self) -> Rc<Cell<bool>> {
        self.sd_out.clone()
    }

    /// Handle the wireless module drives its signal through.
    pub fn wifi_out(&self) -> Rc<Cell<bool>> {
        self.wifi_out.clone()
    }
}

/// Wireless module control. One 1-bit storage CSR drives the dedicated
/// `wifi_en` pin; the same bit selects which consumer owns the shared
/// SD-card line. Reset value is 0, so the module is held disabled from
/// power-up until software writes the register.
///
/// The arbiter is purely combinational: it keeps no state of its own and
/// recomputes every pin from current register values on each evaluation.
pub struct WifiCtrl {
    enable: CsrStorage,
    wifi_en: Pin,
    shared: Option<SharedLine>,
}

impl WifiCtrl {
    /// Enable CSR.
    pub const CSR_ENABLE: RvAddr = 0x0000_0000;

    /// `shared` is None on board revisions that do not route the SD-card
    /// tristate control point; the arbiter then drives only `wifi_en`.
    pub fn new(wifi_en: Pin, shared: Option<SharedLine>) -> Self {
        let ctrl = Self {
            enable: CsrStorage::new("wifi_enable", 1),
            wifi_en,
            shared,
        };
        // pins carry a defined level from cycle zero
        ctrl.eval();
        ctrl
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        4
    }

    pub fn has_shared_line(&self) -> bool {
        self.shared.is_some()
    }

    pub fn shared_line(&self) -> Option<&SharedLine> {
        self.shared.as_ref()
    }

    pub fn csrs(&self) -> [(&'static str, RvAddr, u32, CsrAccess); 1] {
        [(
            self.enable.name(),
            Self::CSR_ENABLE,
            self.enable.width(),
            CsrAccess::Storage,
        )]
    }

    /// Recompute all pin levels from current register state. Pure function
    /// of the enable bit; exactly one source reaches the shared line.
    fn eval(&self) {
        let enabled = self.enable.bit();
        self.wifi_en.drive(PinOwner::Wifi, enabled);
        if let Some(shared) = &self.shared {
            if enabled {
                shared.pin.drive(PinOwner::Wifi, shared.wifi_out.get());
            } else {
                shared.pin.drive(PinOwner::SdCard, shared.sd_out.get());
            }
        }
    }
}

impl Bus for WifiCtrl {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match (size, addr) {
            (RvSize::Word, Self::CSR_ENABLE) => Ok(self.enable.read()),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match (size, addr) {
            (RvSize::Word, Self::CSR_ENABLE) => {
                debug!("wifi_ctrl: enable set to {}", val & 1);
                self.enable.write(val);
                // combinational outputs change in the same cycle as the store
                self.eval();
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }

    fn poll(&mut self) {
        self.eval();
    }
}
