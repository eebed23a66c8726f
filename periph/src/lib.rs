/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Register-mapped control plane of the extended ULX3S SoC: the wifi
    enable CSR with its shared-pin arbiter, the constant-fill blitter DMA,
    the SDRAM crossbar write-port model, and the CSR root bus that binds
    them together.

--*/

mod blitter;
mod root_bus;
mod sdram;
mod soc;
mod wifi_ctrl;

pub use blitter::Blitter;
pub use root_bus::{CsrMapEntry, SocCsrOffsets, SocRootBus};
pub use sdram::{CrossbarWritePort, DramPort, SdramCrossbar};
pub use soc::{ComposedSoc, SocBuilder, SocError};
pub use wifi_ctrl::{SharedLine, WifiCtrl};
