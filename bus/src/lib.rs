/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Bus primitives shared by the ULX3S SoC model: the memory-mapped Bus
    trait, the system clock, RAM, and CSR register cells.

--*/

mod bus;
mod clock;
mod ram;
mod register;
mod types;

pub use bus::{Bus, BusError};
pub use clock::Clock;
pub use ram::Ram;
pub use register::{CsrAccess, CsrStorage, ReadWriteRegister};
pub use types::{RvAddr, RvData, RvSize};
