/*++

Licensed under the Apache-2.0 license.

File Name:

    register.rs

Abstract:

    File contains the CSR register cells exposed to the host CPU.

--*/

use crate::types::RvData;
use tock_registers::{LocalRegisterCopy, RegisterLongName, UIntLike};

/// Register value cell backed by a tock-registers local copy.
pub struct ReadWriteRegister<T: UIntLike, R: RegisterLongName = ()> {
    pub reg: LocalRegisterCopy<T, R>,
}

impl<T: UIntLike, R: RegisterLongName> ReadWriteRegister<T, R> {
    pub fn new(value: T) -> Self {
        Self {
            reg: LocalRegisterCopy::new(value),
        }
    }
}

/// Host access class of a CSR. This is the domain of the register map's
/// access column: `rw` for storage, `ro` for status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CsrAccess {
    /// Write-only storage with read-back of the last stored value.
    Storage,
    /// Read-only status; host writes fault.
    Status,
}

impl std::fmt::Display for CsrAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsrAccess::Storage => write!(f, "rw"),
            CsrAccess::Status => write!(f, "ro"),
        }
    }
}

/// A named control register of fixed width (1..=32 bits). A bus write
/// atomically replaces the stored value; reads return the last stored value
/// so software can verify what it previously wrote. Reset value is 0.
pub struct CsrStorage {
    name: &'static str,
    width: u32,
    reg: ReadWriteRegister<u32>,
}

impl CsrStorage {
    pub fn new(name: &'static str, width: u32) -> Self {
        debug_assert!(width >= 1 && width <= 32);
        Self {
            name,
            width,
            reg: ReadWriteRegister::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    fn mask(&self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Stored value, as seen by combinational readers and by read-back.
    pub fn read(&self) -> RvData {
        self.reg.reg.get()
    }

    /// Replace the stored value. Bits beyond the register width are dropped.
    pub fn write(&mut self, val: RvData) {
        self.reg.reg.set(val & self.mask());
    }

    /// Stored value of a 1-bit register, as a level.
    pub fn bit(&self) -> bool {
        self.read() & 1 != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_storage_read_back() {
        let mut csr = CsrStorage::new("value", 32);
        assert_eq!(csr.read(), 0);
        csr.write(0xDEAD_BEEF);
        assert_eq!(csr.read(), 0xDEAD_BEEF);
        csr.write(1);
        assert_eq!(csr.read(), 1);
    }

    #[test]
    fn test_storage_masks_to_width() {
        let mut csr = CsrStorage::new("enable", 1);
        csr.write(0xFFFF_FFFF);
        assert_eq!(csr.read(), 1);
        assert!(csr.bit());
        csr.write(2);
        assert_eq!(csr.read(), 0);
        assert!(!csr.bit());
    }

    #[test]
    fn test_access_class_renders_as_map_column() {
        assert_eq!(CsrAccess::Storage.to_string(), "rw");
        assert_eq!(CsrAccess::Status.to_string(), "ro");
    }
}
