/*++

Licensed under the Apache-2.0 license.

File Name:

    ram.rs

Abstract:

    File contains the RAM backing store implementation.

--*/

use crate::bus::{Bus, BusError};
use crate::types::{RvAddr, RvData, RvSize};

/// Byte-addressable RAM, little-endian, mapped on the bus.
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> RvAddr {
        self.data.len() as RvAddr
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Bus for Ram {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let addr = addr as usize;
        let width = size as usize;
        if addr % width != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        if addr + width > self.data.len() {
            return Err(BusError::LoadAccessFault);
        }
        let mut val: RvData = 0;
        for (i, byte) in self.data[addr..addr + width].iter().enumerate() {
            val |= (*byte as RvData) << (i * 8);
        }
        Ok(val)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let addr = addr as usize;
        let width = size as usize;
        if addr % width != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        if addr + width > self.data.len() {
            return Err(BusError::StoreAccessFault);
        }
        for i in 0..width {
            self.data[addr + i] = (val >> (i * 8)) as u8;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ram_read_write() {
        let mut ram = Ram::new(vec![0u8; 16]);
        ram.write(RvSize::Word, 4, 0xDEAD_BEEF).unwrap();
        assert_eq!(ram.read(RvSize::Word, 4).unwrap(), 0xDEAD_BEEF);
        assert_eq!(ram.read(RvSize::Byte, 4).unwrap(), 0xEF);
        assert_eq!(ram.read(RvSize::HalfWord, 6).unwrap(), 0xDEAD);
    }

    #[test]
    fn test_ram_faults() {
        let mut ram = Ram::new(vec![0u8; 16]);
        assert_eq!(
            ram.read(RvSize::Word, 14),
            Err(BusError::LoadAccessFault)
        );
        assert_eq!(
            ram.read(RvSize::Word, 2),
            Err(BusError::LoadAddrMisaligned)
        );
        assert_eq!(
            ram.write(RvSize::Word, 16, 0),
            Err(BusError::StoreAccessFault)
        );
        assert_eq!(
            ram.write(RvSize::HalfWord, 1, 0),
            Err(BusError::StoreAddrMisaligned)
        );
    }
}
