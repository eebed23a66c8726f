/*++

Licensed under the Apache-2.0 license.

File Name:

    types.rs

Abstract:

    File contains the data types used by the memory-mapped bus.

--*/

/// Address on the bus.
pub type RvAddr = u32;

/// Data carried by a single bus transaction.
pub type RvData = u32;

/// Width of a bus transaction, in bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RvSize {
    Byte = 1,
    HalfWord = 2,
    Word = 4,
}
