// Licensed under the Apache-2.0 license

//! Pin-level view of the Radiona ULX3S board.
//!
//! The board definition is a table of named pins with electrical metadata.
//! Consumers request pins by name at composition time; a missing or
//! already-requested pin aborts composition. The `wifi_en` pin the stock
//! board definition lacks is appended through [`Platform::extend_io`], an
//! explicit extension point, never by patching the board definition itself.

mod io;
mod platform;

pub use io::{wifi_extension_io, IoStandard, PinAttrs, PinDef};
pub use platform::{Pin, PinOwner, PinProbe, Platform, PlatformError};
