// Licensed under the Apache-2.0 license

//! Named pin tables for the ULX3S board revisions.

/// Electrical standard of a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoStandard {
    Lvcmos33,
}

impl std::fmt::Display for IoStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoStandard::Lvcmos33 => write!(f, "LVCMOS33"),
        }
    }
}

/// Misc electrical attributes carried alongside a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinAttrs {
    pub pull_up: bool,
    pub drive_ma: Option<u8>,
}

impl PinAttrs {
    pub const NONE: PinAttrs = PinAttrs {
        pull_up: false,
        drive_ma: None,
    };
}

/// One named physical pin of the board definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinDef {
    pub name: &'static str,
    pub site: &'static str,
    pub iostandard: IoStandard,
    pub attrs: PinAttrs,
}

const fn pin(name: &'static str, site: &'static str) -> PinDef {
    PinDef {
        name,
        site,
        iostandard: IoStandard::Lvcmos33,
        attrs: PinAttrs::NONE,
    }
}

/// Pins common to every board revision.
pub(crate) const IO_COMMON: &[PinDef] = &[
    pin("clk25", "G2"),
    pin("user_led0", "B2"),
    pin("user_led1", "C2"),
    pin("wifi_gpio0", "L2"),
    pin("sdcard_clk", "H2"),
    pin("sdcard_cmd", "J1"),
];

/// Revision 1.7 pins. The SD-card tristate control point is not routed.
pub(crate) const IO_REV_1_7: &[PinDef] = &[pin("sdcard_data0", "J3")];

/// Revision 2.0 pins, including the SD-card tristate control point shared
/// with the wireless module's control path.
pub(crate) const IO_REV_2_0: &[PinDef] = &[
    pin("sdcard_data0", "J3"),
    PinDef {
        name: "sdcard_tristate",
        site: "H1",
        iostandard: IoStandard::Lvcmos33,
        attrs: PinAttrs {
            pull_up: true,
            drive_ma: None,
        },
    },
];

/// The `wifi_en` pin missing from the stock board definition. Appended at
/// composition time through `Platform::extend_io`.
pub fn wifi_extension_io() -> &'static [PinDef] {
    const EXTRA: &[PinDef] = &[PinDef {
        name: "wifi_en",
        site: "F1",
        iostandard: IoStandard::Lvcmos33,
        attrs: PinAttrs {
            pull_up: true,
            drive_ma: Some(4),
        },
    }];
    EXTRA
}
