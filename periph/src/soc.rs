/*++

Licensed under the Apache-2.0 license.

File Name:

    soc.rs

Abstract:

    File contains the composition layer binding the control-plane
    peripherals to a validated board configuration.

--*/

use crate::blitter::Blitter;
use crate::root_bus::{SocCsrOffsets, SocRootBus};
use crate::sdram::DramPort;
use crate::wifi_ctrl::{SharedLine, WifiCtrl};
use log::info;
use thiserror::Error;
use ulx3s_bus::{Clock, RvAddr};
use ulx3s_config::{ConfigError, SocConfig};
use ulx3s_platform::{wifi_extension_io, Platform, PlatformError};

#[derive(Debug, Error)]
pub enum SocError {
    #[error("the {0} extension is already attached")]
    AlreadyAttached(&'static str),

    #[error("fill window {base:#010x}+{size:#x} is invalid: it must be non-empty, word-aligned and end within the address space")]
    InvalidFillWindow { base: RvAddr, size: u32 },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Builds the control plane against a validated configuration. The two
/// extensions attach at most once each; a failed attach leaves nothing
/// half-wired because composition aborts before a system is built.
pub struct SocBuilder {
    config: SocConfig,
    platform: Platform,
    root: SocRootBus,
}

impl SocBuilder {
    /// Validates `config` once, builds the board's pin table and appends
    /// the `wifi_en` extension pin.
    pub fn new(config: SocConfig) -> Result<Self, SocError> {
        config.validate()?;
        let mut platform = Platform::new(&config);
        platform.extend_io(wifi_extension_io())?;
        info!(
            "composing SoC for {} rev {} at {} Hz ({} @ {})",
            config.device, config.revision, config.sys_clk_freq, config.sdram_module,
            config.sdram_rate
        );
        Ok(Self {
            config,
            platform,
            root: SocRootBus::new(SocCsrOffsets::default()),
        })
    }

    /// Wire the constant-fill blitter to a caller-supplied crossbar write
    /// port. `base`/`size` fix the fill window for the system's lifetime.
    pub fn attach_blitter(
        &mut self,
        port: Box<dyn DramPort>,
        base: RvAddr,
        size: u32,
    ) -> Result<(), SocError> {
        if self.root.blitter.is_some() {
            return Err(SocError::AlreadyAttached("blitter"));
        }
        if size == 0 || base % 4 != 0 || size % 4 != 0 || base.checked_add(size).is_none() {
            return Err(SocError::InvalidFillWindow { base, size });
        }
        info!("blitter: fill window {:#010x}..{:#010x}", base, base + size);
        self.root.blitter = Some(Blitter::new(port, base, size));
        Ok(())
    }

    /// Wire the wifi enable CSR and the shared-pin arbiter. The SD-card
    /// tristate control point is included only when the board revision
    /// routes it; its absence is a capability of the composed system, not
    /// a failure.
    pub fn attach_wifi(&mut self) -> Result<(), SocError> {
        if self.root.wifi.is_some() {
            return Err(SocError::AlreadyAttached("wifi"));
        }
        let wifi_en = self.platform.request("wifi_en")?;
        // the capability is fixed by the board revision, not discovered by
        // probing the pin table
        let shared = if self.config.revision.routes_sdcard_tristate() {
            Some(SharedLine::new(self.platform.request("sdcard_tristate")?))
        } else {
            None
        };
        info!(
            "wifi: enable pin {} wired{}",
            wifi_en.site(),
            if shared.is_some() {
                ", sdcard tristate shared line arbitrated"
            } else {
                " (no sdcard tristate on this revision)"
            }
        );
        self.root.wifi = Some(WifiCtrl::new(wifi_en, shared));
        Ok(())
    }

    pub fn build(self) -> ComposedSoc {
        ComposedSoc {
            config: self.config,
            platform: self.platform,
            clock: Clock::new(),
            root_bus: self.root,
        }
    }
}

/// A fully composed system. The option-typed accessors state exactly which
/// extensions this composition carries.
pub struct ComposedSoc {
    config: SocConfig,
    platform: Platform,
    pub clock: Clock,
    pub root_bus: SocRootBus,
}

impl ComposedSoc {
    pub fn config(&self) -> &SocConfig {
        &self.config
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn wifi(&self) -> Option<&WifiCtrl> {
        self.root_bus.wifi.as_ref()
    }

    pub fn blitter(&self) -> Option<&Blitter> {
        self.root_bus.blitter.as_ref()
    }

    /// Advance the whole control plane by `cycles` clock cycles.
    pub fn step(&mut self, cycles: u64) {
        self.clock.increment_and_poll(cycles, &mut self.root_bus);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sdram::SdramCrossbar;
    use std::cell::RefCell;
    use std::rc::Rc;
    use ulx3s_bus::{Bus, Ram, RvSize};
    use ulx3s_config::BoardRevision;

    fn builder(revision: BoardRevision) -> SocBuilder {
        SocBuilder::new(SocConfig {
            revision,
            ..SocConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config_aborts_composition() {
        let config = SocConfig {
            sys_clk_freq: 1,
            ..SocConfig::default()
        };
        assert!(matches!(
            SocBuilder::new(config),
            Err(SocError::Config(ConfigError::SysClkOutOfRange(1)))
        ));
    }

    #[test]
    fn test_attach_operations_are_exclusive() {
        let mut builder = builder(BoardRevision::Rev2_0);
        let ram = Rc::new(RefCell::new(Ram::new(vec![0u8; 256])));
        let mut crossbar = SdramCrossbar::without_refresh(ram);

        builder
            .attach_blitter(Box::new(crossbar.get_port()), 0, 256)
            .unwrap();
        assert!(matches!(
            builder.attach_blitter(Box::new(crossbar.get_port()), 0, 256),
            Err(SocError::AlreadyAttached("blitter"))
        ));

        builder.attach_wifi().unwrap();
        assert!(matches!(
            builder.attach_wifi(),
            Err(SocError::AlreadyAttached("wifi"))
        ));
    }

    #[test]
    fn test_invalid_fill_window_rejected() {
        let mut builder = builder(BoardRevision::Rev2_0);
        let ram = Rc::new(RefCell::new(Ram::new(vec![0u8; 256])));
        let mut crossbar = SdramCrossbar::without_refresh(ram);

        // window wrapping past the top of the address space
        assert!(matches!(
            builder.attach_blitter(Box::new(crossbar.get_port()), 0xFFFF_FFF0, 0x100),
            Err(SocError::InvalidFillWindow { .. })
        ));
        // empty and misaligned windows
        assert!(matches!(
            builder.attach_blitter(Box::new(crossbar.get_port()), 0, 0),
            Err(SocError::InvalidFillWindow { .. })
        ));
        assert!(matches!(
            builder.attach_blitter(Box::new(crossbar.get_port()), 2, 64),
            Err(SocError::InvalidFillWindow { .. })
        ));
        // a rejected window leaves the slot free for a valid attach
        builder
            .attach_blitter(Box::new(crossbar.get_port()), 0, 256)
            .unwrap();
    }

    #[test]
    fn test_capability_typed_composition() {
        let mut b = builder(BoardRevision::Rev1_7);
        b.attach_wifi().unwrap();
        let soc = b.build();
        assert!(soc.wifi().is_some());
        assert!(!soc.wifi().unwrap().has_shared_line());
        assert!(soc.blitter().is_none());
    }

    #[test]
    fn test_composed_system_end_to_end() {
        let mut builder = builder(BoardRevision::Rev2_0);
        let ram = Rc::new(RefCell::new(Ram::new(vec![0u8; 1024])));
        let mut crossbar = SdramCrossbar::without_refresh(ram.clone());
        builder
            .attach_blitter(Box::new(crossbar.get_port()), 0, 1024)
            .unwrap();
        builder.attach_wifi().unwrap();
        let mut soc = builder.build();

        let offsets = soc.root_bus.offsets().clone();
        soc.root_bus
            .write(RvSize::Word, offsets.blitter_offset, 0xDEAD_BEEF)
            .unwrap();
        soc.root_bus
            .write(RvSize::Word, offsets.wifi_offset, 1)
            .unwrap();
        soc.step(256);

        let wifi_en = soc.platform().probe("wifi_en").unwrap();
        assert!(wifi_en.level());
        let mut ram = ram.borrow_mut();
        for addr in (0..1024).step_by(4) {
            assert_eq!(ram.read(RvSize::Word, addr).unwrap(), 0xDEAD_BEEF);
        }
    }
}
