// Licensed under the Apache-2.0 license

//! Board configuration for the extended ULX3S SoC.
//!
//! All composition-time choices (FPGA device, board revision, SDRAM module
//! and rate, system clock) are enumerated types validated once at
//! composition entry. An invalid combination is a fatal configuration
//! error; nothing downstream ever sees a partially-validated config.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown FPGA device {0:?} (expected LFE5U-12F, LFE5U-25F, LFE5U-45F or LFE5U-85F)")]
    UnknownDevice(String),

    #[error("unknown board revision {0:?} (expected 1.7 or 2.0)")]
    UnknownRevision(String),

    #[error("unknown SDRAM module {0:?} (expected MT48LC16M16, AS4C32M16 or AS4C16M16)")]
    UnknownSdramModule(String),

    #[error("unknown SDRAM rate {0:?} (expected 1:1 or 1:2)")]
    UnknownSdramRate(String),

    #[error("{0} is not supported (refresh timings will not be met with the fill DMA active), use AS4C16M16 instead")]
    UnsupportedSdramModule(SdramModule),

    #[error("system clock {0} Hz out of range ({min}..={max} Hz)", min = SocConfig::MIN_SYS_CLK_HZ, max = SocConfig::MAX_SYS_CLK_HZ)]
    SysClkOutOfRange(u32),

    #[error("{module} at rate {rate} needs a {required} Hz SDRAM clock, above the module's {limit} Hz rating")]
    SdramTimingViolation {
        module: SdramModule,
        rate: SdramRate,
        required: u32,
        limit: u32,
    },
}

/// ECP5 device fitted on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FpgaDevice {
    Lfe5u12f,
    Lfe5u25f,
    Lfe5u45f,
    Lfe5u85f,
}

impl FpgaDevice {
    /// Full part number handed to the toolchain.
    pub fn part_number(&self) -> String {
        format!("{}-6BG381C", self)
    }
}

impl fmt::Display for FpgaDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FpgaDevice::Lfe5u12f => "LFE5U-12F",
            FpgaDevice::Lfe5u25f => "LFE5U-25F",
            FpgaDevice::Lfe5u45f => "LFE5U-45F",
            FpgaDevice::Lfe5u85f => "LFE5U-85F",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FpgaDevice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LFE5U-12F" => Ok(FpgaDevice::Lfe5u12f),
            "LFE5U-25F" => Ok(FpgaDevice::Lfe5u25f),
            "LFE5U-45F" => Ok(FpgaDevice::Lfe5u45f),
            "LFE5U-85F" => Ok(FpgaDevice::Lfe5u85f),
            _ => Err(ConfigError::UnknownDevice(s.to_string())),
        }
    }
}

/// Board revision. Revision 2.0 routes the SD-card tristate control point;
/// revision 1.7 does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardRevision {
    Rev1_7,
    Rev2_0,
}

impl BoardRevision {
    /// Whether this revision routes the SD-card tristate control point.
    pub fn routes_sdcard_tristate(&self) -> bool {
        matches!(self, BoardRevision::Rev2_0)
    }
}

impl fmt::Display for BoardRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BoardRevision::Rev1_7 => "1.7",
            BoardRevision::Rev2_0 => "2.0",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BoardRevision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.7" => Ok(BoardRevision::Rev1_7),
            "2.0" => Ok(BoardRevision::Rev2_0),
            _ => Err(ConfigError::UnknownRevision(s.to_string())),
        }
    }
}

/// SDRAM module fitted on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdramModule {
    Mt48lc16m16,
    As4c32m16,
    As4c16m16,
}

impl SdramModule {
    /// Highest SDRAM clock the module is rated for.
    pub fn max_sdram_clk_hz(&self) -> u32 {
        match self {
            SdramModule::Mt48lc16m16 => 166_000_000,
            SdramModule::As4c32m16 => 143_000_000,
            SdramModule::As4c16m16 => 143_000_000,
        }
    }

    /// Module capacity in bytes.
    pub fn size_bytes(&self) -> u32 {
        match self {
            SdramModule::Mt48lc16m16 => 32 << 20,
            SdramModule::As4c32m16 => 64 << 20,
            SdramModule::As4c16m16 => 32 << 20,
        }
    }
}

impl fmt::Display for SdramModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SdramModule::Mt48lc16m16 => "MT48LC16M16",
            SdramModule::As4c32m16 => "AS4C32M16",
            SdramModule::As4c16m16 => "AS4C16M16",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SdramModule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MT48LC16M16" => Ok(SdramModule::Mt48lc16m16),
            "AS4C32M16" => Ok(SdramModule::As4c32m16),
            "AS4C16M16" => Ok(SdramModule::As4c16m16),
            _ => Err(ConfigError::UnknownSdramModule(s.to_string())),
        }
    }
}

/// SDRAM clock ratio relative to the system clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdramRate {
    /// 1:1, SDRAM clocked at the system clock.
    Full,
    /// 1:2, SDRAM clocked at twice the system clock.
    Half,
}

impl SdramRate {
    pub fn sdram_clk_hz(&self, sys_clk_freq: u32) -> u32 {
        match self {
            SdramRate::Full => sys_clk_freq,
            SdramRate::Half => sys_clk_freq * 2,
        }
    }
}

impl fmt::Display for SdramRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SdramRate::Full => "1:1",
            SdramRate::Half => "1:2",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SdramRate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1:1" => Ok(SdramRate::Full),
            "1:2" => Ok(SdramRate::Half),
            _ => Err(ConfigError::UnknownSdramRate(s.to_string())),
        }
    }
}

/// Composition-time configuration of the SoC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocConfig {
    pub device: FpgaDevice,
    pub revision: BoardRevision,
    pub sys_clk_freq: u32,
    pub sdram_module: SdramModule,
    pub sdram_rate: SdramRate,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            device: FpgaDevice::Lfe5u45f,
            revision: BoardRevision::Rev2_0,
            sys_clk_freq: 50_000_000,
            sdram_module: SdramModule::Mt48lc16m16,
            sdram_rate: SdramRate::Half,
        }
    }
}

impl SocConfig {
    pub const MIN_SYS_CLK_HZ: u32 = 10_000_000;
    pub const MAX_SYS_CLK_HZ: u32 = 85_000_000;

    /// Validate the combination once, before any composition happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sys_clk_freq < Self::MIN_SYS_CLK_HZ || self.sys_clk_freq > Self::MAX_SYS_CLK_HZ {
            return Err(ConfigError::SysClkOutOfRange(self.sys_clk_freq));
        }
        // AS4C32M16 cannot meet refresh timing while the fill DMA holds a
        // crossbar port, regardless of the clock ratio.
        if self.sdram_module == SdramModule::As4c32m16 {
            return Err(ConfigError::UnsupportedSdramModule(self.sdram_module));
        }
        let required = self.sdram_rate.sdram_clk_hz(self.sys_clk_freq);
        let limit = self.sdram_module.max_sdram_clk_hz();
        if required > limit {
            return Err(ConfigError::SdramTimingViolation {
                module: self.sdram_module,
                rate: self.sdram_rate,
                required,
                limit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SocConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_device_strings_round_trip() {
        for s in ["LFE5U-12F", "LFE5U-25F", "LFE5U-45F", "LFE5U-85F"] {
            assert_eq!(FpgaDevice::from_str(s).unwrap().to_string(), s);
        }
        assert_eq!(
            FpgaDevice::from_str("LFE5U-99F"),
            Err(ConfigError::UnknownDevice("LFE5U-99F".to_string()))
        );
        assert_eq!(
            FpgaDevice::Lfe5u45f.part_number(),
            "LFE5U-45F-6BG381C"
        );
    }

    #[test]
    fn test_revision_strings() {
        assert_eq!(
            BoardRevision::from_str("1.7").unwrap(),
            BoardRevision::Rev1_7
        );
        assert_eq!(
            BoardRevision::from_str("2.0").unwrap(),
            BoardRevision::Rev2_0
        );
        assert!(BoardRevision::from_str("3.0").is_err());
    }

    #[test]
    fn test_as4c32m16_is_rejected_outright() {
        // fits the clock-rating check at the default 50 MHz / 1:2, but the
        // module still cannot be refreshed under continuous fill traffic
        let config = SocConfig {
            sdram_module: SdramModule::As4c32m16,
            ..SocConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnsupportedSdramModule(SdramModule::As4c32m16))
        );
    }

    #[test]
    fn test_tristate_capability_follows_revision() {
        assert!(BoardRevision::Rev2_0.routes_sdcard_tristate());
        assert!(!BoardRevision::Rev1_7.routes_sdcard_tristate());
    }

    #[test]
    fn test_sys_clk_bounds() {
        let config = SocConfig {
            sys_clk_freq: 5_000_000,
            ..SocConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SysClkOutOfRange(5_000_000))
        );
    }

    #[test]
    fn test_sdram_timing_violation_rejected() {
        // 80 MHz at 1:2 needs a 160 MHz SDRAM clock, above AS4C16M16's rating.
        let config = SocConfig {
            sys_clk_freq: 80_000_000,
            sdram_module: SdramModule::As4c16m16,
            sdram_rate: SdramRate::Half,
            ..SocConfig::default()
        };
        match config.validate() {
            Err(ConfigError::SdramTimingViolation {
                required, limit, ..
            }) => {
                assert_eq!(required, 160_000_000);
                assert_eq!(limit, 143_000_000);
            }
            other => panic!("expected timing violation, got {:?}", other),
        }

        // The same clock is fine at full rate.
        let config = SocConfig {
            sdram_rate: SdramRate::Full,
            ..config
        };
        assert_eq!(config.validate(), Ok(()));
    }
}
