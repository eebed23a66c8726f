/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains the command-line front end for the extended ULX3S SoC:
    flags become composition parameters, the composed system publishes its
    CSR map, and the model can be stepped for a smoke run.

--*/

use anyhow::{bail, Context, Result};
use clap::Parser;
use clap_num::maybe_hex;
use log::info;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;
use ulx3s_bus::{Bus, Ram, RvSize};
use ulx3s_config::{BoardRevision, FpgaDevice, SdramModule, SdramRate, SocConfig};
use ulx3s_periph::{ComposedSoc, SdramCrossbar, SocBuilder};

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Extended ULX3S SoC model", long_about = None)]
struct SocArgs {
    /// FPGA device (LFE5U-12F, LFE5U-25F, LFE5U-45F or LFE5U-85F).
    #[arg(long, default_value = "LFE5U-45F", value_parser = FpgaDevice::from_str)]
    device: FpgaDevice,

    /// Board revision (2.0 or 1.7).
    #[arg(long, default_value = "2.0", value_parser = BoardRevision::from_str)]
    revision: BoardRevision,

    /// System clock frequency in Hz.
    #[arg(long, default_value_t = 50_000_000)]
    sys_clk_freq: u32,

    /// SDRAM module (MT48LC16M16, AS4C32M16 or AS4C16M16).
    #[arg(long, default_value = "MT48LC16M16", value_parser = SdramModule::from_str)]
    sdram_module: SdramModule,

    /// SDRAM rate (1:1 full rate or 1:2 half rate).
    #[arg(long, default_value = "1:2", value_parser = SdramRate::from_str)]
    sdram_rate: SdramRate,

    /// Write the register map of the composed system to this file.
    #[arg(long)]
    csr_csv: Option<PathBuf>,

    /// Base address of the blitter fill window.
    #[arg(long, value_parser = maybe_hex::<u32>, default_value = "0x400000")]
    fill_base: u32,

    /// Size of the blitter fill window in bytes.
    #[arg(long, value_parser = maybe_hex::<u32>, default_value = "0x10000")]
    fill_size: u32,

    /// Fill word stored into the blitter value CSR before stepping.
    #[arg(long, value_parser = maybe_hex::<u32>, default_value = "0")]
    fill_value: u32,

    /// Step the composed system this many clock cycles.
    #[arg(long, default_value_t = 0)]
    cycles: u64,

    /// Log at debug level.
    #[arg(short, long, default_value_t = false)]
    trace: bool,
}

impl SocArgs {
    fn config(&self) -> SocConfig {
        SocConfig {
            device: self.device,
            revision: self.revision,
            sys_clk_freq: self.sys_clk_freq,
            sdram_module: self.sdram_module,
            sdram_rate: self.sdram_rate,
        }
    }
}

/// Compose the full system: SDRAM crossbar, blitter on one write port,
/// wifi control on the board pins.
fn compose(args: &SocArgs) -> Result<(ComposedSoc, Rc<RefCell<Ram>>)> {
    let config = args.config();
    let sdram_size = config.sdram_module.size_bytes();
    if args.fill_size == 0
        || args.fill_base % 4 != 0
        || args.fill_size % 4 != 0
        || args.fill_base.checked_add(args.fill_size).is_none()
        || args.fill_base + args.fill_size > sdram_size
    {
        bail!(
            "fill window {:#010x}+{:#x} does not fit {} ({:#x} bytes)",
            args.fill_base,
            args.fill_size,
            config.sdram_module,
            sdram_size
        );
    }

    let ram = Rc::new(RefCell::new(Ram::new(vec![0u8; sdram_size as usize])));
    let mut crossbar = SdramCrossbar::new(ram.clone());

    let mut builder = SocBuilder::new(config).context("composition failed")?;
    builder
        .attach_blitter(
            Box::new(crossbar.get_port()),
            args.fill_base,
            args.fill_size,
        )
        .context("attaching blitter")?;
    builder.attach_wifi().context("attaching wifi control")?;
    Ok((builder.build(), ram))
}

fn run(args: SocArgs) -> Result<()> {
    let mut soc = {
        let (soc, _ram) = compose(&args)?;
        soc
    };

    if let Some(path) = &args.csr_csv {
        std::fs::write(path, soc.root_bus.render_csr_csv())
            .with_context(|| format!("writing CSR map to {}", path.display()))?;
        info!("CSR map written to {}", path.display());
    }

    if args.cycles > 0 {
        let offsets = soc.root_bus.offsets().clone();
        soc.root_bus
            .write(RvSize::Word, offsets.blitter_offset, args.fill_value)
            .map_err(|e| anyhow::anyhow!("blitter value CSR write failed: {:?}", e))?;
        soc.step(args.cycles);
        info!(
            "smoke run complete after {} cycles, fill value {:#010x}",
            soc.clock.now(),
            args.fill_value
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = SocArgs::parse();
    simple_logger::SimpleLogger::new()
        .with_level(if args.trace {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init()?;
    run(args)
}

#[cfg(test)]
mod test {
    use super::*;

    fn default_args() -> SocArgs {
        SocArgs::parse_from(["ulx3s-soc"])
    }

    #[test]
    fn test_default_composition() {
        let args = default_args();
        assert_eq!(args.device, FpgaDevice::Lfe5u45f);
        assert_eq!(args.revision, BoardRevision::Rev2_0);
        assert_eq!(args.sdram_module, SdramModule::Mt48lc16m16);
        assert_eq!(args.sdram_rate, SdramRate::Half);
        let (soc, _ram) = compose(&args).unwrap();
        assert!(soc.wifi().is_some());
        assert!(soc.blitter().is_some());
        assert_eq!(soc.blitter().unwrap().window(), (0x40_0000, 0x1_0000));
    }

    #[test]
    fn test_fill_window_must_fit_module() {
        let mut args = default_args();
        args.fill_base = 0x1FF0_0000;
        args.fill_size = 0x20_0000;
        // 32 MiB module; window ends past the top
        assert!(compose(&args).is_err());
    }

    #[test]
    fn test_smoke_run_fills_window() {
        let mut args = default_args();
        args.fill_base = 0;
        args.fill_size = 0x100;
        args.fill_value = 0xDEAD_BEEF;
        let (mut soc, ram) = compose(&args).unwrap();
        let offsets = soc.root_bus.offsets().clone();
        soc.root_bus
            .write(RvSize::Word, offsets.blitter_offset, args.fill_value)
            .unwrap();
        // refresh stalls make the fill slower than one word per cycle
        soc.step(0x100 / 4 + 16);
        let mut ram = ram.borrow_mut();
        for addr in (0..0x100).step_by(4) {
            assert_eq!(ram.read(RvSize::Word, addr).unwrap(), 0xDEAD_BEEF);
        }
    }

    #[test]
    fn test_csr_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csr.csv");
        let mut args = default_args();
        args.csr_csv = Some(path.clone());
        run(args).unwrap();
        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.starts_with("#name,address,width,access"));
        assert!(csv.contains("wifi_enable"));
        assert!(csv.contains("blitter_value"));
    }
}
