use anyhow::Context;
use clap::Parser;
use gbsim_core::gameboy::CYCLES_PER_FRAME;
use gbsim_core::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod rom_path;

use config::{Args, RunnerConfig, Settings};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let file = RunnerConfig::discover(args.config.as_deref())?;
    let settings = Settings::resolve(args, file);
    init_logging(settings.log.as_deref());

    let image = rom_path::load_rom(&settings.rom)
        .with_context(|| format!("failed to load ROM from {}", settings.rom.display()))?;
    let cartridge = Cartridge::from_bytes(&image)
        .with_context(|| format!("{} is not a usable cartridge", settings.rom.display()))?;
    let boot_rom = settings
        .boot_rom
        .as_ref()
        .map(|path| {
            std::fs::read(path)
                .with_context(|| format!("failed to read boot image {}", path.display()))
        })
        .transpose()?;

    let config = GameBoyConfig {
        boot_rom,
        capture_serial: settings.capture_serial,
        vblank_period: settings.vblank_period,
    };
    let mut gb = GameBoy::with_config(cartridge, config)?;

    let outcome = run(&mut gb, &settings);

    if settings.capture_serial {
        println!("{}", String::from_utf8_lossy(gb.serial_output()));
    }
    println!("{}", gb.cpu_state());
    info!("ran {} cycles", gb.cycles());
    outcome
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run frame-sized slices until the cycle budget is spent or the stop text
/// shows up on the serial port.
fn run(machine: &mut dyn Machine, settings: &Settings) -> anyhow::Result<()> {
    while machine.cycles() < settings.cycles {
        let target = (machine.cycles() + CYCLES_PER_FRAME).min(settings.cycles);
        machine
            .run_until(target)
            .with_context(|| format!("simulation stopped at cycle {}", machine.cycles()))?;

        if let Some(stop) = settings.stop_on.as_deref()
            && serial_contains(machine.serial_output(), stop)
        {
            info!("found {stop:?} on the serial port at cycle {}", machine.cycles());
            return Ok(());
        }
    }

    if let Some(stop) = settings.stop_on.as_deref() {
        warn!("{stop:?} never appeared on the serial port");
    }
    Ok(())
}

fn serial_contains(output: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    !needle.is_empty() && output.windows(needle.len()).any(|w| w == needle)
}
