//! Runner settings: an optional TOML file, overridden by command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use gbsim_core::gameboy::CYCLES_PER_SECOND;
use serde::Deserialize;

/// Cycles run when neither the flags nor the file say otherwise.
pub const DEFAULT_CYCLES: u64 = 10 * CYCLES_PER_SECOND;

#[derive(Debug, Clone, Parser)]
#[command(name = "gbsim", version, about = "Headless cycle-stepped Game Boy runner")]
pub struct Args {
    /// ROM image, a zip archive holding one, or a directory to search.
    pub rom: PathBuf,

    /// Machine cycles to run before stopping.
    #[arg(long)]
    pub cycles: Option<u64>,

    /// Settings file. Defaults to `<config dir>/gbsim/config.toml` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 256-byte boot image to run instead of the built-in stub.
    #[arg(long)]
    pub boot_rom: Option<PathBuf>,

    /// Capture bytes written to the serial port and print them on exit.
    #[arg(long)]
    pub serial: bool,

    /// Request VBLANK every this many cycles.
    #[arg(long)]
    pub vblank_period: Option<u64>,

    /// Stop as soon as the serial output contains this text. Implies `--serial`.
    #[arg(long)]
    pub stop_on: Option<String>,

    /// Log filter (tracing-subscriber EnvFilter syntax). Overrides `RUST_LOG`.
    #[arg(long)]
    pub log: Option<String>,
}

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub cycles: Option<u64>,
    pub boot_rom: Option<PathBuf>,
    pub capture_serial: bool,
    pub vblank_period: Option<u64>,
    pub stop_on: Option<String>,
    pub log: Option<String>,
}

impl RunnerConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gbsim").join("config.toml"))
    }

    /// Load `explicit` (which must exist), else the default file if there is
    /// one, else nothing.
    pub fn discover(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Final settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rom: PathBuf,
    pub cycles: u64,
    pub boot_rom: Option<PathBuf>,
    pub capture_serial: bool,
    pub vblank_period: Option<u64>,
    pub stop_on: Option<String>,
    pub log: Option<String>,
}

impl Settings {
    pub fn resolve(args: Args, file: RunnerConfig) -> Self {
        let stop_on = args.stop_on.or(file.stop_on).filter(|s| !s.is_empty());
        Self {
            rom: args.rom,
            cycles: args.cycles.or(file.cycles).unwrap_or(DEFAULT_CYCLES),
            boot_rom: args.boot_rom.or(file.boot_rom),
            capture_serial: args.serial || file.capture_serial || stop_on.is_some(),
            vblank_period: args.vblank_period.or(file.vblank_period),
            stop_on,
            log: args.log.or(file.log),
        }
    }
}
