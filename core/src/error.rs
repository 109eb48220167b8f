use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of [`Error`], used by callers that only care about
/// which class of failure stopped the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    BadParameter,
    AddressRange,
    Io,
    NotImplemented,
    Decode,
}

/// Every failure the simulation core can report.
///
/// Operations validate their preconditions before mutating anything, so an
/// `Err` always leaves the bus, components and CPU exactly as they were.
#[derive(Debug, Error)]
pub enum Error {
    #[error("memory size must be non-zero")]
    ZeroSize,

    #[error("cannot allocate {size} bytes of backing memory")]
    OutOfMemory { size: usize },

    #[error("component `{name}` has no backing memory")]
    NoMemory { name: &'static str },

    #[error("component `{name}` already owns memory and cannot alias another")]
    AlreadyOwnsMemory { name: &'static str },

    #[error("component `{name}` is already plugged at 0x{start:04X}-0x{end:04X}")]
    AlreadyPlugged {
        name: &'static str,
        start: u16,
        end: u16,
    },

    #[error("component `{name}` is still aliased and cannot be released")]
    MemoryInUse { name: &'static str },

    #[error("unknown component handle #{0}")]
    UnknownComponent(usize),

    #[error("window start 0x{start:04X} is after end 0x{end:04X}")]
    InvertedWindow { start: u16, end: u16 },

    #[error("window of {window} bytes at offset {offset} exceeds {size} bytes of memory")]
    WindowTooLarge {
        window: usize,
        offset: usize,
        size: usize,
    },

    #[error("address 0x{addr:04X} is already mapped")]
    Overlap { addr: u16 },

    #[error("write to unmapped address 0x{addr:04X}")]
    Unmapped { addr: u16 },

    #[error("16-bit access at 0x{addr:04X} runs past the end of the address space")]
    OutOfRange { addr: u16 },

    #[error("invalid register operand code {0}")]
    BadRegister(u8),

    #[error("boot image must be {expected} bytes, got {actual}")]
    BadBootImage { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM image too small: expected {expected} bytes, got {actual}")]
    RomTooSmall { expected: usize, actual: usize },

    #[error("unsupported cartridge type 0x{kind:02X} (only plain ROM is supported)")]
    UnsupportedCartridge { kind: u8 },

    #[error("unknown opcode {}0x{opcode:02X} at 0x{pc:04X}", prefix_label(.prefixed))]
    UnknownOpcode { opcode: u8, prefixed: bool, pc: u16 },
}

fn prefix_label(prefixed: &bool) -> &'static str {
    if *prefixed { "0xCB " } else { "" }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroSize
            | Self::OutOfMemory { .. }
            | Self::NoMemory { .. }
            | Self::AlreadyOwnsMemory { .. }
            | Self::AlreadyPlugged { .. }
            | Self::MemoryInUse { .. }
            | Self::UnknownComponent(_)
            | Self::BadRegister(_)
            | Self::BadBootImage { .. } => ErrorKind::BadParameter,
            Self::InvertedWindow { .. }
            | Self::WindowTooLarge { .. }
            | Self::Overlap { .. }
            | Self::Unmapped { .. }
            | Self::OutOfRange { .. } => ErrorKind::AddressRange,
            Self::Io(_) | Self::RomTooSmall { .. } => ErrorKind::Io,
            Self::UnsupportedCartridge { .. } => ErrorKind::NotImplemented,
            Self::UnknownOpcode { .. } => ErrorKind::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(Error::ZeroSize.kind(), ErrorKind::BadParameter);
        assert_eq!(Error::Overlap { addr: 0 }.kind(), ErrorKind::AddressRange);
        assert_eq!(
            Error::UnsupportedCartridge { kind: 1 }.kind(),
            ErrorKind::NotImplemented
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(Error::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn unknown_opcode_message_mentions_prefix() {
        let direct = Error::UnknownOpcode { opcode: 0xD3, prefixed: false, pc: 0x0150 };
        assert_eq!(direct.to_string(), "unknown opcode 0xD3 at 0x0150");
        let prefixed = Error::UnknownOpcode { opcode: 0x00, prefixed: true, pc: 0x0200 };
        assert_eq!(prefixed.to_string(), "unknown opcode 0xCB 0x00 at 0x0200");
    }
}
