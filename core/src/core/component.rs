use super::memory::Memory;
use crate::error::Result;

/// Handle to a component registered with an [`AddressBus`](super::AddressBus).
///
/// Handles are only meaningful for the bus that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where a component's bytes live.
#[derive(Debug)]
pub(crate) enum Backing {
    /// No memory yet (peripherals with no store, aliases before binding).
    Detached,
    /// Exclusively owned buffer.
    Owned(Memory),
    /// Non-owning view of another component's buffer (mirrored windows).
    Alias { source: ComponentId },
}

/// A named binding of a byte buffer to a bus address window.
#[derive(Debug)]
pub struct Component {
    name: &'static str,
    pub(crate) backing: Backing,
    window: Option<(u16, u16)>,
    offset: usize,
}

impl Component {
    /// Create a component owning `size` zeroed bytes. Size 0 creates a
    /// detached component with no memory.
    pub fn new(name: &'static str, size: usize) -> Result<Self> {
        let backing = if size == 0 {
            Backing::Detached
        } else {
            Backing::Owned(Memory::new(size)?)
        };
        Ok(Self {
            name,
            backing,
            window: None,
            offset: 0,
        })
    }

    pub fn detached(name: &'static str) -> Self {
        Self {
            name,
            backing: Backing::Detached,
            window: None,
            offset: 0,
        }
    }

    /// Wrap an already-filled buffer.
    pub fn with_memory(name: &'static str, memory: Memory) -> Self {
        Self {
            name,
            backing: Backing::Owned(memory),
            window: None,
            offset: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_plugged(&self) -> bool {
        self.window.is_some()
    }

    /// Current bus window as `(start, end)`, inclusive.
    pub fn window(&self) -> Option<(u16, u16)> {
        self.window
    }

    /// Window start, 0 when unplugged.
    pub fn start(&self) -> u16 {
        self.window.map_or(0, |(start, _)| start)
    }

    /// Window end, 0 when unplugged.
    pub fn end(&self) -> u16 {
        self.window.map_or(0, |(_, end)| end)
    }

    /// Offset into the backing buffer of the first windowed byte.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn owns_memory(&self) -> bool {
        matches!(self.backing, Backing::Owned(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.backing, Backing::Alias { .. })
    }

    pub(crate) fn alias_source(&self) -> Option<ComponentId> {
        match self.backing {
            Backing::Alias { source } => Some(source),
            _ => None,
        }
    }

    pub(crate) fn owned(&self) -> Option<&Memory> {
        match &self.backing {
            Backing::Owned(mem) => Some(mem),
            _ => None,
        }
    }

    pub(crate) fn owned_mut(&mut self) -> Option<&mut Memory> {
        match &mut self.backing {
            Backing::Owned(mem) => Some(mem),
            _ => None,
        }
    }

    pub(crate) fn set_window(&mut self, start: u16, end: u16, offset: usize) {
        self.window = Some((start, end));
        self.offset = offset;
    }

    pub(crate) fn clear_window(&mut self) {
        self.window = None;
        self.offset = 0;
    }
}
