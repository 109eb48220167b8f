use tracing::debug;

use super::component::{Component, ComponentId};
use crate::error::{Error, Result};

/// Number of addressable bytes.
pub const BUS_SIZE: usize = 0x1_0000;

/// Value read from an address no component is bound to.
pub const OPEN_BUS: u8 = 0xFF;

/// Byte-addressed data path between the CPU and memory/peripherals.
///
/// Reads never fail: unmapped addresses yield [`OPEN_BUS`]. Writes fail on
/// unmapped addresses. The 16-bit accessors are little-endian pairs of byte
/// accesses and reject an address whose second byte would fall off the end
/// of the address space.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8) -> Result<()>;

    fn read16(&mut self, addr: u16) -> Result<u16> {
        let next = addr.checked_add(1).ok_or(Error::OutOfRange { addr })?;
        let low = self.read(addr);
        let high = self.read(next);
        Ok(u16::from_le_bytes([low, high]))
    }

    fn write16(&mut self, addr: u16, data: u16) -> Result<()> {
        let next = addr.checked_add(1).ok_or(Error::OutOfRange { addr })?;
        let [low, high] = data.to_le_bytes();
        self.write(addr, low)?;
        self.write(next, high)
    }
}

/// One bus address bound to one byte of a component's memory.
#[derive(Clone, Copy, Debug)]
struct Slot {
    /// Component whose window put this binding here.
    plugged: ComponentId,
    /// Component that owns the backing memory (differs for aliases).
    owner: ComponentId,
    index: usize,
}

/// Address table binding every address to a byte inside some component's
/// memory, or to nothing.
///
/// The bus holds the component table; components are referred to by
/// [`ComponentId`]. Aliased (mirrored) components hold the id of the owner,
/// never a second copy of its memory, and an owner cannot be released while
/// an alias to it exists.
pub struct AddressBus {
    slots: Box<[Option<Slot>]>,
    components: Vec<Option<Component>>,
}

impl Default for AddressBus {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressBus {
    pub fn new() -> Self {
        Self {
            slots: vec![None; BUS_SIZE].into_boxed_slice(),
            components: Vec::new(),
        }
    }

    /// Register a component with the bus. It is not plugged yet.
    pub fn attach(&mut self, component: Component) -> ComponentId {
        let id = ComponentId(self.components.len());
        debug!("attach {} as #{}", component.name(), id.0);
        self.components.push(Some(component));
        id
    }

    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        self.components
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(Error::UnknownComponent(id.0))
    }

    fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.components
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(Error::UnknownComponent(id.0))
    }

    /// Follow an alias to the component that owns the memory.
    fn memory_owner(&self, id: ComponentId) -> Result<ComponentId> {
        let component = self.component(id)?;
        match component.alias_source() {
            Some(source) => Ok(source),
            None if component.owns_memory() => Ok(id),
            None => Err(Error::NoMemory {
                name: component.name(),
            }),
        }
    }

    fn memory_len(&self, id: ComponentId) -> Result<usize> {
        let owner = self.memory_owner(id)?;
        let component = self.component(owner)?;
        component
            .owned()
            .map(|mem| mem.len())
            .ok_or(Error::NoMemory {
                name: component.name(),
            })
    }

    /// Make `alias` a non-owning view of `source`'s memory. Both then observe
    /// the same bytes through their own windows.
    pub fn share(&mut self, alias: ComponentId, source: ComponentId) -> Result<()> {
        let owner = self.memory_owner(source)?;
        let target = self.component(alias)?;
        if target.owns_memory() {
            return Err(Error::AlreadyOwnsMemory {
                name: target.name(),
            });
        }
        if alias == owner {
            return Err(Error::AlreadyOwnsMemory {
                name: target.name(),
            });
        }
        self.component_mut(alias)?.backing =
            super::component::Backing::Alias { source: owner };
        Ok(())
    }

    /// Bind `[start, end]` to the component's memory from offset 0, refusing
    /// if any address in the window is already mapped.
    pub fn plug(&mut self, id: ComponentId, start: u16, end: u16) -> Result<()> {
        if start > end {
            return Err(Error::InvertedWindow { start, end });
        }
        if let Some(addr) = (start..=end).find(|&addr| self.slots[addr as usize].is_some()) {
            return Err(Error::Overlap { addr });
        }
        self.forced_plug(id, start, end, 0)
    }

    /// Bind `[start, end]` to the component's memory starting at `offset`,
    /// overriding whatever was mapped there.
    pub fn forced_plug(
        &mut self,
        id: ComponentId,
        start: u16,
        end: u16,
        offset: usize,
    ) -> Result<()> {
        if start > end {
            return Err(Error::InvertedWindow { start, end });
        }
        let component = self.component(id)?;
        if let Some((s, e)) = component.window() {
            return Err(Error::AlreadyPlugged {
                name: component.name(),
                start: s,
                end: e,
            });
        }
        let name = component.name();
        let owner = self.memory_owner(id)?;
        let size = self.memory_len(id)?;
        let window = (end - start) as usize + 1;
        offset
            .checked_add(window)
            .filter(|&needed| needed <= size)
            .ok_or(Error::WindowTooLarge {
                window,
                offset,
                size,
            })?;

        for (i, addr) in (start..=end).enumerate() {
            self.slots[addr as usize] = Some(Slot {
                plugged: id,
                owner,
                index: offset + i,
            });
        }
        self.component_mut(id)?.set_window(start, end, offset);
        debug!("plug {name} at {start:#06X}-{end:#06X} (offset {offset})");
        Ok(())
    }

    /// Remove every binding this component put on the bus and mark it
    /// unplugged. Unplugging an unplugged component is a no-op.
    pub fn unplug(&mut self, id: ComponentId) -> Result<()> {
        let component = self.component(id)?;
        let Some((start, end)) = component.window() else {
            return Ok(());
        };
        let name = component.name();
        for addr in start..=end {
            let slot = &mut self.slots[addr as usize];
            if slot.is_some_and(|s| s.plugged == id) {
                *slot = None;
            }
        }
        self.component_mut(id)?.clear_window();
        debug!("unplug {name} from {start:#06X}-{end:#06X}");
        Ok(())
    }

    /// Unplug the component and hand it back, removing it from the bus.
    pub fn release(&mut self, id: ComponentId) -> Result<Component> {
        let name = self.component(id)?.name();
        let aliased = self
            .components
            .iter()
            .flatten()
            .any(|c| c.alias_source() == Some(id));
        if aliased {
            return Err(Error::MemoryInUse { name });
        }
        self.unplug(id)?;
        debug!("release {name}");
        self.components[id.0]
            .take()
            .ok_or(Error::UnknownComponent(id.0))
    }

    /// The component's backing bytes (through its alias, if any).
    pub fn memory(&self, id: ComponentId) -> Result<&[u8]> {
        let owner = self.memory_owner(id)?;
        let component = self.component(owner)?;
        component
            .owned()
            .map(|mem| mem.as_slice())
            .ok_or(Error::NoMemory {
                name: component.name(),
            })
    }

    pub fn memory_mut(&mut self, id: ComponentId) -> Result<&mut [u8]> {
        let owner = self.memory_owner(id)?;
        let component = self.component_mut(owner)?;
        let name = component.name();
        component
            .owned_mut()
            .map(|mem| mem.as_mut_slice())
            .ok_or(Error::NoMemory { name })
    }

    pub fn is_mapped(&self, addr: u16) -> bool {
        self.slots[addr as usize].is_some()
    }

    /// The component whose window currently serves `addr`.
    pub fn mapped_component(&self, addr: u16) -> Option<ComponentId> {
        self.slots[addr as usize].map(|s| s.plugged)
    }

    fn cell(&self, slot: Slot) -> Option<u8> {
        self.components
            .get(slot.owner.0)?
            .as_ref()?
            .owned()?
            .as_slice()
            .get(slot.index)
            .copied()
    }

    fn cell_mut(&mut self, slot: Slot) -> Option<&mut u8> {
        self.components
            .get_mut(slot.owner.0)?
            .as_mut()?
            .owned_mut()?
            .as_mut_slice()
            .get_mut(slot.index)
    }
}

impl Bus for AddressBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.slots[addr as usize]
            .and_then(|slot| self.cell(slot))
            .unwrap_or(OPEN_BUS)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        let slot = self.slots[addr as usize].ok_or(Error::Unmapped { addr })?;
        let cell = self.cell_mut(slot).ok_or(Error::Unmapped { addr })?;
        *cell = data;
        Ok(())
    }

    fn write16(&mut self, addr: u16, data: u16) -> Result<()> {
        let next = addr.checked_add(1).ok_or(Error::OutOfRange { addr })?;
        // Both halves must be writable before either is touched
        for a in [addr, next] {
            if !self.is_mapped(a) {
                return Err(Error::Unmapped { addr: a });
            }
        }
        let [low, high] = data.to_le_bytes();
        self.write(addr, low)?;
        self.write(next, high)
    }
}
