use crate::error::{Error, Result};

/// Owned, fixed-length, zero-initialized byte buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    cells: Box<[u8]>,
}

impl Memory {
    /// Allocate `size` zeroed bytes. A zero size is rejected, and allocation
    /// failure is reported instead of aborting.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::ZeroSize);
        }
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory { size })?;
        cells.resize(size, 0);
        Ok(Self {
            cells: cells.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Copy `bytes` into the buffer starting at `offset`.
    pub fn load(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset
            .checked_add(bytes.len())
            .filter(|&end| end <= self.cells.len())
            .ok_or(Error::WindowTooLarge {
                window: bytes.len(),
                offset,
                size: self.cells.len(),
            })?;
        self.cells[offset..end].copy_from_slice(bytes);
        Ok(())
    }
}
