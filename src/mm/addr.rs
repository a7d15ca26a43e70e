//! Address translation utilities.
//!
//! Virtual addresses are stable from the caller's point of view; the
//! physical slot backing each one moves whenever the remap engine rotates
//! the segment. The two spaces are related by a single rotation offset,
//! so translation is a bijection for any fixed offset.

use memory_addr::{PhysAddr, VirtAddr, pa, va};

use crate::config::SEGMENT_WORDS;

/// Virtual/physical translator for one wear-leveled segment.
#[derive(Debug, Default)]
pub struct Translator {
    offset: usize,
}

impl Translator {
    /// Create a translator with a zero offset (identity mapping).
    pub const fn new() -> Self {
        Self { offset: 0 }
    }

    /// Current rotation offset, in `[0, SEGMENT_WORDS)`.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Convert a virtual address to its current physical slot.
    ///
    /// Adds `SEGMENT_WORDS` before subtracting the offset so the
    /// intermediate value never underflows when `vaddr < offset`.
    pub const fn to_physical(&self, vaddr: VirtAddr) -> PhysAddr {
        pa!((vaddr.as_usize() + SEGMENT_WORDS - self.offset) % SEGMENT_WORDS)
    }

    /// Convert a physical slot back to the virtual address it backs.
    pub const fn to_virtual(&self, paddr: PhysAddr) -> VirtAddr {
        va!((paddr.as_usize() + self.offset) % SEGMENT_WORDS)
    }

    /// Advance the offset by `shift` slots.
    ///
    /// The caller must have flushed the cache first: cache entries are
    /// keyed by physical address and would go stale under the new mapping.
    pub fn advance(&mut self, shift: usize) {
        debug_assert!(shift > 0 && shift < SEGMENT_WORDS);
        self.offset = (self.offset + shift) % SEGMENT_WORDS;
    }
}
