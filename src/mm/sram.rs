//! Volatile write-back cache ("SRAM") that absorbs hot writes.
//!
//! Eviction is all-or-nothing: when the table is full and a new address
//! faults in, the whole cache is flushed first. That bounds the worst-case
//! flush at one pass over the cache and keeps coherence reasoning simple,
//! at the cost of discarding warm clean entries on overflow.

use log::trace;
use memory_addr::{PhysAddr, pa};

use super::rram::RramSegment;
use crate::config::{CACHE_WORDS, SEGMENT_WORDS, Word};

/// Coherence state of one cached word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    /// The backing-store copy matches the cached value.
    Sync,
    /// The cached value is newer than the backing-store copy.
    Dirty,
}

/// Tag for one cached physical address: the cache slot holding its value
/// and the coherence state of that slot.
#[derive(Debug, Clone, Copy)]
struct CacheTag {
    slot: usize,
    state: WordState,
}

/// Bounded write-back cache over an [`RramSegment`].
///
/// The tag table is dense, indexed by physical address: the segment is
/// small, so `SEGMENT_WORDS` tag slots cost less than an associative
/// structure and need no allocator. Observable behavior would be identical
/// with an associative-by-capacity table.
pub struct SramCache {
    words: [Word; CACHE_WORDS],
    tags: [Option<CacheTag>; SEGMENT_WORDS],
    len: usize,
}

impl SramCache {
    /// Empty cache with zeroed value slots.
    pub const fn new() -> Self {
        Self {
            words: [0; CACHE_WORDS],
            tags: [None; SEGMENT_WORDS],
            len: 0,
        }
    }

    /// Number of resident entries, never exceeding `CACHE_WORDS`.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the word at `paddr`, faulting it in on a miss.
    ///
    /// A hit returns the cached value whatever its state. A miss fetches
    /// from the segment, flushing the full cache first if there is no free
    /// slot, and inserts the fetched word as `Sync` (reads do not dirty).
    pub fn read(&mut self, rram: &mut RramSegment, paddr: PhysAddr) -> Word {
        if let Some(tag) = self.tags[paddr.as_usize()] {
            trace!("cache hit at physical {:#x}", paddr.as_usize());
            return self.words[tag.slot];
        }

        let value = rram.get(paddr);
        if self.len == CACHE_WORDS {
            self.flush(rram);
        }
        self.insert(paddr, value, WordState::Sync);
        value
    }

    /// Write `value` at `paddr` through the cache; returns the value.
    ///
    /// A hit overwrites the existing slot in place and marks it dirty (the
    /// slot is reused, never reassigned). A miss inserts a dirty entry,
    /// flushing the full cache first if there is no free slot.
    pub fn write(&mut self, rram: &mut RramSegment, paddr: PhysAddr, value: Word) -> Word {
        if let Some(tag) = &mut self.tags[paddr.as_usize()] {
            self.words[tag.slot] = value;
            tag.state = WordState::Dirty;
            return value;
        }

        if self.len == CACHE_WORDS {
            self.flush(rram);
        }
        self.insert(paddr, value, WordState::Dirty);
        value
    }

    /// Write every dirty entry back to the segment, then drop all entries.
    ///
    /// Sync entries are discarded without a write; the segment is already
    /// authoritative for them, and skipping the write is what spares
    /// endurance. This is the only path besides a rotation step that
    /// touches the segment.
    pub fn flush(&mut self, rram: &mut RramSegment) {
        trace!("flushing {} cached words", self.len);
        for (addr, tag) in self.tags.iter().enumerate() {
            if let Some(CacheTag {
                slot,
                state: WordState::Dirty,
            }) = tag
            {
                rram.set(pa!(addr), self.words[*slot]);
            }
        }
        self.clear();
    }

    /// Drop every entry and zero the value slots.
    pub fn clear(&mut self) {
        self.words = [0; CACHE_WORDS];
        self.tags = [None; SEGMENT_WORDS];
        self.len = 0;
    }

    fn insert(&mut self, paddr: PhysAddr, value: Word, state: WordState) {
        debug_assert!(self.len < CACHE_WORDS);
        self.words[self.len] = value;
        self.tags[paddr.as_usize()] = Some(CacheTag {
            slot: self.len,
            state,
        });
        self.len += 1;
    }
}

impl Default for SramCache {
    fn default() -> Self {
        Self::new()
    }
}
