//! The wear-leveling driver: translator, cache, and segment as one unit.

use anyhow::bail;
use log::{debug, info, trace};
use memory_addr::VirtAddr;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{SEGMENT_WORDS, Word};
use crate::error::WearResult;
use crate::mm::{RramSegment, SramCache, Translator};

/// One wear-leveled memory segment with its cache, translator, and PRNG.
///
/// Strictly single-threaded: every operation runs to completion, and a
/// cache-full flush or a rotation touches the whole segment as one logical
/// unit. Callers that share an instance across threads must serialize
/// every `read`/`write`/`remap` around the whole value.
pub struct WearMem {
    translator: Translator,
    cache: SramCache,
    rram: RramSegment,
    rng: SmallRng,
}

impl WearMem {
    /// Build a zeroed segment with an empty cache and identity mapping.
    ///
    /// `seed` feeds the PRNG behind [`remap`](Self::remap)'s shift draw. A
    /// zero seed falls back to the system clock, which requires the `std`
    /// feature; pure `no_std` builds must pass a nonzero seed.
    pub fn new(seed: u64) -> WearResult<Self> {
        let seed = match seed {
            0 => time_seed()?,
            s => s,
        };
        info!("init wear-leveled segment: {SEGMENT_WORDS} words, seed {seed}");
        Ok(Self {
            translator: Translator::new(),
            cache: SramCache::new(),
            rram: RramSegment::new(),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Read the word at `vaddr`. An out-of-range address is fatal.
    pub fn read(&mut self, vaddr: VirtAddr) -> Word {
        assert!(
            vaddr.as_usize() < SEGMENT_WORDS,
            "virtual address {:#x} out of range",
            vaddr.as_usize()
        );
        let paddr = self.translator.to_physical(vaddr);
        trace!("read virtual {:#x} (physical {:#x})", vaddr.as_usize(), paddr.as_usize());
        self.cache.read(&mut self.rram, paddr)
    }

    /// Write `value` at `vaddr`, returning the written value. An
    /// out-of-range address is fatal.
    pub fn write(&mut self, vaddr: VirtAddr, value: Word) -> Word {
        assert!(
            vaddr.as_usize() < SEGMENT_WORDS,
            "virtual address {:#x} out of range",
            vaddr.as_usize()
        );
        let paddr = self.translator.to_physical(vaddr);
        trace!("write virtual {:#x} (physical {:#x})", vaddr.as_usize(), paddr.as_usize());
        self.cache.write(&mut self.rram, paddr, value)
    }

    /// Flush the write-back cache without rotating.
    pub fn flush(&mut self) {
        self.cache.flush(&mut self.rram);
    }

    /// One wear-leveling pass: flush the cache, advance the translation
    /// offset by a random nonzero shift, and rotate the segment in place
    /// to match. Every virtual address observes the same value afterwards.
    ///
    /// When to call this is the host's decision; every N writes is the
    /// usual policy.
    pub fn remap(&mut self) {
        // [1, SEGMENT_WORDS - 1]; a zero shift is a degenerate no-op and
        // must never reach the rotation.
        let shift = self.rng.random_range(1..SEGMENT_WORDS);
        debug!(
            "remap: shift {shift}, offset {} -> {}",
            self.translator.offset(),
            (self.translator.offset() + shift) % SEGMENT_WORDS
        );

        self.cache.flush(&mut self.rram);
        assert!(self.cache.is_empty(), "rotation requires an empty cache");
        self.translator.advance(shift);
        self.rram.rotate_by(shift);
    }

    /// Zero the cache and the segment and reset the mapping. The instance
    /// stays usable, but all stored data is gone.
    pub fn teardown(&mut self) {
        info!("tearing down wear-leveled segment");
        self.cache.clear();
        self.rram.clear();
        self.translator = Translator::new();
    }

    /// Current rotation offset, in `[0, SEGMENT_WORDS)`.
    pub fn offset(&self) -> usize {
        self.translator.offset()
    }

    /// Number of resident cache entries.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(feature = "std")]
fn time_seed() -> WearResult<u64> {
    use std::time::{SystemTime, UNIX_EPOCH};
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since_epoch) => Ok(since_epoch.as_nanos() as u64),
        Err(_) => bail!("system clock is before the unix epoch"),
    }
}

#[cfg(not(feature = "std"))]
fn time_seed() -> WearResult<u64> {
    bail!("zero seed needs a time source; enable the `std` feature or pass a nonzero seed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_addr::va;

    #[test]
    fn write_then_read_round_trips() {
        let mut mem = WearMem::new(42).unwrap();
        for i in 0..SEGMENT_WORDS {
            mem.write(va!(i), (1000 - i) as Word);
        }
        for i in 0..SEGMENT_WORDS {
            assert_eq!(mem.read(va!(i)), (1000 - i) as Word);
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn zero_seed_falls_back_to_the_clock() {
        let mut mem = WearMem::new(0).unwrap();
        assert_eq!(mem.write(va!(1), 7), 7);
        assert_eq!(mem.read(va!(1)), 7);
    }

    #[test]
    fn remap_flushes_and_rotates() {
        let mut mem = WearMem::new(7).unwrap();
        mem.write(va!(0), 11);
        mem.write(va!(1), 22);

        mem.remap();
        assert_eq!(mem.cache_len(), 0);
        assert_ne!(mem.offset(), 0);
        assert_eq!(mem.read(va!(0)), 11);
        assert_eq!(mem.read(va!(1)), 22);
    }

    #[test]
    fn teardown_zeroes_everything() {
        let mut mem = WearMem::new(9).unwrap();
        for i in 0..SEGMENT_WORDS {
            mem.write(va!(i), 0xAB);
        }
        mem.remap();
        mem.teardown();

        assert_eq!(mem.cache_len(), 0);
        assert_eq!(mem.offset(), 0);
        for i in 0..SEGMENT_WORDS {
            assert_eq!(mem.read(va!(i)), 0);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_read_is_fatal() {
        let mut mem = WearMem::new(1).unwrap();
        mem.read(va!(SEGMENT_WORDS));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_write_is_fatal() {
        let mut mem = WearMem::new(1).unwrap();
        mem.write(va!(SEGMENT_WORDS), 1);
    }
}
