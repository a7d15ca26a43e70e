//! The wear-limited backing segment ("RRAM") and its in-place rotation.

use log::trace;
use memory_addr::PhysAddr;

use crate::config::{SEGMENT_WORDS, Word};

/// Fixed-size array of wear-limited non-volatile words.
///
/// This is the authoritative storage. Every `set` consumes endurance of
/// the underlying cell, so normal traffic goes through the write-back
/// cache; only a cache flush or a rotation writes here directly.
pub struct RramSegment {
    words: [Word; SEGMENT_WORDS],
}

impl RramSegment {
    /// Zero-initialized segment.
    pub const fn new() -> Self {
        Self {
            words: [0; SEGMENT_WORDS],
        }
    }

    /// Read the word at `paddr`. An out-of-range index is fatal.
    pub fn get(&self, paddr: PhysAddr) -> Word {
        assert!(
            paddr.as_usize() < SEGMENT_WORDS,
            "physical address {:#x} out of range",
            paddr.as_usize()
        );
        self.words[paddr.as_usize()]
    }

    /// Write the word at `paddr`. An out-of-range index is fatal.
    pub fn set(&mut self, paddr: PhysAddr, value: Word) {
        assert!(
            paddr.as_usize() < SEGMENT_WORDS,
            "physical address {:#x} out of range",
            paddr.as_usize()
        );
        self.words[paddr.as_usize()] = value;
    }

    /// Zero the whole segment.
    pub fn clear(&mut self) {
        self.words = [0; SEGMENT_WORDS];
    }

    /// Rotate the segment in place so slot `i` afterwards holds what slot
    /// `(i + shift) % SEGMENT_WORDS` held before.
    ///
    /// The rotation permutation splits into `gcd(shift, SEGMENT_WORDS)`
    /// disjoint cycles; each cycle is walked with a single temporary word,
    /// so no second buffer of segment size is needed.
    ///
    /// `shift` must be in `[1, SEGMENT_WORDS)`; the cache must have been
    /// flushed before the call, or cached data reverts to the old layout.
    pub fn rotate_by(&mut self, shift: usize) {
        assert!(
            shift > 0 && shift < SEGMENT_WORDS,
            "rotation shift {shift} out of range"
        );

        let cycles = cycle_count(shift);
        let cycle_len = SEGMENT_WORDS / cycles;
        trace!("rotate by {shift}: {cycles} cycles of length {cycle_len}");

        for start in 0..cycles {
            let tmp = self.words[start];
            let mut curr = start;
            for _ in 0..cycle_len - 1 {
                let next = (curr + shift) % SEGMENT_WORDS;
                self.words[curr] = self.words[next];
                curr = next;
            }
            self.words[curr] = tmp;
        }
    }
}

impl Default for RramSegment {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of disjoint cycles in a rotation by `shift`: `gcd(shift, M)`.
///
/// For a power-of-two segment the gcd is the largest power of two dividing
/// `shift`, capped at the segment size, which trailing_zeros computes
/// directly. Non-power-of-two segments fall back to Euclid. `shift` must
/// be nonzero; trailing_zeros of zero would give a nonsense cycle count.
fn cycle_count(shift: usize) -> usize {
    debug_assert!(shift > 0);
    if SEGMENT_WORDS.is_power_of_two() {
        1 << shift
            .trailing_zeros()
            .min(SEGMENT_WORDS.trailing_zeros())
    } else {
        gcd(shift, SEGMENT_WORDS)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_addr::pa;

    fn counting_segment() -> RramSegment {
        let mut seg = RramSegment::new();
        for i in 0..SEGMENT_WORDS {
            seg.set(pa!(i), i as Word);
        }
        seg
    }

    #[test]
    fn rotate_moves_every_word_by_shift() {
        for shift in 1..SEGMENT_WORDS {
            let mut seg = counting_segment();
            seg.rotate_by(shift);
            for i in 0..SEGMENT_WORDS {
                assert_eq!(
                    seg.get(pa!(i)),
                    ((i + shift) % SEGMENT_WORDS) as Word,
                    "shift {shift}, slot {i}"
                );
            }
        }
    }

    #[test]
    fn rotations_compose() {
        let mut seg = counting_segment();
        seg.rotate_by(3);
        seg.rotate_by(SEGMENT_WORDS - 3);
        for i in 0..SEGMENT_WORDS {
            assert_eq!(seg.get(pa!(i)), i as Word);
        }
    }

    #[test]
    fn cycle_count_matches_euclid_gcd() {
        for shift in 1..SEGMENT_WORDS {
            assert_eq!(cycle_count(shift), gcd(shift, SEGMENT_WORDS), "shift {shift}");
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn zero_shift_is_fatal() {
        RramSegment::new().rotate_by(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn full_segment_shift_is_fatal() {
        RramSegment::new().rotate_by(SEGMENT_WORDS);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_get_is_fatal() {
        RramSegment::new().get(pa!(SEGMENT_WORDS));
    }
}
