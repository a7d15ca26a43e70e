//! Build-time configuration constants.
//!
//! `SEGMENT_WORDS` and `CACHE_WORDS` mirror the reference target layout.
//! Both must be powers of two so the remap engine can use the
//! trailing-zeros gcd fast path when decomposing a rotation into cycles.

/// Number of words in the wear-limited backing segment (the full
/// wear-leveled address space).
pub const SEGMENT_WORDS: usize = 16;

/// Number of words the volatile write-back cache can hold.
pub const CACHE_WORDS: usize = 4;

/// Payload word, 16-bit on the target board.
#[cfg(not(feature = "wide-word"))]
pub type Word = u16;

/// Payload word, widened for host testing.
#[cfg(feature = "wide-word")]
pub type Word = u64;

const _: () = assert!(SEGMENT_WORDS.is_power_of_two());
const _: () = assert!(CACHE_WORDS > 0 && CACHE_WORDS <= SEGMENT_WORDS);
