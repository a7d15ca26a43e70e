//! RRAM endurance mitigation layer.
//!
//! Sits between a host's logical address space and a wear-limited
//! non-volatile word array. Repeated writes to one address are absorbed by
//! a small volatile write-back cache, and a remap engine periodically
//! rotates which physical cell backs each logical address so write traffic
//! spreads across the whole segment.
//!
//! The crate is `no_std` when built without the `std` feature; `std` is
//! only needed for the system-clock fallback when [`WearMem::new`] is
//! given a zero seed.
//!
//! All state lives in one owned [`WearMem`] value. The design is strictly
//! single-threaded: read, write, and remap each mutate the translator,
//! cache, and segment as one unit, so concurrent callers must serialize
//! around the whole value.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod device;
pub mod error;
pub mod mm;

pub use config::{CACHE_WORDS, SEGMENT_WORDS, Word};
pub use device::WearMem;
pub use error::WearResult;
pub use memory_addr::{PhysAddr, VirtAddr, pa, va};
