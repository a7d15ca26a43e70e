//! Memory management module.
//!
//! This module provides the wear-leveling building blocks:
//! - Virtual/physical address translation under a rotating offset
//! - The wear-limited backing segment and its in-place rotation
//! - The volatile write-back cache that absorbs hot writes

pub mod addr;
pub mod rram;
pub mod sram;

pub use addr::Translator;
pub use rram::RramSegment;
pub use sram::{SramCache, WordState};
