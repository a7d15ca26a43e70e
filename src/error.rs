//! Unified error types for the wear-leveling layer.
//!
//! This module uses anyhow for flexible error handling in a no_std
//! environment. The only fallible operation is [`crate::WearMem::new`];
//! everything past construction is a total function over fixed-size
//! storage, and invariant violations (out-of-range addresses, a zero
//! rotation shift) abort instead of returning an error, since silently
//! corrupting memory is worse than halting.
//!
//! ## Usage Examples
//!
//! Creating errors:
//! ```ignore
//! anyhow::bail!("Operation failed");
//! anyhow::bail!("Invalid parameter: {}", param);
//! ```
//!
//! Ensuring conditions:
//! ```ignore
//! anyhow::ensure!(value > 0, "Value must be positive");
//! ```

/// Result type alias using anyhow::Error.
///
/// This provides flexible error handling with context and error chaining.
pub type WearResult<T> = anyhow::Result<T>;
