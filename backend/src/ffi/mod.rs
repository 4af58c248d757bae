//! PyO3 FFI bindings
//!
//! Exposes the lending environment to Python training loops with the
//! conventional `reset()` / `step(action)` interface.
//!
//! # Safety
//!
//! - All conversions validated at boundary
//! - Rust errors converted to Python exceptions
//! - No panics cross the FFI boundary

pub mod lending;
pub mod types;
