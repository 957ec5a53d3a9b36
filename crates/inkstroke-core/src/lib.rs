//! inkstroke core
//!
//! Shared building blocks for the inkstroke crates: logging setup, profiling
//! scopes, math re-exports and DPI-aware geometry types.

pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
