/// Small value types shared across the crate.
pub mod core;
/// Crate error type.
pub mod error;
/// Hashing and fixed-point helpers.
pub mod math;
