//! Shared utilities.
//!
//! Path helpers used across the crate, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
