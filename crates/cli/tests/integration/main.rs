//! CLI integration tests.
//!
//! These drive the `dmbundle` binary against a shell-script stand-in for
//! Maven, so they only run on Unix.

#![cfg(unix)]

mod bundle_tests;
