//! dmbundle-lib: data-mapper bundling pipeline.
//!
//! Stages each data-mapper module into a shared workspace, drives the external
//! Maven/npm toolchain to compile and bundle it, and collects the bundle back
//! into the module directory:
//! - `module`: discovery of data-mapper modules
//! - `workspace`: transient path layout and generated config files
//! - `stage`: copying sources in and bundles out
//! - `toolchain`: build steps and the external invoker
//! - `cleanup`: per-module and final teardown
//! - `bundle`: the orchestrator tying it together

pub mod bundle;
pub mod cleanup;
pub mod consts;
pub mod module;
pub mod stage;
pub mod toolchain;
pub mod util;
pub mod workspace;
