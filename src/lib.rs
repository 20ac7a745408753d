//! Device lifecycle, optical burn/verify and desktop search core for a
//! file manager.
//!
//! Three largely independent subsystems share only an error-band
//! convention and a handful of filesystem-location defaults:
//!
//! - [`device`] tracks block and network-protocol storage devices,
//!   mounts and unmounts them, and drives network-share credential
//!   prompting.
//! - [`optical`] reads optical disc info and burns/erases/verifies
//!   discs via `xorriso` and an optional UDF burn library.
//! - [`search`] plans and executes filename/content queries against an
//!   external index, falling back to a filesystem walk.

pub mod config;
pub mod device;
pub mod error;
pub mod optical;
pub mod search;

pub use error::{DeviceError, DeviceErrorKind};

/// Installs the crate's default logger. Binaries embedding this crate
/// call this once at startup; the level filter comes from `RUST_LOG`
/// the way env_logger always reads it, defaulting to `info` when unset.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
