//! platinfo-core - operating-system and process introspection for Linux.
//!
//! Provides:
//! - `collector` - readers for `/proc`, `/sys` and the libc-level OS facilities
//! - `model` - plain result entities returned by every query
//! - `platform` - the [`Platform`] facade plus the aggregate [`Snapshot`]
//! - `title` - the process-wide title store
//! - `fmt` - formatting helpers for human-readable output
//!
//! Every query re-reads live OS state; nothing is cached between calls.

pub mod collector;
pub mod error;
pub mod fmt;
pub mod model;
pub mod platform;
pub mod title;

pub use error::{ErrorKind, PlatformError};
pub use model::{
    AddressFamily, CpuRecord, InterfaceAddress, InterfaceTable, LoadAverage, ProcessMemoryInfo,
};
pub use platform::{Platform, PlatformConfig, Snapshot, process_start_time};
