//! Readers for the Linux `/proc` and `/sys` filesystems.
//!
//! This module provides parsers and collectors for reading process and CPU
//! information from kernel pseudo-files.

pub mod cpu;
pub mod parser;
pub mod process;

pub use cpu::CpuCollector;
pub use parser::ParseError;
pub use process::{EXE_PATH_CAPACITY, ProcessCollector};
