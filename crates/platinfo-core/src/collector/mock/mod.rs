//! In-memory stand-ins for the filesystem and the OS facilities.
//!
//! `MockFs` and `MockOs` let every reader be exercised against fixed
//! fixtures, including on machines that are not running Linux.

mod filesystem;
mod os;
mod scenarios;

pub use filesystem::MockFs;
pub use os::MockOs;
pub use scenarios::self_stat_line;
