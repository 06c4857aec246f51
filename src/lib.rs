mod error;
mod mode;
mod pidfile;

#[cfg(feature = "serde")]
mod serde;

pub use error::{Error, Result};
pub use mode::{Mode, ParseModeError};
pub use pidfile::PidFile;

pub use nix::errno::Errno;

use std::path::Path;

/// Creates a guard for the PID file at `path`, to be opened with `mode`.
///
/// Shorthand for [`PidFile::new`].
pub fn pidfile<P: AsRef<Path>>(path: P, mode: &str) -> Result<PidFile> {
    PidFile::new(path, mode)
}
