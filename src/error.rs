use nix::errno::Errno;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised when constructing or entering a [`PidFile`] scope.
///
/// Passing the wrong type for a path or mode is a compile-time error and has
/// no runtime representation here. Unrecognized mode *values* are not an
/// error at all: construction reports a diagnostic and yields a degraded
/// instance instead (see [`PidFile::new`]).
///
/// [`PidFile`]: crate::PidFile
/// [`PidFile::new`]: crate::PidFile::new
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A constructor argument was structurally invalid, such as an empty
    /// path or an empty mode string.
    #[error("bad call: {0}")]
    BadCall(&'static str),

    /// An entry-time precondition was violated: read mode with a missing
    /// file, or an unrecognized mode reaching scope entry.
    #[error("invalid parameter: {0}")]
    Parameter(&'static str),

    /// The underlying open call failed.
    #[error("failed to open PID file '{}': {source}", .path.display())]
    Open { path: PathBuf, source: Errno },
}

impl Error {
    /// Returns true if the self value is an entry-time precondition failure.
    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }
}
