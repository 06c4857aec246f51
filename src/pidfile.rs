use crate::{Error, Mode, Result};

use nix::{
    fcntl::{self, OFlag},
    sys::stat,
};
use std::{
    fmt::{self, Display, Formatter},
    fs::File,
    os::fd::AsRawFd,
    path::{Path, PathBuf},
};

const TARGET: &str = "pidscope::pidfile";

/// A scope guard for a PID file.
///
/// Construction validates its arguments but does not touch the filesystem.
/// [`enter`] opens the file according to the configured [`Mode`] and hands
/// back the handle; [`exit`] closes it. The handle is owned exclusively by
/// the guard between entry and exit, and dropping the guard closes it on any
/// exit path that skipped an explicit [`exit`].
///
/// The guard is meant for a single open/close cycle. It provides no locking:
/// two processes racing to create the same PID file are not serialized here.
///
/// # Examples
///
/// ```no_run
/// use std::io::Write;
///
/// fn main() -> pidscope::Result<()> {
///     let mut pidfile = pidscope::pidfile("/run/mydaemon.pid", "write-create")?;
///
///     let handle = pidfile.enter()?;
///     write!(handle, "{}", std::process::id()).expect("pidfile is writable");
///
///     pidfile.exit();
///     Ok(())
/// }
/// ```
///
/// [`enter`]: Self::enter
/// [`exit`]: Self::exit
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
    mode: Option<Mode>,
    handle: Option<File>,
}

impl PidFile {
    /// Creates a guard for the PID file at `path`, to be opened with `mode`.
    ///
    /// An empty path or an empty mode string fails with [`Error::BadCall`].
    /// A non-empty mode string outside the supported set does *not* fail:
    /// a diagnostic is logged and the guard is returned in a degraded state
    /// in which [`enter`] always fails. Callers that want to surface bad
    /// modes eagerly should check [`is_ready`] after construction.
    ///
    /// [`enter`]: Self::enter
    /// [`is_ready`]: Self::is_ready
    pub fn new<P: AsRef<Path>>(path: P, mode: &str) -> Result<Self> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(Error::BadCall("PID file path must not be empty"));
        }

        if mode.is_empty() {
            return Err(Error::BadCall("PID file mode must not be empty"));
        }

        let mode = match mode.parse() {
            Ok(mode) => Some(mode),
            Err(_) => {
                log::warn!(
                    target: TARGET,
                    "PID file mode can be <write-create | read>"
                );
                None
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            handle: None,
        })
    }

    /// Returns the path of the PID file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the access mode, if the mode string was recognized.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Returns true if the guard holds a recognized mode and entry can be
    /// attempted.
    pub fn is_ready(&self) -> bool {
        self.mode.is_some()
    }

    /// Opens the PID file and returns the handle.
    ///
    /// In read mode, the file must already exist. In write-create mode, the
    /// file is created if absent and truncated if present. The returned
    /// borrow is valid until [`exit`] runs; the guard retains ownership of
    /// the handle.
    ///
    /// [`exit`]: Self::exit
    pub fn enter(&mut self) -> Result<&mut File> {
        let Some(mode) = self.mode else {
            return Err(Error::Parameter("check PID file mode"));
        };

        let flags = match mode {
            Mode::Read => {
                if !self.path.exists() {
                    return Err(Error::Parameter("check PID file path"));
                }

                OFlag::O_RDONLY
            }
            Mode::WriteCreate => OFlag::O_RDWR | OFlag::O_CREAT | OFlag::O_TRUNC,
        };

        let fd = fcntl::open(
            &self.path,
            flags,
            stat::Mode::S_IRUSR
                | stat::Mode::S_IWUSR
                | stat::Mode::S_IRGRP
                | stat::Mode::S_IROTH,
        )
        .map_err(|source| Error::Open {
            path: self.path.clone(),
            source,
        })?;

        Ok(self.handle.insert(fd.into()))
    }

    /// Closes the handle opened by [`enter`].
    ///
    /// Safe to call on every exit path: if no handle was ever opened, this
    /// is a no-op. Close failures are not reported.
    ///
    /// [`enter`]: Self::enter
    pub fn exit(&mut self) {
        self.handle.take();
    }
}

impl Display for PidFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PidFile ({}, ", self.path.display())?;

        match self.mode {
            Some(mode) => write!(f, "{mode}, ")?,
            None => f.write_str("invalid mode, ")?,
        }

        match &self.handle {
            Some(handle) => write!(f, "open fd {})", handle.as_raw_fd()),
            None => f.write_str("no handle)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        fs,
        io::{Read, Seek, Write},
    };
    use tempfile::TempDir;

    fn workspace() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daemon.pid");

        (dir, path)
    }

    #[test]
    fn empty_path_is_a_bad_call() {
        let err = PidFile::new("", "read").unwrap_err();

        assert!(matches!(err, Error::BadCall(_)));
    }

    #[test]
    fn empty_mode_is_a_bad_call() {
        let err = PidFile::new("/run/daemon.pid", "").unwrap_err();

        assert!(matches!(err, Error::BadCall(_)));
    }

    #[test]
    fn unrecognized_mode_degrades_instead_of_failing() {
        let pidfile = PidFile::new("/run/daemon.pid", "a+").unwrap();

        assert!(!pidfile.is_ready());
        assert!(pidfile.mode().is_none());
    }

    #[test]
    fn entering_with_degraded_mode_fails() {
        let mut pidfile = PidFile::new("/run/daemon.pid", "rw").unwrap();

        let err = pidfile.enter().unwrap_err();

        assert!(err.is_parameter());
        assert_eq!("invalid parameter: check PID file mode", err.to_string());
    }

    #[test]
    fn reading_a_missing_file_fails() {
        let (_dir, path) = workspace();
        let mut pidfile = PidFile::new(&path, "read").unwrap();

        let err = pidfile.enter().unwrap_err();

        assert!(err.is_parameter());
        assert_eq!("invalid parameter: check PID file path", err.to_string());
    }

    #[test]
    fn write_create_creates_a_missing_file() {
        let (_dir, path) = workspace();
        let mut pidfile = PidFile::new(&path, "write-create").unwrap();

        pidfile.enter().unwrap();
        pidfile.exit();

        assert!(path.exists());
    }

    #[test]
    fn write_create_truncates_existing_content() {
        let (_dir, path) = workspace();
        fs::write(&path, "98765").unwrap();

        let mut pidfile = PidFile::new(&path, "write-create").unwrap();
        pidfile.enter().unwrap();

        assert_eq!(0, fs::metadata(&path).unwrap().len());

        pidfile.exit();
    }

    #[test]
    fn exit_without_entry_is_a_noop() {
        let (_dir, path) = workspace();
        let mut pidfile = PidFile::new(&path, "read").unwrap();

        pidfile.exit();
        pidfile.exit();

        assert!(!path.exists());
    }

    #[test]
    fn exit_closes_the_handle() {
        let (_dir, path) = workspace();
        let mut pidfile = PidFile::new(&path, "write-create").unwrap();

        pidfile.enter().unwrap();
        pidfile.exit();

        assert!(pidfile.to_string().ends_with("no handle)"));
    }

    #[test]
    fn handle_survives_reads_and_writes() {
        let (_dir, path) = workspace();
        let mut pidfile = PidFile::new(&path, "w+").unwrap();

        let handle = pidfile.enter().unwrap();
        write!(handle, "4242").unwrap();
        handle.rewind().unwrap();

        let mut content = String::new();
        handle.read_to_string(&mut content).unwrap();

        assert_eq!("4242", content);

        pidfile.exit();
    }

    #[test]
    fn pid_round_trips_through_separate_scopes() {
        let (_dir, path) = workspace();

        let mut writer = PidFile::new(&path, "write-create").unwrap();
        write!(writer.enter().unwrap(), "1234").unwrap();
        writer.exit();

        let mut reader = PidFile::new(&path, "read").unwrap();
        let mut content = String::new();
        reader.enter().unwrap().read_to_string(&mut content).unwrap();
        reader.exit();

        assert_eq!("1234", content);
    }

    #[test]
    fn display_reports_path_mode_and_handle() {
        let (_dir, path) = workspace();
        let mut pidfile = PidFile::new(&path, "read").unwrap();

        assert_eq!(
            format!("PidFile ({}, read, no handle)", path.display()),
            pidfile.to_string()
        );

        fs::write(&path, "1").unwrap();
        pidfile.enter().unwrap();

        assert!(pidfile.to_string().contains("open fd"));

        pidfile.exit();
    }
}
