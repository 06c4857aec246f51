//! The PID file access-mode whitelist.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// The access intent for opening a PID file.
///
/// Exactly two modes are supported. Anything else is rejected at the string
/// boundary by [`Mode::from_str`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Create the file if absent, truncate it if present, open for writing.
    WriteCreate,
    /// Open an existing file for reading. The file must already exist.
    Read,
}

impl Display for Mode {
    /// Formats the value as its canonical spelling.
    ///
    /// # Examples
    ///
    /// ```
    /// use pidscope::Mode;
    ///
    /// assert_eq!(Mode::WriteCreate.to_string(), "write-create");
    /// assert_eq!(Mode::Read.to_string(), "read");
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteCreate => f.write_str("write-create"),
            Self::Read => f.write_str("read"),
        }
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    /// Parses the string into a `Mode`.
    ///
    /// The short spellings `w+` and `r` are accepted as aliases for
    /// `write-create` and `read`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pidscope::Mode;
    ///
    /// let mode: Mode = "write-create".parse().unwrap();
    /// assert_eq!(mode, Mode::WriteCreate);
    ///
    /// let mode: Mode = "r".parse().unwrap();
    /// assert_eq!(mode, Mode::Read);
    ///
    /// assert!("append".parse::<Mode>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "write-create" | "w+" => Ok(Self::WriteCreate),
            "read" | "r" => Ok(Self::Read),
            _ => Err(ParseModeError(value.into())),
        }
    }
}

/// The error returned when a mode string is not in the supported set.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unrecognized PID file mode '{0}'")]
pub struct ParseModeError(String);
