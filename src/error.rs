//! Error types for decoding and encoding.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// The error type of this crate: either a decode failure or an encode
/// failure.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An error occurred while decoding TOML source text.
    Decode(DecodeError),
    /// An error occurred while encoding a [`crate::Value`] tree.
    Encode(EncodeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "{e}"),
            Error::Encode(e) => write!(f, "{e}"),
        }
    }
}

// TODO: Implement core::error::Error instead when we can bump the MSRV to 1.81.
#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            Error::Encode(e) => Some(e),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

/// A decode failure: a message plus the scanner's position when the
/// problem was detected.
///
/// `line` is one-based, `column` is zero-based, matching the convention
/// most editors use. The position points at or just past the offending
/// construct — decoding aborts on the first error, there is no partial
/// recovery or list of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
    line: usize,
    column: usize,
}

impl DecodeError {
    pub(crate) fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// The human-readable description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The one-based line at which the error was detected.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The zero-based column at which the error was detected.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}, column {})",
            self.message, self.line, self.column
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// An encode failure: a message, and, when the failure is localized to a
/// specific key, that key's dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    message: String,
    path: Option<Vec<String>>,
}

impl EncodeError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub(crate) fn at_path(message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }

    /// The human-readable description of what went wrong.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The dotted path of the key the failure is localized to, if any.
    pub fn path(&self) -> Option<&[String]> {
        self.path.as_deref()
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} (key '{}')", self.message, path.join(".")),
            None => write!(f, "{}", self.message),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}
