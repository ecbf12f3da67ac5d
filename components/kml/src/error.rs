use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

use crate::State;

pub type Result<T> = std::result::Result<T, KmlError>;

#[derive(Debug)]
enum Repr {
    Io(std::io::Error),
    Protocol {
        operation: &'static str,
        state: State,
    },
    FolderUnderflow,
    UnclosedFolders {
        depth: usize,
    },
}

/// Category of a [`KmlError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Writing the document failed
    Io,
    /// Operation called in a state where it is not allowed
    Protocol,
    /// `close_folder` without an open folder
    FolderUnderflow,
    /// `close` while folders are still open
    UnclosedFolders,
}

pub struct KmlError(Box<Repr>);

impl KmlError {
    pub(crate) fn new_protocol(operation: &'static str, state: State) -> Self {
        Self(Box::new(Repr::Protocol { operation, state }))
    }

    pub(crate) fn new_folder_underflow() -> Self {
        Self(Box::new(Repr::FolderUnderflow))
    }

    pub(crate) fn new_unclosed_folders(depth: usize) -> Self {
        Self(Box::new(Repr::UnclosedFolders { depth }))
    }

    pub fn kind(&self) -> ErrorKind {
        match self.0.deref() {
            Repr::Io(_) => ErrorKind::Io,
            Repr::Protocol { .. } => ErrorKind::Protocol,
            Repr::FolderUnderflow => ErrorKind::FolderUnderflow,
            Repr::UnclosedFolders { .. } => ErrorKind::UnclosedFolders,
        }
    }

    /// State the document was in when a protocol violation was rejected
    pub fn state(&self) -> Option<State> {
        match self.0.deref() {
            Repr::Protocol { state, .. } => Some(*state),
            _ => None,
        }
    }
}

impl Debug for KmlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for KmlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.deref() {
            Repr::Io(err) => f.write_fmt(format_args!("i/o error: {}", err)),
            Repr::Protocol { operation, state } => f.write_fmt(format_args!(
                "`{}` is not allowed when the document is {}",
                operation, state
            )),
            Repr::FolderUnderflow => f.write_str("`close_folder` without an open folder"),
            Repr::UnclosedFolders { depth } => f.write_fmt(format_args!(
                "cannot close document with {} open folder(s)",
                depth
            )),
        }
    }
}

impl std::error::Error for KmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.0.deref() {
            Repr::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for KmlError {
    fn from(value: std::io::Error) -> Self {
        Self(Box::new(Repr::Io(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_protocol() {
        let err = KmlError::new_protocol("add_placemark", State::Empty);
        assert_eq!(
            "`add_placemark` is not allowed when the document is empty",
            err.to_string()
        );
        assert_eq!(ErrorKind::Protocol, err.kind());
        assert_eq!(Some(State::Empty), err.state());
    }

    #[test]
    fn display_unclosed() {
        let err = KmlError::new_unclosed_folders(2);
        assert_eq!("cannot close document with 2 open folder(s)", err.to_string());
        assert_eq!(None, err.state());
    }

    #[test]
    fn io_source() {
        let err: KmlError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(ErrorKind::Io, err.kind());
        assert_eq!("i/o error: disk full", err.to_string());
        assert!(std::error::Error::source(&err).is_some());
    }
}
