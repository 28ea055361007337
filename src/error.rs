//! The typed failures a section lookup can produce.

use core::fmt;
use core::result;
use std::error;
use std::io;

#[derive(Debug)]
/// A custom error for this crate
pub enum Error {
    /// A read the headers claim should succeed would run past the end of the file
    TruncatedFile(String),
    /// `EI_CLASS` held something other than the 32-bit or 64-bit tag
    UnsupportedElfClass(u8),
    /// The scan finished without a name match
    SectionNotFound(String),
    /// An IO based error
    IO(io::Error),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IO(io) => Some(io),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IO(err)
    }
}

impl From<scroll::Error> for Error {
    // every scroll failure in this crate is a fixed-layout read off the end of a buffer
    fn from(err: scroll::Error) -> Error {
        Error::TruncatedFile(err.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TruncatedFile(msg) => write!(fmt, "Truncated file: {}", msg),
            Error::UnsupportedElfClass(class) => {
                write!(fmt, "Unsupported ELF class: 0x{:x}", class)
            }
            Error::SectionNotFound(name) => write!(fmt, "Section not found: {}", name),
            Error::IO(err) => write!(fmt, "{}", err),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
