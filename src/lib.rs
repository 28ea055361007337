//! Carve a named section out of an ELF object file.
//!
//! Given the raw bytes of a 32-bit or 64-bit ELF image and a section name,
//! [`find_section`] scans the section header table and returns the file
//! offset and size of the entry whose name matches. Every offset and length
//! taken from the file is validated against the buffer before it is read,
//! so corrupt or hostile images produce a typed [`Error`] instead of an
//! out-of-bounds read.
//!
//! ```no_run
//! use scalpel::find_section;
//!
//! let bytes = std::fs::read("/bin/ls")?;
//! let range = find_section(&bytes, ".comment")?;
//! println!("{:#x} bytes at {:#x}", range.size, range.offset);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod elf;
pub mod error;
pub mod strtab;

pub use crate::elf::{SectionRange, find_section};
pub use crate::error::{Error, Result};
