//! A byte-offset based string table.
//! ELF binaries keep section names in one, addressed by the `sh_name` field.

use core::fmt;
use core::str;

use crate::error::{Error, Result};

/// A string table format which is indexed by byte offsets (and not
/// member index). Constructed using [`parse`](Strtab::parse)
/// with your choice of delimiter.
pub struct Strtab<'a> {
    bytes: &'a [u8],
    delim: u8,
}

impl<'a> Strtab<'a> {
    /// Construct a table over the `len` bytes of `bytes` starting at `offset`.
    /// The region is validated against `bytes` up front; every later
    /// [`get_at`](Strtab::get_at) stays inside it.
    pub fn parse(bytes: &'a [u8], offset: u64, len: u64, delim: u8) -> Result<Strtab<'a>> {
        let end = offset.checked_add(len).ok_or_else(|| {
            Error::TruncatedFile(format!(
                "string table at {:#x} with size {:#x} wraps around",
                offset, len
            ))
        })?;
        if end > bytes.len() as u64 {
            return Err(Error::TruncatedFile(format!(
                "string table runs to {:#x}, file is {:#x} bytes",
                end,
                bytes.len()
            )));
        }
        Ok(Strtab {
            bytes: &bytes[offset as usize..end as usize],
            delim,
        })
    }

    /// The number of bytes in the table's region.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The run of bytes starting at `offset`, up to but not including the
    /// delimiter. An offset at or past the region's end, or a run that hits
    /// the region's end without a delimiter, is an error, never a scan past
    /// the region.
    pub fn get_at(&self, offset: usize) -> Result<&'a [u8]> {
        let bytes = self.bytes.get(offset..).ok_or_else(|| {
            Error::TruncatedFile(format!(
                "string offset {:#x} is past the end of a {:#x}-byte string table",
                offset,
                self.bytes.len()
            ))
        })?;
        match bytes.iter().position(|&b| b == self.delim) {
            Some(end) => Ok(&bytes[..end]),
            None => Err(Error::TruncatedFile(format!(
                "unterminated string at offset {:#x} in string table",
                offset
            ))),
        }
    }
}

impl<'a> fmt::Debug for Strtab<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "delim: {:?} {:?}", self.delim, str::from_utf8(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gets_runs_between_delimiters() {
        let bytes = b"\0printf\0memmove\0busta\0";
        let strtab = Strtab::parse(bytes, 0, bytes.len() as u64, 0x0).unwrap();
        assert_eq!(strtab.get_at(0).unwrap(), b"");
        assert_eq!(strtab.get_at(1).unwrap(), b"printf");
        assert_eq!(strtab.get_at(8).unwrap(), b"memmove");
        assert_eq!(strtab.get_at(16).unwrap(), b"busta");
        // mid-run offsets resolve to the suffix
        assert_eq!(strtab.get_at(3).unwrap(), b"intf");
    }

    #[test]
    fn unterminated_run_is_an_error() {
        let bytes = b"\0printf\0busta";
        let strtab = Strtab::parse(bytes, 0, bytes.len() as u64, 0x0).unwrap();
        assert_eq!(strtab.get_at(1).unwrap(), b"printf");
        assert!(matches!(strtab.get_at(8), Err(Error::TruncatedFile(_))));
    }

    #[test]
    fn out_of_range_offset_is_an_error() {
        let bytes = b"\0a\0";
        let strtab = Strtab::parse(bytes, 0, bytes.len() as u64, 0x0).unwrap();
        assert!(matches!(strtab.get_at(3), Err(Error::TruncatedFile(_))));
        assert!(matches!(strtab.get_at(1000), Err(Error::TruncatedFile(_))));
    }

    #[test]
    fn empty_table_has_no_strings() {
        let strtab = Strtab::parse(&[], 0, 0, 0x0).unwrap();
        assert!(strtab.is_empty());
        assert!(matches!(strtab.get_at(0), Err(Error::TruncatedFile(_))));
    }

    #[test]
    fn region_must_fit_the_backing_bytes() {
        let bytes = b"\0name\0";
        assert!(matches!(
            Strtab::parse(bytes, 2, bytes.len() as u64, 0x0),
            Err(Error::TruncatedFile(_))
        ));
        assert!(matches!(
            Strtab::parse(bytes, u64::MAX, 2, 0x0),
            Err(Error::TruncatedFile(_))
        ));
    }

    #[test]
    fn newline_delimited() {
        let bytes = b"\nprintf\nmemmove\n";
        let strtab = Strtab::parse(bytes, 0, bytes.len() as u64, b'\n').unwrap();
        assert_eq!(strtab.get_at(1).unwrap(), b"printf");
        assert_eq!(strtab.get_at(8).unwrap(), b"memmove");
    }
}
