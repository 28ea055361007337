//! The ELF header and the identification region that picks its layout.

use core::fmt;
use core::result;

use log::warn;
use scroll::{Pread, ctx};

use crate::error::{self, Error};

/// The ELF magic number.
pub const ELFMAG: &[u8; 4] = b"\x7FELF";
/// Size of the magic number in bytes.
pub const SELFMAG: usize = 4;

/// File class byte index.
pub const EI_CLASS: usize = 4;
/// Invalid class.
pub const ELFCLASSNONE: u8 = 0;
/// 32-bit objects.
pub const ELFCLASS32: u8 = 1;
/// 64-bit objects.
pub const ELFCLASS64: u8 = 2;
/// Number of bytes in an identifier.
pub const SIZEOF_IDENT: usize = 16;

/// Convert an ELF class byte to the associated string.
#[inline]
pub fn class_to_str(class: u8) -> &'static str {
    match class {
        ELFCLASSNONE => "NONE",
        ELFCLASS32 => "ELF32",
        ELFCLASS64 => "ELF64",
        _ => "UNKNOWN_CLASS",
    }
}

/// Width of the file's on-disk structures, from `e_ident[EI_CLASS]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    /// Accepts exactly the two recognized class bytes; everything else,
    /// including the `ELFCLASSNONE` sentinel, is unsupported.
    pub fn from_byte(class: u8) -> error::Result<Class> {
        match class {
            ELFCLASS32 => Ok(Class::Elf32),
            ELFCLASS64 => Ok(Class::Elf64),
            class => Err(Error::UnsupportedElfClass(class)),
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Class::Elf32 => fmt.write_str(class_to_str(ELFCLASS32)),
            Class::Elf64 => fmt.write_str(class_to_str(ELFCLASS64)),
        }
    }
}

/// Read the class out of the identification region without touching any
/// class-dependent field. This is the only read `find_section` performs
/// before the class byte has been accepted.
pub fn peek_class(bytes: &[u8]) -> error::Result<Class> {
    if bytes.len() < SIZEOF_IDENT {
        return Err(Error::TruncatedFile(format!(
            "ELF identification needs {} bytes, got {}",
            SIZEOF_IDENT,
            bytes.len()
        )));
    }
    if bytes[..SELFMAG] != ELFMAG[..] {
        warn!("bad ELF magic {:x?}, looking for sections anyway", &bytes[..SELFMAG]);
    }
    Class::from_byte(bytes[EI_CLASS])
}

macro_rules! elf_header {
    ($size:ty) => {
        #[repr(C)]
        #[derive(Clone, Copy, Default, PartialEq, Debug, Pread, Pwrite, SizeWith)]
        pub struct Header {
            /// Magic number and other info
            pub e_ident: [u8; 16],
            /// Object file type
            pub e_type: u16,
            /// Architecture
            pub e_machine: u16,
            /// Object file version
            pub e_version: u32,
            /// Entry point virtual address
            pub e_entry: $size,
            /// Program header table file offset
            pub e_phoff: $size,
            /// Section header table file offset
            pub e_shoff: $size,
            /// Processor-specific flags
            pub e_flags: u32,
            /// ELF header size in bytes
            pub e_ehsize: u16,
            /// Program header table entry size
            pub e_phentsize: u16,
            /// Program header table entry count
            pub e_phnum: u16,
            /// Section header table entry size
            pub e_shentsize: u16,
            /// Section header table entry count
            pub e_shnum: u16,
            /// Section header string table index
            pub e_shstrndx: u16,
        }
    };
}

pub mod header32 {
    use scroll::{Pread, Pwrite, SizeWith};

    elf_header!(u32);

    /// Size of a 32-bit ELF header on disk
    pub const SIZEOF_EHDR: usize = 52;
}

pub mod header64 {
    use scroll::{Pread, Pwrite, SizeWith};

    elf_header!(u64);

    /// Size of a 64-bit ELF header on disk
    pub const SIZEOF_EHDR: usize = 64;
}

/// A class-agnostic ELF header, fields widened to the 64-bit layout.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Header {
    pub e_ident: [u8; SIZEOF_IDENT],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u64,
    pub e_phoff: u64,
    pub e_shoff: u64,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

impl Header {
    /// The class recorded in this header's identification bytes.
    pub fn class(&self) -> error::Result<Class> {
        Class::from_byte(self.e_ident[EI_CLASS])
    }

    /// Parse the class-appropriate header from the start of `bytes`. The
    /// class byte is validated before any sized field is read.
    pub fn parse(bytes: &[u8]) -> error::Result<Header> {
        let class = peek_class(bytes)?;
        Ok(bytes.pread_with::<Header>(0, class)?)
    }
}

impl From<header32::Header> for Header {
    fn from(header: header32::Header) -> Self {
        Header {
            e_ident: header.e_ident,
            e_type: header.e_type,
            e_machine: header.e_machine,
            e_version: header.e_version,
            e_entry: u64::from(header.e_entry),
            e_phoff: u64::from(header.e_phoff),
            e_shoff: u64::from(header.e_shoff),
            e_flags: header.e_flags,
            e_ehsize: header.e_ehsize,
            e_phentsize: header.e_phentsize,
            e_phnum: header.e_phnum,
            e_shentsize: header.e_shentsize,
            e_shnum: header.e_shnum,
            e_shstrndx: header.e_shstrndx,
        }
    }
}

impl From<header64::Header> for Header {
    fn from(header: header64::Header) -> Self {
        Header {
            e_ident: header.e_ident,
            e_type: header.e_type,
            e_machine: header.e_machine,
            e_version: header.e_version,
            e_entry: header.e_entry,
            e_phoff: header.e_phoff,
            e_shoff: header.e_shoff,
            e_flags: header.e_flags,
            e_ehsize: header.e_ehsize,
            e_phentsize: header.e_phentsize,
            e_phnum: header.e_phnum,
            e_shentsize: header.e_shentsize,
            e_shnum: header.e_shnum,
            e_shstrndx: header.e_shstrndx,
        }
    }
}

impl<'a> ctx::TryFromCtx<'a, Class> for Header {
    type Error = scroll::Error;
    fn try_from_ctx(src: &'a [u8], class: Class) -> result::Result<(Self, usize), Self::Error> {
        match class {
            Class::Elf32 => {
                let header = src.pread_with::<header32::Header>(0, scroll::NATIVE)?;
                Ok((header.into(), header32::SIZEOF_EHDR))
            }
            Class::Elf64 => {
                let header = src.pread_with::<header64::Header>(0, scroll::NATIVE)?;
                Ok((header.into(), header64::SIZEOF_EHDR))
            }
        }
    }
}

impl fmt::Debug for Header {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "e_ident: {:x?} e_type: 0x{:x} e_machine: 0x{:x} e_version: {} e_entry: 0x{:x} \
             e_phoff: 0x{:x} e_shoff: 0x{:x} e_flags: 0x{:x} e_ehsize: {} e_phentsize: {} \
             e_phnum: {} e_shentsize: {} e_shnum: {} e_shstrndx: {}",
            self.e_ident,
            self.e_type,
            self.e_machine,
            self.e_version,
            self.e_entry,
            self.e_phoff,
            self.e_shoff,
            self.e_flags,
            self.e_ehsize,
            self.e_phentsize,
            self.e_phnum,
            self.e_shentsize,
            self.e_shnum,
            self.e_shstrndx
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_of() {
        assert_eq!(::std::mem::size_of::<header32::Header>(), header32::SIZEOF_EHDR);
        assert_eq!(::std::mem::size_of::<header64::Header>(), header64::SIZEOF_EHDR);
    }

    #[test]
    fn peeks_the_two_real_classes() {
        let mut ident = [0u8; SIZEOF_IDENT];
        ident[..SELFMAG].copy_from_slice(&ELFMAG[..]);
        ident[EI_CLASS] = ELFCLASS32;
        assert_eq!(peek_class(&ident).unwrap(), Class::Elf32);
        ident[EI_CLASS] = ELFCLASS64;
        assert_eq!(peek_class(&ident).unwrap(), Class::Elf64);
    }

    #[test]
    fn rejects_other_classes() {
        let mut ident = [0u8; SIZEOF_IDENT];
        ident[..SELFMAG].copy_from_slice(&ELFMAG[..]);
        for class in [ELFCLASSNONE, 3, 0xff] {
            ident[EI_CLASS] = class;
            assert!(matches!(
                peek_class(&ident),
                Err(Error::UnsupportedElfClass(c)) if c == class
            ));
        }
    }

    #[test]
    fn short_ident_is_truncated() {
        assert!(matches!(peek_class(&[]), Err(Error::TruncatedFile(_))));
        assert!(matches!(
            peek_class(&[0x7f, b'E', b'L', b'F', ELFCLASS64]),
            Err(Error::TruncatedFile(_))
        ));
    }
}
