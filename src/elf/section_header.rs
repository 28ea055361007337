//! Section header entries and the bounds-checked table parser.

use core::fmt;
use core::result;

use scroll::{Pread, ctx, ctx::SizeWith as _};

use crate::elf::header::{Class, Header};
use crate::error::{self, Error};

/// Section header table entry unused.
pub const SHT_NULL: u32 = 0;
/// Program data.
pub const SHT_PROGBITS: u32 = 1;
/// String table.
pub const SHT_STRTAB: u32 = 3;

macro_rules! elf_section_header {
    ($size:ty) => {
        #[repr(C)]
        #[derive(Copy, Clone, Default, PartialEq, Debug, Pread, Pwrite, SizeWith)]
        pub struct SectionHeader {
            /// Section name (string tbl index)
            pub sh_name: u32,
            /// Section type
            pub sh_type: u32,
            /// Section flags
            pub sh_flags: $size,
            /// Section virtual addr at execution
            pub sh_addr: $size,
            /// Section file offset
            pub sh_offset: $size,
            /// Section size in bytes
            pub sh_size: $size,
            /// Link to another section
            pub sh_link: u32,
            /// Additional section information
            pub sh_info: u32,
            /// Section alignment
            pub sh_addralign: $size,
            /// Entry size if section holds table
            pub sh_entsize: $size,
        }
    };
}

pub mod section_header32 {
    use scroll::{Pread, Pwrite, SizeWith};

    elf_section_header!(u32);

    /// Size of a 32-bit section header on disk
    pub const SIZEOF_SHDR: usize = 40;
}

pub mod section_header64 {
    use scroll::{Pread, Pwrite, SizeWith};

    elf_section_header!(u64);

    /// Size of a 64-bit section header on disk
    pub const SIZEOF_SHDR: usize = 64;
}

/// A class-agnostic section header, fields widened to the 64-bit layout.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct SectionHeader {
    /// Section name (string tbl index)
    pub sh_name: usize,
    /// Section type
    pub sh_type: u32,
    /// Section flags
    pub sh_flags: u64,
    /// Section virtual addr at execution
    pub sh_addr: u64,
    /// Section file offset
    pub sh_offset: u64,
    /// Section size in bytes
    pub sh_size: u64,
    /// Link to another section
    pub sh_link: u32,
    /// Additional section information
    pub sh_info: u32,
    /// Section alignment
    pub sh_addralign: u64,
    /// Entry size if section holds table
    pub sh_entsize: u64,
}

impl SectionHeader {
    /// Parse the full section header table described by `header`. The
    /// table's extent is validated against `bytes` with overflow-checked
    /// arithmetic before any entry is decoded, and `e_shentsize` is honored
    /// as the stride between entries.
    pub fn parse(bytes: &[u8], header: &Header) -> error::Result<Vec<SectionHeader>> {
        let class = header.class()?;
        let shoff = header.e_shoff;
        let shnum = header.e_shnum as usize;
        let entsize = header.e_shentsize as usize;
        if shnum != 0 && entsize < Self::size_with(&class) {
            return Err(Error::TruncatedFile(format!(
                "section header entries claim {} bytes, a {} entry needs {}",
                entsize,
                class,
                Self::size_with(&class)
            )));
        }
        let end = shoff
            .checked_add(shnum as u64 * entsize as u64)
            .ok_or_else(|| {
                Error::TruncatedFile(format!(
                    "section header table at {:#x} with {} entries wraps around",
                    shoff, shnum
                ))
            })?;
        if end > bytes.len() as u64 {
            return Err(Error::TruncatedFile(format!(
                "section header table runs to {:#x}, file is {:#x} bytes",
                end,
                bytes.len()
            )));
        }
        let mut shdrs = Vec::with_capacity(shnum);
        for i in 0..shnum {
            shdrs.push(bytes.pread_with::<SectionHeader>(shoff as usize + i * entsize, class)?);
        }
        Ok(shdrs)
    }
}

impl From<section_header32::SectionHeader> for SectionHeader {
    fn from(shdr: section_header32::SectionHeader) -> Self {
        SectionHeader {
            sh_name: shdr.sh_name as usize,
            sh_type: shdr.sh_type,
            sh_flags: u64::from(shdr.sh_flags),
            sh_addr: u64::from(shdr.sh_addr),
            sh_offset: u64::from(shdr.sh_offset),
            sh_size: u64::from(shdr.sh_size),
            sh_link: shdr.sh_link,
            sh_info: shdr.sh_info,
            sh_addralign: u64::from(shdr.sh_addralign),
            sh_entsize: u64::from(shdr.sh_entsize),
        }
    }
}

impl From<section_header64::SectionHeader> for SectionHeader {
    fn from(shdr: section_header64::SectionHeader) -> Self {
        SectionHeader {
            sh_name: shdr.sh_name as usize,
            sh_type: shdr.sh_type,
            sh_flags: shdr.sh_flags,
            sh_addr: shdr.sh_addr,
            sh_offset: shdr.sh_offset,
            sh_size: shdr.sh_size,
            sh_link: shdr.sh_link,
            sh_info: shdr.sh_info,
            sh_addralign: shdr.sh_addralign,
            sh_entsize: shdr.sh_entsize,
        }
    }
}

impl ctx::SizeWith<Class> for SectionHeader {
    fn size_with(class: &Class) -> usize {
        match class {
            Class::Elf32 => section_header32::SIZEOF_SHDR,
            Class::Elf64 => section_header64::SIZEOF_SHDR,
        }
    }
}

impl<'a> ctx::TryFromCtx<'a, Class> for SectionHeader {
    type Error = scroll::Error;
    fn try_from_ctx(src: &'a [u8], class: Class) -> result::Result<(Self, usize), Self::Error> {
        match class {
            Class::Elf32 => {
                let shdr = src.pread_with::<section_header32::SectionHeader>(0, scroll::NATIVE)?;
                Ok((shdr.into(), section_header32::SIZEOF_SHDR))
            }
            Class::Elf64 => {
                let shdr = src.pread_with::<section_header64::SectionHeader>(0, scroll::NATIVE)?;
                Ok((shdr.into(), section_header64::SIZEOF_SHDR))
            }
        }
    }
}

impl fmt::Debug for SectionHeader {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "sh_name: {} sh_type: {} sh_flags: 0x{:x} sh_addr: 0x{:x} sh_offset: 0x{:x} \
             sh_size: 0x{:x} sh_link: 0x{:x} sh_info: 0x{:x} sh_addralign: 0x{:x} sh_entsize: 0x{:x}",
            self.sh_name,
            self.sh_type,
            self.sh_flags,
            self.sh_addr,
            self.sh_offset,
            self.sh_size,
            self.sh_link,
            self.sh_info,
            self.sh_addralign,
            self.sh_entsize
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_of() {
        assert_eq!(
            ::std::mem::size_of::<section_header32::SectionHeader>(),
            section_header32::SIZEOF_SHDR
        );
        assert_eq!(
            ::std::mem::size_of::<section_header64::SectionHeader>(),
            section_header64::SIZEOF_SHDR
        );
    }

    #[test]
    fn widens_32_bit_fields() {
        let shdr32 = section_header32::SectionHeader {
            sh_name: 1,
            sh_type: SHT_PROGBITS,
            sh_offset: 0x40,
            sh_size: 0x100,
            ..Default::default()
        };
        let shdr = SectionHeader::from(shdr32);
        assert_eq!(shdr.sh_name, 1);
        assert_eq!(shdr.sh_offset, 0x40);
        assert_eq!(shdr.sh_size, 0x100);
    }
}
