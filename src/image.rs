//! Address resolution for a loaded crate image
//!
//! [`CrateImage`] is the one place that turns the offsets recorded in a
//! crate header into absolute addresses for the current mapping. Two kinds
//! of addressing meet here and must not be mixed up:
//!
//! * glue entry points, the image base and debug sections are offsets from
//!   the header's *current* address;
//! * `self_addr` is the frozen link-time address, used only to compute the
//!   [relocation diff](CrateImage::relocation_diff) that corrects absolute
//!   pointers stored elsewhere in the crate.

use crate::{
    Address, CrateHeader,
    domain::Domain,
    glue::{Glue, GlueEntry, GlueTable},
    region::MemoryRegion,
    reloc::RelocationBias,
};
use core::ptr::NonNull;

/// Debug-metadata sections recorded in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DebugSection {
    /// `.debug_info`
    Info,
    /// `.debug_abbrev`
    Abbrev,
}

impl DebugSection {
    pub const fn name(self) -> &'static str {
        match self {
            DebugSection::Info => ".debug_info",
            DebugSection::Abbrev => ".debug_abbrev",
        }
    }

    /// Offset and size of the section.
    #[inline]
    pub(crate) const fn span(self, header: &CrateHeader) -> (isize, usize) {
        match self {
            DebugSection::Info => (header.debug_info_off, header.debug_info_sz),
            DebugSection::Abbrev => (header.debug_abbrev_off, header.debug_abbrev_sz),
        }
    }
}

/// A crate header together with the address it currently lives at.
///
/// Every accessor is plain wrapping arithmetic: nothing is dereferenced and
/// nothing is validated. A corrupt header yields garbage addresses that
/// only fault when the scheduler or unwinder uses them. See
/// [`CheckedCrateImage`](crate::CheckedCrateImage) for the validating
/// variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrateImage {
    header: CrateHeader,
    addr: Address,
}

impl CrateImage {
    /// Creates a resolver for `header`, which the loader placed at `addr`.
    pub fn new(header: CrateHeader, addr: Address) -> Self {
        #[cfg(feature = "log")]
        log::debug!(
            "[Crate] header: {}, self_addr: 0x{:x}, relocation diff: {:#x}",
            addr,
            header.self_addr,
            addr.diff(Address::new(header.self_addr))
        );
        CrateImage { header, addr }
    }

    /// Creates a resolver for the header already resident at `ptr`.
    ///
    /// # Safety
    /// `ptr` must point to a readable header of [`HEADER_SIZE`](crate::HEADER_SIZE)
    /// bytes inside the loaded image.
    pub unsafe fn from_ptr(ptr: NonNull<CrateHeader>) -> Self {
        let header = unsafe { ptr.as_ptr().read_unaligned() };
        Self::new(header, Address::from_ptr(ptr.as_ptr()))
    }

    /// Gets the header the addresses are computed from.
    #[inline]
    pub fn header(&self) -> &CrateHeader {
        &self.header
    }

    /// Gets the header's current address.
    #[inline]
    pub fn addr(&self) -> Address {
        self.addr
    }

    /// Gets the address the image was linked to run at.
    #[inline]
    pub fn self_addr(&self) -> Address {
        Address::new(self.header.self_addr)
    }

    /// Gets the start of the full image.
    #[inline]
    pub fn image_base(&self) -> Address {
        self.addr.offset(self.header.image_base_off)
    }

    /// Gets `addr - self_addr`.
    ///
    /// This is the amount every link-time absolute pointer stored in the
    /// crate must be shifted by to be valid in the current mapping.
    #[inline]
    pub fn relocation_diff(&self) -> isize {
        self.addr.diff(self.self_addr())
    }

    /// Gets the relocation diff as a [`RelocationBias`].
    #[inline]
    pub fn bias(&self) -> RelocationBias {
        RelocationBias::new(self.relocation_diff())
    }

    /// Resolves one glue entry point.
    #[inline]
    pub fn glue(&self, glue: Glue) -> GlueEntry {
        GlueEntry::new(glue, self.addr.offset(glue.offset(&self.header)))
    }

    /// Resolves all glue entry points at once.
    pub fn glue_table(&self) -> GlueTable {
        GlueTable::from_fn(|glue| self.glue(glue))
    }

    #[inline]
    pub fn activate_glue(&self) -> GlueEntry {
        self.glue(Glue::Activate)
    }

    #[inline]
    pub fn main_exit_task_glue(&self) -> GlueEntry {
        self.glue(Glue::MainExitTask)
    }

    #[inline]
    pub fn unwind_glue(&self) -> GlueEntry {
        self.glue(Glue::Unwind)
    }

    #[inline]
    pub fn yield_glue(&self) -> GlueEntry {
        self.glue(Glue::Yield)
    }

    /// Resolves a debug section, reporting its bounds to `domain`.
    pub fn debug_section<D: Domain + ?Sized>(
        &self,
        section: DebugSection,
        domain: &D,
    ) -> MemoryRegion {
        let (off, size) = section.span(&self.header);
        MemoryRegion::new(domain, self.addr.offset(off), size)
    }

    /// Resolves `.debug_info`.
    #[inline]
    pub fn debug_info<D: Domain + ?Sized>(&self, domain: &D) -> MemoryRegion {
        self.debug_section(DebugSection::Info, domain)
    }

    /// Resolves `.debug_abbrev`.
    #[inline]
    pub fn debug_abbrev<D: Domain + ?Sized>(&self, domain: &D) -> MemoryRegion {
        self.debug_section(DebugSection::Abbrev, domain)
    }
}
