//! Opt-in bounds checking against the mapped image
//!
//! Headers come from the same toolchain as the runtime and are trusted by
//! default. Loaders that cannot make that assumption wrap the resolver in
//! [`CheckedCrateImage`], which rejects any header-derived address or span
//! falling outside the mapped extent instead of handing it on.

use crate::{
    Address, CrateHeader, CrateImage, HEADER_SIZE, Result,
    domain::Domain,
    error::{out_of_bounds_error, relocate_error},
    glue::{Glue, GlueEntry, GlueTable},
    image::DebugSection,
    region::MemoryRegion,
    reloc::RelocationBias,
};
use alloc::format;
use delegate::delegate;

/// The span of memory a crate image is mapped into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryExtent {
    start: Address,
    len: usize,
}

impl MemoryExtent {
    #[inline]
    pub const fn new(start: Address, len: usize) -> Self {
        MemoryExtent { start, len }
    }

    /// Gets the extent of a byte slice.
    #[inline]
    pub fn of_slice(bytes: &[u8]) -> Self {
        MemoryExtent::new(Address::from_ptr(bytes.as_ptr()), bytes.len())
    }

    #[inline]
    pub fn start(&self) -> Address {
        self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end, saturating at the top of the address space.
    ///
    /// Only used for display; membership tests work on the distance from
    /// `start`, so an extent ending at the top of the address space still
    /// contains its last byte.
    #[inline]
    pub fn end(&self) -> Address {
        Address::new(self.start.get().saturating_add(self.len))
    }

    #[inline]
    pub fn contains(&self, addr: Address) -> bool {
        self.start <= addr && addr.get() - self.start.get() < self.len
    }

    /// Whether `[base, base + size)` lies entirely inside the extent.
    pub fn contains_span(&self, base: Address, size: usize) -> bool {
        if base < self.start {
            return false;
        }
        let skip = base.get() - self.start.get();
        skip <= self.len && size <= self.len - skip
    }
}

/// A [`CrateImage`] that validates every address it resolves against the
/// extent the image is mapped into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckedCrateImage {
    image: CrateImage,
    extent: MemoryExtent,
}

impl CheckedCrateImage {
    /// Wraps `image`, whose header must itself lie inside `extent`.
    pub fn new(image: CrateImage, extent: MemoryExtent) -> Result<Self> {
        if !extent.contains_span(image.addr(), HEADER_SIZE) {
            return Err(out_of_bounds_error(format!(
                "crate header at {} is outside image [{},{})",
                image.addr(),
                extent.start(),
                extent.end()
            )));
        }
        Ok(CheckedCrateImage { image, extent })
    }

    /// Gets the unchecked resolver.
    #[inline]
    pub fn unchecked(&self) -> &CrateImage {
        &self.image
    }

    #[inline]
    pub fn extent(&self) -> MemoryExtent {
        self.extent
    }

    delegate! {
        to self.image {
            /// Gets the header the addresses are computed from.
            pub fn header(&self) -> &CrateHeader;
            /// Gets the header's current address.
            pub fn addr(&self) -> Address;
            /// Gets the address the image was linked to run at.
            pub fn self_addr(&self) -> Address;
            /// Gets `addr - self_addr`.
            pub fn relocation_diff(&self) -> isize;
            /// Gets the relocation diff as a [`RelocationBias`].
            pub fn bias(&self) -> RelocationBias;
        }
    }

    /// Gets the start of the full image, which must lie inside the extent.
    pub fn image_base(&self) -> Result<Address> {
        let base = self.image.image_base();
        if !self.extent.contains(base) {
            return Err(out_of_bounds_error(format!(
                "image base {} is outside image [{},{})",
                base,
                self.extent.start(),
                self.extent.end()
            )));
        }
        Ok(base)
    }

    /// Resolves one glue entry point, which must lie inside the extent.
    pub fn glue(&self, glue: Glue) -> Result<GlueEntry> {
        let entry = self.image.glue(glue);
        if !self.extent.contains(entry.addr()) {
            return Err(out_of_bounds_error(format!(
                "{} glue at {} is outside image [{},{})",
                glue.name(),
                entry.addr(),
                self.extent.start(),
                self.extent.end()
            )));
        }
        Ok(entry)
    }

    /// Resolves all glue entry points, failing on the first bad one.
    pub fn glue_table(&self) -> Result<GlueTable> {
        for glue in Glue::ALL {
            self.glue(glue)?;
        }
        Ok(self.image.glue_table())
    }

    #[inline]
    pub fn activate_glue(&self) -> Result<GlueEntry> {
        self.glue(Glue::Activate)
    }

    #[inline]
    pub fn main_exit_task_glue(&self) -> Result<GlueEntry> {
        self.glue(Glue::MainExitTask)
    }

    #[inline]
    pub fn unwind_glue(&self) -> Result<GlueEntry> {
        self.glue(Glue::Unwind)
    }

    #[inline]
    pub fn yield_glue(&self) -> Result<GlueEntry> {
        self.glue(Glue::Yield)
    }

    /// Resolves a debug section, which must lie entirely inside the extent.
    ///
    /// A rejected section is not reported to `domain`.
    pub fn debug_section<D: Domain + ?Sized>(
        &self,
        section: DebugSection,
        domain: &D,
    ) -> Result<MemoryRegion> {
        let (off, size) = section.span(self.image.header());
        let base = self.image.addr().offset(off);
        if !self.extent.contains_span(base, size) {
            return Err(out_of_bounds_error(format!(
                "{} at {} with size {:#x} is outside image [{},{})",
                section.name(),
                base,
                size,
                self.extent.start(),
                self.extent.end()
            )));
        }
        Ok(MemoryRegion::new(domain, base, size))
    }

    #[inline]
    pub fn debug_info<D: Domain + ?Sized>(&self, domain: &D) -> Result<MemoryRegion> {
        self.debug_section(DebugSection::Info, domain)
    }

    #[inline]
    pub fn debug_abbrev<D: Domain + ?Sized>(&self, domain: &D) -> Result<MemoryRegion> {
        self.debug_section(DebugSection::Abbrev, domain)
    }

    /// Corrects a table of link-time pointers, requiring every corrected
    /// non-null entry to land inside the extent.
    ///
    /// On error the table is left untouched.
    pub fn relocate_table(&self, table: &mut [usize]) -> Result<usize> {
        let bias = self.image.bias();
        let stray = |entry: usize| {
            entry != 0 && !self.extent.contains(bias.apply(Address::new(entry)))
        };
        if let Some((idx, entry)) = table.iter().enumerate().find(|(_, entry)| stray(**entry)) {
            return Err(relocate_error(format!(
                "entry {}: 0x{:x} relocates to {}, outside image [{},{})",
                idx,
                entry,
                bias.apply(Address::new(*entry)),
                self.extent.start(),
                self.extent.end()
            )));
        }
        Ok(bias.relocate_table(table))
    }
}
