use crate::{
    Address,
    domain::{Domain, LogCategory},
};

/// A bounded span `[base, limit)` of a loaded crate image.
///
/// Regions are plain values handed out per query. Constructing one reports
/// its bounds to the domain; nothing else about it touches the domain, and
/// nothing checks it against the image actually mapped. Callers reading
/// through a region built from an untrusted header must treat the bounds
/// as untrusted too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryRegion {
    base: Address,
    limit: Address,
}

impl MemoryRegion {
    /// Creates the region `[base, base + size)` and logs its bounds under
    /// [`LogCategory::MEM`].
    ///
    /// The limit is computed with wrapping arithmetic, so `limit >= base`
    /// holds whenever `base + size` fits in the address space.
    pub fn new<D: Domain + ?Sized>(domain: &D, base: Address, size: usize) -> Self {
        let limit = base.add(size);
        domain.log(
            LogCategory::MEM,
            format_args!("new mem_area [{},{}]", base, limit),
        );
        MemoryRegion { base, limit }
    }

    #[inline]
    pub fn base(&self) -> Address {
        self.base
    }

    /// Exclusive end address.
    #[inline]
    pub fn limit(&self) -> Address {
        self.limit
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.limit.get().wrapping_sub(self.base.get())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base == self.limit
    }

    #[inline]
    pub fn contains(&self, addr: Address) -> bool {
        self.base <= addr && addr < self.limit
    }

    /// Views the region as bytes.
    ///
    /// # Safety
    /// The whole span must be mapped, readable and left unmodified for `'a`.
    #[inline]
    pub unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        if self.is_empty() {
            return &[];
        }
        unsafe { core::slice::from_raw_parts(self.base.as_ptr::<u8>(), self.len()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NullDomain;

    #[test]
    fn limit_is_exclusive() {
        let region = MemoryRegion::new(&NullDomain, Address::new(0x1200), 0x80);
        assert_eq!(region.limit(), Address::new(0x1280));
        assert_eq!(region.len(), 0x80);
        assert!(region.contains(Address::new(0x1200)));
        assert!(region.contains(Address::new(0x127f)));
        assert!(!region.contains(Address::new(0x1280)));
    }

    #[test]
    fn zero_sized_region_is_empty() {
        let region = MemoryRegion::new(&NullDomain, Address::new(0x1200), 0);
        assert!(region.is_empty());
        assert_eq!(region.base(), region.limit());
        assert!(!region.contains(region.base()));
        assert!(unsafe { region.as_bytes() }.is_empty());
    }

    #[test]
    fn as_bytes_views_backing_memory() {
        let data = [1u8, 2, 3, 4];
        let region = MemoryRegion::new(&NullDomain, Address::from_ptr(data.as_ptr()), data.len());
        assert_eq!(unsafe { region.as_bytes() }, &data);
    }
}
