//! Addresses in the current process's address space.

use core::fmt::{self, Debug, Display, LowerHex};

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        pub(crate) const ADDR_HEX_WIDTH: usize = 16;
    } else if #[cfg(target_pointer_width = "32")] {
        pub(crate) const ADDR_HEX_WIDTH: usize = 8;
    } else {
        pub(crate) const ADDR_HEX_WIDTH: usize = 4;
    }
}

/// An absolute address in the running process.
///
/// Offsets recorded in a crate header only become meaningful once they are
/// applied to an `Address`. All arithmetic wraps, the same way the pointer
/// arithmetic it stands in for does.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Address(usize);

impl Address {
    /// The null address.
    pub const NULL: Self = Address(0);

    #[inline]
    pub const fn new(addr: usize) -> Self {
        Address(addr)
    }

    /// Gets the address of a pointer.
    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Address(ptr as usize)
    }

    /// Gets the raw address value.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Applies a signed byte offset.
    #[inline]
    pub const fn offset(self, off: isize) -> Self {
        Address(self.0.wrapping_add_signed(off))
    }

    /// Advances by an unsigned byte count.
    #[inline]
    pub const fn add(self, len: usize) -> Self {
        Address(self.0.wrapping_add(len))
    }

    /// Advances by an unsigned byte count, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, len: usize) -> Option<Self> {
        match self.0.checked_add(len) {
            Some(addr) => Some(Address(addr)),
            None => None,
        }
    }

    /// Signed distance `self - origin`.
    #[inline]
    pub const fn diff(self, origin: Address) -> isize {
        self.0.wrapping_sub(origin.0) as isize
    }

    #[inline]
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }

    #[inline]
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }
}

impl From<usize> for Address {
    #[inline]
    fn from(addr: usize) -> Self {
        Address(addr)
    }
}

impl From<Address> for usize {
    #[inline]
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0width$x}", self.0, width = ADDR_HEX_WIDTH)
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

impl LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        LowerHex::fmt(&self.0, f)
    }
}
