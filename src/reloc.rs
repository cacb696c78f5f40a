//! Correction of link-time absolute pointers
//!
//! Most of a crate header is position independent, but the compiler also
//! stores absolute pointers elsewhere in the image (symbol and type tables)
//! that assume the image runs at its link address. Those are corrected by
//! adding the crate's relocation diff. Forgetting to do so silently sends
//! control transfers into the wrong mapping.

use crate::Address;

/// The signed distance between where a crate was linked to run and where
/// it actually runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RelocationBias(isize);

impl RelocationBias {
    #[inline]
    pub const fn new(diff: isize) -> Self {
        RelocationBias(diff)
    }

    /// Bias needed for an image linked at `linked` and loaded at `loaded`.
    #[inline]
    pub const fn between(linked: Address, loaded: Address) -> Self {
        RelocationBias(loaded.diff(linked))
    }

    #[inline]
    pub const fn diff(self) -> isize {
        self.0
    }

    /// Whether the image runs at its link address.
    #[inline]
    pub const fn is_identity(self) -> bool {
        self.0 == 0
    }

    /// Turns a link-time pointer into the pointer valid for this mapping.
    #[inline]
    pub const fn apply(self, linked: Address) -> Address {
        linked.offset(self.0)
    }

    /// Turns a runtime pointer back into its link-time value.
    #[inline]
    pub const fn revert(self, loaded: Address) -> Address {
        loaded.offset(self.0.wrapping_neg())
    }

    /// Corrects every stored pointer in `table` in place and returns how
    /// many entries were rewritten.
    ///
    /// Zero entries are null pointers and stay null.
    pub fn relocate_table(self, table: &mut [usize]) -> usize {
        if self.is_identity() {
            return 0;
        }
        let mut count = 0;
        for entry in table.iter_mut().filter(|entry| **entry != 0) {
            *entry = self.apply(Address::new(*entry)).get();
            count += 1;
        }
        #[cfg(feature = "log")]
        log::trace!(
            "[Reloc] table: 0x{:x}, entries: {}, corrected: {}, bias: {:#x}",
            table.as_ptr() as usize,
            table.len(),
            count,
            self.0
        );
        count
    }
}
