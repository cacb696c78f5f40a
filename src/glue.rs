//! Runtime glue entry points
//!
//! Glue is the small set of runtime-generated functions the scheduler calls
//! generically for every task: activation, the exit path taken when a task's
//! main function returns, unwinding and yielding.

use crate::{Address, CrateHeader};
use core::{ffi::c_void, ops::Index};

/// Signature of the activation glue: switches into `task` and returns
/// when the task yields back to the scheduler.
pub type ActivateGlue = unsafe extern "C" fn(task: *mut c_void) -> usize;

/// The glue entry points recorded in a crate header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Glue {
    Activate,
    MainExitTask,
    Unwind,
    Yield,
}

impl Glue {
    pub const COUNT: usize = 4;

    /// Every glue kind, in table order.
    pub const ALL: [Glue; Glue::COUNT] =
        [Glue::Activate, Glue::MainExitTask, Glue::Unwind, Glue::Yield];

    pub const fn name(self) -> &'static str {
        match self {
            Glue::Activate => "activate",
            Glue::MainExitTask => "main_exit_task",
            Glue::Unwind => "unwind",
            Glue::Yield => "yield",
        }
    }

    #[inline]
    pub(crate) const fn offset(self, header: &CrateHeader) -> isize {
        match self {
            Glue::Activate => header.activate_glue_off,
            Glue::MainExitTask => header.main_exit_task_glue_off,
            Glue::Unwind => header.unwind_glue_off,
            Glue::Yield => header.yield_glue_off,
        }
    }
}

/// A resolved glue entry point.
///
/// Nothing checks that the address is mapped or executable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlueEntry {
    glue: Glue,
    addr: Address,
}

impl GlueEntry {
    #[inline]
    pub(crate) const fn new(glue: Glue, addr: Address) -> Self {
        GlueEntry { glue, addr }
    }

    #[inline]
    pub fn glue(&self) -> Glue {
        self.glue
    }

    #[inline]
    pub fn addr(&self) -> Address {
        self.addr
    }

    #[inline]
    pub fn as_ptr(&self) -> *const () {
        self.addr.as_ptr()
    }

    /// Reinterprets the entry point as a function pointer of type `F`.
    ///
    /// # Safety
    /// `F` must be a pointer-sized function pointer type matching the glue's
    /// calling convention, and the address must be non-null code of that
    /// signature mapped in the current process. A type that is not
    /// pointer-sized is rejected at compile time.
    #[inline]
    pub unsafe fn cast<F: Copy>(self) -> F {
        const { assert!(size_of::<F>() == size_of::<usize>()) };
        unsafe { core::mem::transmute_copy::<usize, F>(&self.addr.get()) }
    }

    /// Reinterprets the activation glue with its runtime signature.
    ///
    /// # Safety
    /// Same as [`GlueEntry::cast`].
    #[inline]
    pub unsafe fn as_activate(self) -> ActivateGlue {
        debug_assert_eq!(self.glue, Glue::Activate);
        unsafe { self.cast::<ActivateGlue>() }
    }
}

/// All four glue entry points of one crate, indexed by [`Glue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlueTable {
    entries: [GlueEntry; Glue::COUNT],
}

impl GlueTable {
    pub(crate) fn from_fn(f: impl FnMut(Glue) -> GlueEntry) -> Self {
        GlueTable {
            entries: Glue::ALL.map(f),
        }
    }

    #[inline]
    pub fn get(&self, glue: Glue) -> GlueEntry {
        self.entries[glue as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlueEntry> {
        self.entries.iter()
    }
}

impl Index<Glue> for GlueTable {
    type Output = GlueEntry;

    #[inline]
    fn index(&self, glue: Glue) -> &GlueEntry {
        &self.entries[glue as usize]
    }
}
