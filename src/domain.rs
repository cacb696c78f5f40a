//! The runtime domain's diagnostic sink
//!
//! The resolver does not own a logger. It reports through whatever the
//! hosting runtime hands it, tagged with a category from the runtime's log
//! mask.

use bitflags::bitflags;
use core::fmt;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    /// Categories of the runtime log mask.
    pub struct LogCategory: u32 {
        const ERR = 0x1;
        /// Memory layout, including every debug region handed out.
        const MEM = 0x2;
        const COMM = 0x4;
        const TASK = 0x8;
        const DOM = 0x10;
        const ULOG = 0x20;
        const TRACE = 0x40;
        const DWARF = 0x80;
        const LINK = 0x100;
        const UPCALL = 0x200;
        const RT = 0x400;
        const CACHE = 0x800;
    }
}

const CATEGORY_NAMES: [(LogCategory, &str); 12] = [
    (LogCategory::ERR, "err"),
    (LogCategory::MEM, "mem"),
    (LogCategory::COMM, "comm"),
    (LogCategory::TASK, "task"),
    (LogCategory::DOM, "dom"),
    (LogCategory::ULOG, "ulog"),
    (LogCategory::TRACE, "trace"),
    (LogCategory::DWARF, "dwarf"),
    (LogCategory::LINK, "link"),
    (LogCategory::UPCALL, "upcall"),
    (LogCategory::RT, "rt"),
    (LogCategory::CACHE, "cache"),
];

impl LogCategory {
    /// Lowercase name of the lowest category in the set, `"none"` if empty.
    pub fn name(&self) -> &'static str {
        CATEGORY_NAMES
            .iter()
            .find(|(category, _)| self.contains(*category))
            .map_or("none", |(_, name)| name)
    }
}

/// The diagnostic side of a runtime domain.
///
/// Implementations may be called from many threads at once.
pub trait Domain: Sync {
    /// Emits one diagnostic record.
    fn log(&self, category: LogCategory, args: fmt::Arguments<'_>);
}

impl<D: Domain + ?Sized> Domain for &D {
    #[inline]
    fn log(&self, category: LogCategory, args: fmt::Arguments<'_>) {
        (**self).log(category, args)
    }
}

/// A domain that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDomain;

impl Domain for NullDomain {
    #[inline]
    fn log(&self, _category: LogCategory, _args: fmt::Arguments<'_>) {}
}

/// A domain that forwards records to the `log` crate.
///
/// Records go to target `crate_image::<category>`. Memory layout records
/// are emitted at `trace`, errors at `error`, everything else at `debug`.
/// Without the `log` feature every record is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDomain;

impl Domain for LogDomain {
    #[cfg(feature = "log")]
    fn log(&self, category: LogCategory, args: fmt::Arguments<'_>) {
        let level = if category.contains(LogCategory::ERR) {
            log::Level::Error
        } else if category.intersects(LogCategory::MEM | LogCategory::TRACE | LogCategory::DWARF)
        {
            log::Level::Trace
        } else {
            log::Level::Debug
        };
        match category.name() {
            "mem" => log::log!(target: "crate_image::mem", level, "{}", args),
            "dwarf" => log::log!(target: "crate_image::dwarf", level, "{}", args),
            "err" => log::log!(target: "crate_image::err", level, "{}", args),
            name => log::log!(target: "crate_image", level, "[{}] {}", name, args),
        }
    }

    #[cfg(not(feature = "log"))]
    #[inline]
    fn log(&self, _category: LogCategory, _args: fmt::Arguments<'_>) {}
}

/// Forwards only the records whose category is enabled in `mask`.
#[derive(Debug, Clone, Copy)]
pub struct FilterDomain<D> {
    inner: D,
    mask: LogCategory,
}

impl<D: Domain> FilterDomain<D> {
    pub fn new(inner: D, mask: LogCategory) -> Self {
        FilterDomain { inner, mask }
    }

    #[inline]
    pub fn enabled(&self, category: LogCategory) -> bool {
        self.mask.intersects(category)
    }

    #[inline]
    pub fn mask(&self) -> LogCategory {
        self.mask
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

impl<D: Domain> Domain for FilterDomain<D> {
    #[inline]
    fn log(&self, category: LogCategory, args: fmt::Arguments<'_>) {
        if self.enabled(category) {
            self.inner.log(category, args);
        }
    }
}
