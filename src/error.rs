use alloc::borrow::Cow;
use core::fmt::{Debug, Display};

/// Error types used throughout the `crate_image` library.
///
/// Address resolution itself never fails. These errors come from the
/// surfaces around it: decoding a header out of a byte buffer and the
/// opt-in checked mode.
#[derive(Debug)]
pub enum Error {
    /// The crate header could not be decoded.
    ///
    /// This error typically indicates that the buffer handed to the loader
    /// is shorter than the fixed header layout.
    ParseHeader {
        /// A descriptive message about the header decoding error.
        msg: Cow<'static, str>,
    },

    /// An address or span resolved from the header falls outside the mapped image.
    ///
    /// Only produced by [`CheckedCrateImage`](crate::CheckedCrateImage):
    /// * A glue entry point outside the image extent
    /// * A debug section starting before or ending past the image extent
    /// * A debug section whose size overflows the address space
    OutOfBounds {
        /// A descriptive message about the rejected address.
        msg: Cow<'static, str>,
    },

    /// A stored link-time pointer could not be corrected.
    ///
    /// Produced when a corrected table entry would point outside the image.
    Relocation {
        /// A descriptive message about the relocation error.
        msg: Cow<'static, str>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ParseHeader { msg } => write!(f, "Crate header parsing error: {msg}"),
            Error::OutOfBounds { msg } => write!(f, "Out of bounds: {msg}"),
            Error::Relocation { msg } => write!(f, "Relocation error: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

/// Creates a header parsing error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn parse_header_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::ParseHeader { msg: msg.into() }
}

/// Creates an out-of-bounds error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn out_of_bounds_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::OutOfBounds { msg: msg.into() }
}

/// Creates a relocation error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn relocate_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Relocation { msg: msg.into() }
}
