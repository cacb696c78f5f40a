//! Crate header layout and decoding
//!
//! Every compiled crate image starts with a fixed header. It records one
//! absolute value, the address the image was linked to run at, and a set of
//! byte offsets measured from the header itself. All fields are
//! pointer-width and stored in native byte order, in declaration order.

use crate::{Result, error::parse_header_error};
use alloc::format;

const WORD: usize = size_of::<usize>();
const FIELD_COUNT: usize = 10;

/// Size in bytes of the encoded header.
pub const HEADER_SIZE: usize = size_of::<CrateHeader>();

const _: () = assert!(HEADER_SIZE == FIELD_COUNT * WORD);

/// The metadata header embedded at the start of a compiled crate image.
///
/// Apart from `self_addr`, every field is an offset from the header's own
/// in-memory address. The header is compiled data and is never modified at
/// runtime.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CrateHeader {
    /// The address the image was linked to run at.
    pub self_addr: usize,
    /// Start of the full image.
    pub image_base_off: isize,
    /// Task activation glue.
    pub activate_glue_off: isize,
    /// Glue run when a task's main function returns.
    pub main_exit_task_glue_off: isize,
    /// Unwind glue.
    pub unwind_glue_off: isize,
    /// Yield glue.
    pub yield_glue_off: isize,
    /// `.debug_info`
    pub debug_info_off: isize,
    pub debug_info_sz: usize,
    /// `.debug_abbrev`
    pub debug_abbrev_off: isize,
    pub debug_abbrev_sz: usize,
}

impl CrateHeader {
    /// Decodes a header from the first [`HEADER_SIZE`] bytes of `data`.
    ///
    /// The buffer does not need to be aligned. Only the length is checked;
    /// the offsets themselves are trusted.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(parse_header_error(format!(
                "crate header needs {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }
        let mut words = [0usize; FIELD_COUNT];
        for (word, chunk) in words
            .iter_mut()
            .zip(data[..HEADER_SIZE].chunks_exact(WORD))
        {
            let mut buf = [0u8; WORD];
            buf.copy_from_slice(chunk);
            *word = usize::from_ne_bytes(buf);
        }
        Ok(Self::from_words(words))
    }

    /// Encodes the header in its in-image layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(WORD).zip(self.to_words()) {
            chunk.copy_from_slice(&word.to_ne_bytes());
        }
        bytes
    }

    fn from_words(w: [usize; FIELD_COUNT]) -> Self {
        CrateHeader {
            self_addr: w[0],
            image_base_off: w[1] as isize,
            activate_glue_off: w[2] as isize,
            main_exit_task_glue_off: w[3] as isize,
            unwind_glue_off: w[4] as isize,
            yield_glue_off: w[5] as isize,
            debug_info_off: w[6] as isize,
            debug_info_sz: w[7],
            debug_abbrev_off: w[8] as isize,
            debug_abbrev_sz: w[9],
        }
    }

    fn to_words(self) -> [usize; FIELD_COUNT] {
        [
            self.self_addr,
            self.image_base_off as usize,
            self.activate_glue_off as usize,
            self.main_exit_task_glue_off as usize,
            self.unwind_glue_off as usize,
            self.yield_glue_off as usize,
            self.debug_info_off as usize,
            self.debug_info_sz,
            self.debug_abbrev_off as usize,
            self.debug_abbrev_sz,
        ]
    }
}
