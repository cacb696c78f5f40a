#![allow(dead_code)]

use crate_image::{
    CrateHeader, HEADER_SIZE,
    domain::{Domain, LogCategory},
};
use std::{fmt, sync::Mutex};

/// A domain that remembers every record it receives.
#[derive(Default)]
pub struct RecordingDomain {
    records: Mutex<Vec<(LogCategory, String)>>,
}

impl RecordingDomain {
    pub fn records(&self) -> Vec<(LogCategory, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl Domain for RecordingDomain {
    fn log(&self, category: LogCategory, args: fmt::Arguments<'_>) {
        self.records.lock().unwrap().push((category, args.to_string()));
    }
}

/// A header with every field distinct.
pub fn sample_header() -> CrateHeader {
    CrateHeader {
        self_addr: 0x1000,
        image_base_off: 0,
        activate_glue_off: 0x40,
        main_exit_task_glue_off: 0x60,
        unwind_glue_off: 0x80,
        yield_glue_off: 0xa0,
        debug_info_off: 0x200,
        debug_info_sz: 0x80,
        debug_abbrev_off: 0x280,
        debug_abbrev_sz: 0x10,
    }
}

/// Builds a `len`-byte image with `header` at the start and every other
/// byte set to the low bits of its offset.
pub fn build_image(header: &CrateHeader, len: usize) -> Vec<u8> {
    assert!(len >= HEADER_SIZE);
    let mut bytes: Vec<u8> = (0..len).map(|off| off as u8).collect();
    bytes[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
    bytes
}
