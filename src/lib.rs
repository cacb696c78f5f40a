//! # crate_image
//! Address resolution and relocation correction for loaded crate images.
//!
//! ## Usage
//! A compiled crate image starts with a [`CrateHeader`] recording the
//! runtime glue entry points and debug-metadata sections as offsets from the
//! header itself, plus the address the image was linked to run at. Once the
//! loader has placed the image in memory, a [`CrateImage`] built from the
//! header and its current address answers every "where is it now" question
//! the scheduler and unwinder ask.
//!
//! ## Example
//! ```rust
//! use crate_image::{Address, CrateHeader, CrateImage, domain::NullDomain};
//!
//! let header = CrateHeader {
//!     self_addr: 0x1000,
//!     activate_glue_off: 0x40,
//!     debug_info_off: 0x200,
//!     debug_info_sz: 0x80,
//!     ..Default::default()
//! };
//! let image = CrateImage::new(header, Address::new(0x9000));
//! assert_eq!(image.activate_glue().addr(), Address::new(0x9040));
//! assert_eq!(image.relocation_diff(), 0x8000);
//!
//! let info = image.debug_info(&NullDomain);
//! assert_eq!(info.base(), Address::new(0x9200));
//! assert_eq!(info.limit(), Address::new(0x9280));
//! ```
#![no_std]
extern crate alloc;

mod addr;
mod checked;
pub mod domain;
mod error;
mod glue;
mod header;
mod image;
pub mod input;
mod region;
mod reloc;

pub use addr::Address;
pub use checked::{CheckedCrateImage, MemoryExtent};
pub use error::Error;
pub use glue::{ActivateGlue, Glue, GlueEntry, GlueTable};
pub use header::{CrateHeader, HEADER_SIZE};
pub use image::{CrateImage, DebugSection};
pub use region::MemoryRegion;
pub use reloc::RelocationBias;

pub type Result<T> = core::result::Result<T, Error>;
