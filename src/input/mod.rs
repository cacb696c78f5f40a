//! Crate images held in memory
//!
//! Mapping the image is the loader's business. Once the bytes are resident
//! and the header sits at the start of the buffer, [`CrateBinary`] hands out
//! resolvers whose header address is the buffer itself.

pub use backend::CrateBinary;

mod backend;
