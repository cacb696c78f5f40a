use crate::{
    Address, CheckedCrateImage, CrateHeader, CrateImage, MemoryExtent, Result,
};
use alloc::string::{String, ToString};

/// A crate image backed by an in-memory byte slice.
///
/// The header is expected at offset zero, so the slice's address is the
/// header address every offset is measured from.
#[derive(Debug)]
pub struct CrateBinary<'bytes> {
    /// The name assigned to this crate image.
    name: String,
    /// The raw image.
    bytes: &'bytes [u8],
}

impl<'bytes> CrateBinary<'bytes> {
    /// Creates a new memory-based crate image.
    ///
    /// # Arguments
    /// - `name` - An identifier for the image, typically the original file
    ///            path. Used for diagnostics only.
    /// - `bytes` - The loaded image, header first.
    ///
    /// # Examples
    /// ```rust
    /// use crate_image::{CrateHeader, input::CrateBinary};
    ///
    /// let header = CrateHeader { self_addr: 0x1000, activate_glue_off: 0x40, ..Default::default() };
    /// let bytes = header.to_bytes();
    /// let binary = CrateBinary::new("libstd.so", &bytes);
    /// let image = binary.image().unwrap();
    /// assert_eq!(image.activate_glue().addr(), image.addr().offset(0x40));
    /// ```
    pub fn new(name: &str, bytes: &'bytes [u8]) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the short name of the image (the name without its path).
    pub fn shortname(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    #[inline]
    pub fn bytes(&self) -> &'bytes [u8] {
        self.bytes
    }

    /// Gets the address of the header, which is the start of the buffer.
    #[inline]
    pub fn addr(&self) -> Address {
        Address::from_ptr(self.bytes.as_ptr())
    }

    /// Gets the span the image occupies.
    #[inline]
    pub fn extent(&self) -> MemoryExtent {
        MemoryExtent::of_slice(self.bytes)
    }

    /// Decodes the header at the start of the buffer.
    pub fn header(&self) -> Result<CrateHeader> {
        CrateHeader::parse(self.bytes)
    }

    /// Creates the unchecked resolver for this image.
    pub fn image(&self) -> Result<CrateImage> {
        let header = self.header()?;
        #[cfg(feature = "log")]
        log::debug!(
            "[Load] {}: header at {}, length: {}",
            self.shortname(),
            self.addr(),
            self.bytes.len()
        );
        Ok(CrateImage::new(header, self.addr()))
    }

    /// Creates a resolver that rejects anything outside the buffer.
    pub fn checked(&self) -> Result<CheckedCrateImage> {
        CheckedCrateImage::new(self.image()?, self.extent())
    }
}

impl<'bytes> From<&'bytes [u8]> for CrateBinary<'bytes> {
    fn from(bytes: &'bytes [u8]) -> Self {
        CrateBinary::new("<memory>", bytes)
    }
}
