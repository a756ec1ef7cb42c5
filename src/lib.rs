//! A library for exporting custom folder icons as multi-resolution ICO files
//! or as PNG images.
//!
//! An external compositor flattens the base image, overlay and text into one
//! square RGBA image per requested size; this crate validates those images
//! and encodes them.
//!
//! # Example
//!
//! ```
//! let images = vec![
//!     foldericon::RasterImage::solid(16, [79, 70, 229, 255]).unwrap(),
//!     foldericon::RasterImage::solid(32, [79, 70, 229, 255]).unwrap(),
//! ];
//! let ico = foldericon::encode_ico(&images).unwrap();
//! assert_eq!(&ico[..6], b"\x00\x00\x01\x00\x02\x00");
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bmpdepth;
mod error;
mod export;
mod icondir;
mod image;
mod settings;
mod sizes;

pub use crate::error::ExportError;
pub use crate::export::{
    export, export_ico, export_ico_parallel, export_png, Compositor,
    ExportFormat,
};
pub use crate::icondir::{IconDir, IconDirEntry};
pub use crate::image::RasterImage;
pub use crate::settings::{
    parse_hex_color, IconSettings, ImageSettings, OverlaySettings, Placement,
    ShadowSettings, TextSettings,
};
pub use crate::sizes::{IconSizeSet, PNG_EXPORT_SIZE};

//===========================================================================//

/// Encodes the images, in the order given, as the bytes of an ICO file.
/// Each image becomes one 32 bpp entry: BGRA color data followed by a 1-bit
/// transparency mask.  Returns an error, and no bytes, if the list is empty
/// or any image is larger than 256x256.
pub fn encode_ico(images: &[RasterImage]) -> Result<Vec<u8>, ExportError> {
    let icondir = IconDir::encode(images)?;
    match icondir.to_bytes() {
        Ok(bytes) => Ok(bytes),
        Err(error) => Err(ExportError::Encoding(error.to_string())),
    }
}

/// Encodes the image as the bytes of a PNG file.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let mut data = Vec::new();
    image.write_png(&mut data)?;
    Ok(data)
}

//===========================================================================//
