use crate::error::ExportError;
use crate::image::RasterImage;
use crate::settings::IconSettings;
use crate::sizes::{IconSizeSet, PNG_EXPORT_SIZE};
use log::{debug, info, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::thread;

//===========================================================================//

/// Renders the base image, overlay and text described by an `IconSettings`
/// into a single flattened image.
///
/// Implementations must be deterministic: the same settings and size always
/// produce the same pixels.  Loading the base or overlay image is the
/// implementation's business; a failed load should be reported as an error
/// rather than papered over with a placeholder image.
pub trait Compositor {
    /// Returns a `size`x`size` RGBA image.
    fn composite(
        &self,
        settings: &IconSettings,
        size: u32,
    ) -> Result<RasterImage, ExportError>;
}

impl<F> Compositor for F
where
    F: Fn(&IconSettings, u32) -> Result<RasterImage, ExportError>,
{
    fn composite(
        &self,
        settings: &IconSettings,
        size: u32,
    ) -> Result<RasterImage, ExportError> {
        self(settings, size)
    }
}

//===========================================================================//

/// The file formats an icon can be exported as.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ExportFormat {
    /// A Windows icon file holding one image per requested size.
    Ico,
    /// A single 512x512 PNG image.
    Png,
}

impl ExportFormat {
    /// Returns the file extension for this format, without a leading dot.
    pub fn extension(&self) -> &'static str {
        match *self {
            ExportFormat::Ico => "ico",
            ExportFormat::Png => "png",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match *self {
            ExportFormat::Ico => "image/x-icon",
            ExportFormat::Png => "image/png",
        }
    }
}

//===========================================================================//

/// Exports an icon in the given format.  `sizes` is only used for ICO
/// exports.
pub fn export<C: Compositor>(
    compositor: &C,
    settings: &IconSettings,
    format: ExportFormat,
    sizes: &IconSizeSet,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Ico => export_ico(compositor, settings, sizes),
        ExportFormat::Png => export_png(compositor, settings),
    }
}

/// Composites the icon once per size, in order, and encodes the results as
/// an ICO file.  If any size fails, the whole export fails.
pub fn export_ico<C: Compositor>(
    compositor: &C,
    settings: &IconSettings,
    sizes: &IconSizeSet,
) -> Result<Vec<u8>, ExportError> {
    let mut images = Vec::<RasterImage>::with_capacity(sizes.len());
    for size in sizes.iter() {
        images.push(composite_checked(compositor, settings, size)?);
    }
    encode_composited(&images)
}

/// Like `export_ico`, but composites every size on its own thread.  The
/// output is identical to `export_ico`'s.
pub fn export_ico_parallel<C: Compositor + Sync>(
    compositor: &C,
    settings: &IconSettings,
    sizes: &IconSizeSet,
) -> Result<Vec<u8>, ExportError> {
    let results: Vec<Result<RasterImage, ExportError>> =
        thread::scope(|scope| {
            let handles: Vec<_> = sizes
                .iter()
                .map(|size| {
                    scope.spawn(move || {
                        composite_checked(compositor, settings, size)
                    })
                })
                .collect();
            // Joining in spawn order keeps the requested size order.
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });
    let images = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    encode_composited(&images)
}

/// Composites the icon at 512x512 and encodes it as a PNG file.
pub fn export_png<C: Compositor>(
    compositor: &C,
    settings: &IconSettings,
) -> Result<Vec<u8>, ExportError> {
    let image = composite_checked(compositor, settings, PNG_EXPORT_SIZE)?;
    let data = crate::encode_png(&image)?;
    info!("Exported {0}x{0} PNG ({1} bytes)", PNG_EXPORT_SIZE, data.len());
    Ok(data)
}

//===========================================================================//

fn composite_checked<C: Compositor + ?Sized>(
    compositor: &C,
    settings: &IconSettings,
    size: u32,
) -> Result<RasterImage, ExportError> {
    debug!("Compositing {0}x{0} image", size);
    let image = match compositor.composite(settings, size) {
        Ok(image) => image,
        Err(error) => {
            warn!("Compositor failed at size {}: {}", size, error);
            invalid_image!(
                "No image available for size {} ({})",
                size,
                error
            );
        }
    };
    if image.width() != size || image.height() != size {
        warn!(
            "Compositor returned {}x{} image for size {}",
            image.width(),
            image.height(),
            size
        );
        invalid_image!(
            "No image available for size {} (compositor returned {}x{})",
            size,
            image.width(),
            image.height()
        );
    }
    Ok(image)
}

fn encode_composited(images: &[RasterImage]) -> Result<Vec<u8>, ExportError> {
    let data = crate::encode_ico(images)?;
    info!("Exported ICO with {} images ({} bytes)", images.len(), data.len());
    Ok(data)
}

//===========================================================================//


//===========================================================================//
