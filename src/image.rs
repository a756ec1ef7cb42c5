use crate::bmpdepth::BmpDepth;
use crate::error::ExportError;
use std::io::Write;

//===========================================================================//

// Size limits for images in an ICO file:
const MIN_SIZE: u32 = 1;

// Pixels with an alpha value below this are marked transparent in the AND
// mask.
const MASK_ALPHA_THRESHOLD: u8 = 128;

//===========================================================================//

/// A fully composited, square image, ready to be exported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl RasterImage {
    /// Creates a new image with the given dimensions and RGBA data.  The
    /// `width` and `height` must be nonzero and equal, and `rgba_data` must
    /// have `4 * width * height` bytes and be in row-major order from top to
    /// bottom.  Returns `ExportError::InvalidImage` otherwise.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> Result<RasterImage, ExportError> {
        if width < MIN_SIZE {
            invalid_image!(
                "Invalid width (was {}, but must be at least {})",
                width,
                MIN_SIZE
            );
        }
        if height < MIN_SIZE {
            invalid_image!(
                "Invalid height (was {}, but must be at least {})",
                height,
                MIN_SIZE
            );
        }
        if width != height {
            invalid_image!(
                "Image must be square (was {}x{})",
                width,
                height
            );
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            invalid_image!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        Ok(RasterImage { width, height, rgba_data })
    }

    /// Creates a `size`x`size` image filled with a single RGBA color.
    pub fn solid(size: u32, rgba: [u8; 4]) -> Result<RasterImage, ExportError> {
        let num_pixels = (size as usize) * (size as usize);
        RasterImage::from_rgba_data(size, size, rgba.repeat(num_pixels))
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Returns the RGBA value of the pixel at column `x` and row `y` (row 0
    /// is the top of the image).  Panics if the coordinates are out of range.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "Pixel ({}, {}) is outside {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        let start = 4 * ((y as usize) * (self.width as usize) + x as usize);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.rgba_data[start..][..4]);
        rgba
    }

    /// Encodes the image as a PNG file.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        match self.write_png_internal(writer) {
            Ok(()) => Ok(()),
            Err(png::EncodingError::IoError(error)) => {
                Err(ExportError::Encoding(format!("PNG I/O error: {}", error)))
            }
            Err(png::EncodingError::Format(error)) => Err(
                ExportError::Encoding(format!("PNG format error: {}", error)),
            ),
            Err(png::EncodingError::LimitsExceeded) => {
                Err(ExportError::Encoding("PNG limits exceeded".to_string()))
            }
            Err(png::EncodingError::Parameter(error)) => {
                Err(ExportError::Encoding(format!(
                    "PNG parameter error: {}",
                    error
                )))
            }
        }
    }

    fn write_png_internal<W: Write>(
        &self,
        writer: W,
    ) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.rgba_data)?;
        Ok(())
    }

    /// Encodes the image as the payload of a 32 bpp ICO directory entry: the
    /// BGRA color data followed by the 1-bit AND mask.
    pub(crate) fn write_bmp_payload(&self) -> Vec<u8> {
        let width = self.width;
        let height = self.height as usize;
        let rgba = self.rgba_data();
        let rgba_row_len = 4 * width as usize;

        // Determine the size of the encoded data:
        let color_depth = BmpDepth::ThirtyTwo;
        let color_row_data_size = color_depth.row_data_size(width);
        let color_row_size = color_depth.row_size(width);
        let color_row_padding =
            vec![0u8; color_row_size - color_row_data_size];
        let mask_depth = BmpDepth::One;
        let mask_row_data_size = mask_depth.row_data_size(width);
        let mask_row_size = mask_depth.row_size(width);
        let mask_row_padding = vec![0u8; mask_row_size - mask_row_data_size];
        let data_size = height * (color_row_size + mask_row_size);
        let mut data = Vec::<u8>::with_capacity(data_size);

        // Write the color data, which is stored row by row, starting from the
        // *bottom* row:
        for row in 0..height {
            let start = (height - row - 1) * rgba_row_len;
            for pixel in rgba[start..][..rgba_row_len].chunks_exact(4) {
                let (red, green, blue) = (pixel[0], pixel[1], pixel[2]);
                data.extend_from_slice(&[blue, green, red, pixel[3]]);
            }
            data.extend_from_slice(&color_row_padding);
        }

        // Write the mask data, again bottom row first.  The high bit of each
        // byte is the leftmost of its eight pixels.
        for row in 0..height {
            let start = (height - row - 1) * rgba_row_len;
            for pixels in rgba[start..][..rgba_row_len].chunks(32) {
                let mut byte = 0u8;
                for (bit, pixel) in pixels.chunks_exact(4).enumerate() {
                    if pixel[3] < MASK_ALPHA_THRESHOLD {
                        byte |= 1 << (7 - bit);
                    }
                }
                data.push(byte);
            }
            data.extend_from_slice(&mask_row_padding);
        }

        debug_assert_eq!(data.len(), data_size);
        data
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::RasterImage;
    use crate::error::ExportError;

    #[test]
    fn rejects_zero_size() {
        let result = RasterImage::from_rgba_data(0, 0, Vec::new());
        assert!(matches!(result, Err(ExportError::InvalidImage(_))));
    }

    #[test]
    fn rejects_non_square() {
        let result = RasterImage::from_rgba_data(10, 20, vec![0; 800]);
        assert!(matches!(result, Err(ExportError::InvalidImage(_))));
    }

    #[test]
    fn rejects_wrong_data_length() {
        let result = RasterImage::from_rgba_data(2, 2, vec![0; 15]);
        assert!(matches!(result, Err(ExportError::InvalidImage(_))));
        let result = RasterImage::from_rgba_data(2, 2, vec![0; 17]);
        assert!(matches!(result, Err(ExportError::InvalidImage(_))));
    }

    #[test]
    fn pixel_lookup_is_top_down() {
        let rgba: &[u8] = b"\x01\x02\x03\x04\x05\x06\x07\x08\
                            \x09\x0a\x0b\x0c\x0d\x0e\x0f\x10";
        let image = RasterImage::from_rgba_data(2, 2, rgba.to_vec()).unwrap();
        assert_eq!(image.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(image.pixel(1, 0), [5, 6, 7, 8]);
        assert_eq!(image.pixel(0, 1), [9, 10, 11, 12]);
        assert_eq!(image.pixel(1, 1), [13, 14, 15, 16]);
    }

    #[test]
    fn bmp_payload_for_two_by_two_image() {
        // Top row: opaque red, transparent green.  Bottom row: half-opaque
        // blue (alpha 128, kept), nearly transparent white (alpha 127,
        // masked).
        let rgba: &[u8] = b"\xff\x00\x00\xff\x00\xff\x00\x00\
                            \x00\x00\xff\x80\xff\xff\xff\x7f";
        let image = RasterImage::from_rgba_data(2, 2, rgba.to_vec()).unwrap();
        let expected: &[u8] = b"\
            \xff\x00\x00\x80\xff\xff\xff\x7f\
            \x00\x00\xff\xff\x00\xff\x00\x00\
            \
            \x40\x00\x00\x00\
            \x40\x00\x00\x00";
        assert_eq!(image.write_bmp_payload(), expected);
    }

    #[test]
    fn mask_spans_multiple_bytes() {
        // A 9x9 image whose rightmost column is transparent; the ninth pixel
        // of each row lands in the high bit of the row's second mask byte.
        let mut rgba = Vec::new();
        for _row in 0..9 {
            for col in 0..9 {
                let alpha = if col == 8 { 0 } else { 255 };
                rgba.extend_from_slice(&[0, 0, 0, alpha]);
            }
        }
        let image = RasterImage::from_rgba_data(9, 9, rgba).unwrap();
        let payload = image.write_bmp_payload();
        assert_eq!(payload.len(), 9 * 9 * 4 + 9 * 4);
        let mask = &payload[9 * 9 * 4..];
        for row in mask.chunks(4) {
            assert_eq!(row, &[0x00, 0x80, 0x00, 0x00]);
        }
    }
}

//===========================================================================//
