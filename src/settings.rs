use crate::error::ExportError;
use crate::sizes::PNG_EXPORT_SIZE;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

// Overlay and text positions are offsets from the center of a canvas this
// many pixels wide, and are scaled to each export size.
const DESIGN_SIZE: f32 = PNG_EXPORT_SIZE as f32;

//===========================================================================//

/// Everything the compositor needs to render one icon.  Settings are plain
/// values; nothing here is mutated during an export.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconSettings {
    /// Filters applied to the base image.
    pub image: ImageSettings,
    /// A secondary image drawn over the base image, if any.
    pub overlay: Option<OverlaySettings>,
    /// A caption drawn over everything else, if any.
    pub text: Option<TextSettings>,
}

//===========================================================================//

/// Filter adjustments for the base image.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ImageSettings {
    /// Brightness, in percent (100 leaves the image unchanged).
    pub brightness: f32,
    /// Contrast, in percent (100 leaves the image unchanged).
    pub contrast: f32,
    /// Saturation, in percent (100 leaves the image unchanged).
    pub saturation: f32,
    /// Hue rotation, in degrees.
    pub hue: f32,
    /// Blur radius, in pixels of the 512-pixel design canvas.
    pub blur: f32,
    /// Drop shadow, if any.
    pub shadow: Option<ShadowSettings>,
    /// Opacity, in percent.
    pub opacity: f32,
}

impl Default for ImageSettings {
    fn default() -> ImageSettings {
        ImageSettings {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            hue: 0.0,
            blur: 0.0,
            shadow: None,
            opacity: 100.0,
        }
    }
}

/// A drop shadow behind the base image.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ShadowSettings {
    /// Horizontal shadow offset, in design-canvas pixels.
    pub offset_x: f32,
    /// Vertical shadow offset, in design-canvas pixels.
    pub offset_y: f32,
    /// Shadow blur radius, in design-canvas pixels.
    pub blur: f32,
    /// A `#rrggbb` or `#rrggbbaa` color.
    pub color: String,
}

//===========================================================================//

/// A secondary image placed over the base image.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct OverlaySettings {
    /// Where to load the overlay image from (a URL or a file path).
    pub image: String,
    /// Horizontal offset of the overlay's center from the canvas center.
    pub x: f32,
    /// Vertical offset of the overlay's center from the canvas center.
    pub y: f32,
    /// Overlay edge length as a percentage of the canvas size.
    pub scale: f32,
}

impl OverlaySettings {
    /// Creates centered overlay settings at full scale.
    pub fn new<S: Into<String>>(image: S) -> OverlaySettings {
        OverlaySettings { image: image.into(), x: 0.0, y: 0.0, scale: 100.0 }
    }

    /// Returns where the overlay lands on a `size`x`size` canvas.
    pub fn placement(&self, size: u32) -> Placement {
        let size = size as f32;
        let extent = size * self.scale / 100.0;
        let (center_x, center_y) = scaled_center(size, self.x, self.y);
        Placement {
            left: center_x - extent / 2.0,
            top: center_y - extent / 2.0,
            extent,
        }
    }
}

/// A square region of a canvas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Distance from the left edge of the canvas.
    pub left: f32,
    /// Distance from the top edge of the canvas.
    pub top: f32,
    /// Width and height of the region.
    pub extent: f32,
}

//===========================================================================//

/// A caption drawn centered on an anchor point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TextSettings {
    /// The caption itself.
    pub text: String,
    /// Font family name, as understood by the compositor's text renderer.
    pub font_family: String,
    /// Font size, in pixels of the 512-pixel design canvas.
    pub size: f32,
    /// A `#rrggbb` or `#rrggbbaa` color.
    pub color: String,
    /// Horizontal offset of the anchor from the canvas center.
    pub x: f32,
    /// Vertical offset of the anchor from the canvas center.
    pub y: f32,
}

impl TextSettings {
    /// Creates centered black text in a default font.
    pub fn new<S: Into<String>>(text: S) -> TextSettings {
        TextSettings {
            text: text.into(),
            font_family: "Arial".to_string(),
            size: 32.0,
            color: "#000000".to_string(),
            x: 0.0,
            y: 0.0,
        }
    }

    /// Returns the point on a `size`x`size` canvas that the text is centered
    /// on.
    pub fn anchor(&self, size: u32) -> (f32, f32) {
        scaled_center(size as f32, self.x, self.y)
    }

    /// Returns the font size to use on a `size`x`size` canvas.
    pub fn font_size(&self, size: u32) -> f32 {
        self.size * size as f32 / DESIGN_SIZE
    }

    /// Parses `self.color`.
    pub fn rgba(&self) -> Result<[u8; 4], ExportError> {
        parse_hex_color(&self.color)
    }
}

//===========================================================================//

fn scaled_center(size: f32, offset_x: f32, offset_y: f32) -> (f32, f32) {
    let factor = size / DESIGN_SIZE;
    (size / 2.0 + offset_x * factor, size / 2.0 + offset_y * factor)
}

/// Parses a `#rrggbb` or `#rrggbbaa` color into RGBA bytes.  Colors without
/// an alpha component are fully opaque.
pub fn parse_hex_color(color: &str) -> Result<[u8; 4], ExportError> {
    let digits = match color.strip_prefix('#') {
        Some(digits) if digits.len() == 6 || digits.len() == 8 => digits,
        _ => invalid_image!("Invalid color {:?} (expected #rrggbb)", color),
    };
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        invalid_image!("Invalid color {:?} (bad hex digits)", color);
    }
    let mut rgba = [u8::MAX; 4];
    for (index, channel) in rgba.iter_mut().enumerate() {
        let start = 2 * index;
        if start >= digits.len() {
            break;
        }
        *channel = match digits
            .get(start..start + 2)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        {
            Some(value) => value,
            None => {
                invalid_image!("Invalid color {:?} (bad hex digits)", color)
            }
        };
    }
    Ok(rgba)
}

//===========================================================================//


//===========================================================================//
