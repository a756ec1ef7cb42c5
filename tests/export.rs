extern crate foldericon;

use foldericon::{
    Compositor, ExportError, ExportFormat, IconDir, IconSettings, IconSizeSet,
    OverlaySettings, RasterImage,
};
use std::io::Cursor;

//===========================================================================//

/// Fills the canvas with one color and the overlay's square with another.
struct FlatCompositor {
    base: [u8; 4],
    overlay: [u8; 4],
}

impl Compositor for FlatCompositor {
    fn composite(
        &self,
        settings: &IconSettings,
        size: u32,
    ) -> Result<RasterImage, ExportError> {
        let mut rgba = self.base.repeat((size * size) as usize);
        if let Some(ref overlay) = settings.overlay {
            let placement = overlay.placement(size);
            for y in 0..size {
                for x in 0..size {
                    let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
                    if fx >= placement.left
                        && fx < placement.left + placement.extent
                        && fy >= placement.top
                        && fy < placement.top + placement.extent
                    {
                        let start = 4 * (y * size + x) as usize;
                        rgba[start..][..4].copy_from_slice(&self.overlay);
                    }
                }
            }
        }
        RasterImage::from_rgba_data(size, size, rgba)
    }
}

fn compositor() -> FlatCompositor {
    FlatCompositor { base: [10, 20, 30, 255], overlay: [200, 100, 50, 0] }
}

// Returns the BGRA bytes stored for pixel (x, y) of an entry.
fn stored_pixel(entry: &foldericon::IconDirEntry, x: u32, y: u32) -> &[u8] {
    let row = (entry.height() - 1 - y) as usize;
    let start = 4 * (row * entry.width() as usize + x as usize);
    &entry.pixel_data()[start..][..4]
}

//===========================================================================//

#[test]
fn compositor_output_is_stored_as_bgra() {
    let settings = IconSettings::default();
    let sizes = IconSizeSet::new(&[16, 32]).unwrap();
    let data =
        foldericon::export_ico(&compositor(), &settings, &sizes).unwrap();
    let icondir = IconDir::read(Cursor::new(&data)).unwrap();
    for entry in icondir.entries() {
        for pixel in entry.pixel_data().chunks(4) {
            assert_eq!(pixel, &[30, 20, 10, 255]);
        }
        assert!(entry.mask_data().iter().all(|&byte| byte == 0));
    }
}

#[test]
fn overlay_lands_in_the_same_place_at_every_size() {
    // A quarter-size transparent overlay in the top-left quadrant.
    let mut overlay = OverlaySettings::new("badge.png");
    overlay.scale = 25.0;
    overlay.x = -128.0;
    overlay.y = -128.0;
    let settings = IconSettings { overlay: Some(overlay), ..Default::default() };
    let sizes = IconSizeSet::new(&[16, 256]).unwrap();
    let data =
        foldericon::export_ico(&compositor(), &settings, &sizes).unwrap();
    let icondir = IconDir::read(Cursor::new(&data)).unwrap();
    for entry in icondir.entries() {
        let size = entry.width();
        let quarter = size / 4;
        // Inside the overlay square (which spans size/8 to 3*size/8):
        assert_eq!(stored_pixel(entry, quarter, quarter), &[50, 100, 200, 0]);
        // Outside it:
        assert_eq!(stored_pixel(entry, size - 1, size - 1), &[30, 20, 10, 255]);
        assert_eq!(stored_pixel(entry, 0, 0), &[30, 20, 10, 255]);
        // The overlay is transparent, so its top row is masked.  That row is
        // image row size/8, stored as mask row size - 1 - size/8.
        let mask_row_len = (((size + 31) / 32) * 4) as usize;
        let mask_row = (size - 1 - size / 8) as usize;
        let mask = &entry.mask_data()[mask_row * mask_row_len..][..mask_row_len];
        let col = (size / 8) as usize;
        assert_ne!(mask[col / 8] & (0x80 >> (col % 8)), 0);
        assert_eq!(mask[0] & 0x80, 0);
    }
}

#[test]
fn png_export_matches_compositor_output() {
    let settings = IconSettings::default();
    let data = foldericon::export(
        &compositor(),
        &settings,
        ExportFormat::Png,
        &IconSizeSet::default(),
    )
    .unwrap();
    let decoder = png::Decoder::new(data.as_slice());
    let mut reader = decoder.read_info().unwrap();
    let mut buffer = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buffer).unwrap();
    assert_eq!((info.width, info.height), (512, 512));
    assert_eq!(&buffer[..4], &[10, 20, 30, 255]);
}

#[test]
fn default_sizes_export() {
    let settings = IconSettings::default();
    let sizes = IconSizeSet::default();
    let data = foldericon::export_ico_parallel(&compositor(), &settings, &sizes)
        .unwrap();
    let icondir = IconDir::read(Cursor::new(&data)).unwrap();
    let widths: Vec<u32> =
        icondir.entries().iter().map(|entry| entry.width()).collect();
    assert_eq!(widths, vec![16, 32, 48, 64, 128, 256]);
    assert_eq!(data[6 + 5 * 16], 0);
}

//===========================================================================//
