use crate::bmpdepth::BmpDepth;
use crate::error::ExportError;
use crate::image::RasterImage;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::debug;
use std::io::{self, Read, Seek, SeekFrom, Write};

//===========================================================================//

// The resource type number for icons (2 would be cursors).
const ICON_RESOURCE_TYPE: u16 = 1;

// The largest width/height an ICONDIRENTRY can describe.
pub(crate) const MAX_ICON_SIZE: u32 = 256;

// Byte lengths of the ICONDIR header and of each ICONDIRENTRY.
const ICONDIR_LEN: u32 = 6;
const ICONDIRENTRY_LEN: u32 = 16;

//===========================================================================//

/// A collection of images; the contents of a single ICO file.
#[derive(Clone, Debug, Default)]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a new, empty collection of icons.
    pub fn new() -> IconDir {
        IconDir { entries: Vec::new() }
    }

    /// Returns the entries in this collection.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Adds an entry to the end of the collection.
    pub fn add_entry(&mut self, entry: IconDirEntry) {
        self.entries.push(entry);
    }

    /// Encodes each image into an entry, in the order given.  Every image is
    /// validated before any of them is encoded, so an error never leaves a
    /// partially built collection behind.
    pub fn encode(images: &[RasterImage]) -> Result<IconDir, ExportError> {
        if images.is_empty() {
            invalid_image!("An ICO file needs at least one image");
        }
        if images.len() > (u16::MAX as usize) {
            invalid_image!(
                "Too many images (was {}, but max is {})",
                images.len(),
                u16::MAX
            );
        }
        for image in images.iter() {
            check_icon_size(image)?;
        }
        let entries = images
            .iter()
            .map(IconDirEntry::encode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IconDir { entries })
    }

    /// Reads an ICO file into memory.
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != ICON_RESOURCE_TYPE {
            invalid_data!(
                "Invalid resource type (was {}, but must be {})",
                restype,
                ICON_RESOURCE_TYPE
            );
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        let mut spans = Vec::<(u32, u32)>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            // A width/height byte of zero indicates a size of 256.
            let width = if width_byte == 0 { 256 } else { width_byte as u32 };
            let height =
                if height_byte == 0 { 256 } else { height_byte as u32 };
            spans.push((data_offset, data_size));
            let entry = IconDirEntry {
                width,
                height,
                num_colors,
                color_planes,
                bits_per_pixel,
                data_offset,
                data: Vec::new(),
            };
            entries.push(entry);
        }
        for (index, &(data_offset, data_size)) in spans.iter().enumerate() {
            reader.seek(SeekFrom::Start(data_offset as u64))?;
            let mut data = vec![0u8; data_size as usize];
            reader.read_exact(&mut data)?;
            entries[index].data = data;
        }
        Ok(IconDir { entries })
    }

    /// Writes an ICO file out to disk.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.entries.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many entries in IconDir (was {}, but max is {})",
                self.entries.len(),
                u16::MAX
            );
        }
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_RESOURCE_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        let mut data_offset = self.first_data_offset();
        for entry in self.entries.iter() {
            // A width/height byte of zero indicates a size of 256.
            let width = if entry.width > 255 { 0 } else { entry.width as u8 };
            writer.write_u8(width)?;
            let height =
                if entry.height > 255 { 0 } else { entry.height as u8 };
            writer.write_u8(height)?;
            writer.write_u8(entry.num_colors)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(entry.color_planes)?;
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            let data_size = entry.data.len() as u32;
            writer.write_u32::<LittleEndian>(data_size)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
            data_offset += data_size;
        }
        for entry in self.entries.iter() {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Returns the complete ICO file as a byte buffer.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let data_len: usize =
            self.entries.iter().map(|entry| entry.data.len()).sum();
        let mut bytes = Vec::<u8>::with_capacity(
            self.first_data_offset() as usize + data_len,
        );
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Returns the file offset just past the directory, where the first
    /// payload begins.
    fn first_data_offset(&self) -> u32 {
        ICONDIR_LEN + ICONDIRENTRY_LEN * (self.entries.len() as u32)
    }
}

//===========================================================================//

/// One entry in an ICO file; a single icon image.
#[derive(Clone, Debug)]
pub struct IconDirEntry {
    width: u32,
    height: u32,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_offset: u32,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Encodes an image in a new entry, as 32 bpp BGRA data plus a 1-bit
    /// AND mask.  Returns an error if the image is larger than 256x256,
    /// which an ICO directory can't describe.
    pub fn encode(image: &RasterImage) -> Result<IconDirEntry, ExportError> {
        check_icon_size(image)?;
        let data = image.write_bmp_payload();
        debug!(
            "Encoded {}x{} icon entry ({} bytes)",
            image.width(),
            image.height(),
            data.len()
        );
        Ok(IconDirEntry {
            width: image.width(),
            height: image.height(),
            num_colors: 0,
            color_planes: 1,
            bits_per_pixel: BmpDepth::ThirtyTwo.bits_per_pixel(),
            data_offset: 0,
            data,
        })
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the size of the color palette (zero for true-color images).
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the number of color planes.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel (color depth) of the image.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the file offset this entry's data was read from, or zero for
    /// an entry that was encoded rather than read.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    /// Returns the raw, encoded image data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the BGRA color portion of the encoded data.
    pub fn pixel_data(&self) -> &[u8] {
        let len = self.pixel_data_len().min(self.data.len());
        &self.data[..len]
    }

    /// Returns the AND mask portion of the encoded data.
    pub fn mask_data(&self) -> &[u8] {
        let len = self.pixel_data_len().min(self.data.len());
        &self.data[len..]
    }

    fn pixel_data_len(&self) -> usize {
        BmpDepth::ThirtyTwo.row_size(self.width) * self.height as usize
    }
}

fn check_icon_size(image: &RasterImage) -> Result<(), ExportError> {
    if image.width() > MAX_ICON_SIZE || image.height() > MAX_ICON_SIZE {
        invalid_image!(
            "Image is too large for an ICO file (was {}x{}, but max is {}x{})",
            image.width(),
            image.height(),
            MAX_ICON_SIZE,
            MAX_ICON_SIZE
        );
    }
    Ok(())
}

//===========================================================================//


//===========================================================================//
