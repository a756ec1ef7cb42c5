//===========================================================================//

/// Bit depths of the two planes stored in each ICO payload: the 32-bit BGRA
/// color array and the 1-bit AND mask.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BmpDepth {
    One,
    ThirtyTwo,
}

impl BmpDepth {
    pub(crate) fn bits_per_pixel(&self) -> u16 {
        match *self {
            BmpDepth::One => 1,
            BmpDepth::ThirtyTwo => 32,
        }
    }

    /// Returns the number of meaningful bytes in one row of `width` pixels.
    pub(crate) fn row_data_size(&self, width: u32) -> usize {
        ((width as usize) * (self.bits_per_pixel() as usize) + 7) / 8
    }

    /// Returns the length of one row of `width` pixels, including the
    /// padding that aligns every row to a multiple of four bytes.
    pub(crate) fn row_size(&self, width: u32) -> usize {
        ((self.row_data_size(width) + 3) / 4) * 4
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::BmpDepth;

    #[test]
    fn mask_rows_are_padded_to_four_bytes() {
        assert_eq!(BmpDepth::One.row_data_size(1), 1);
        assert_eq!(BmpDepth::One.row_size(1), 4);
        assert_eq!(BmpDepth::One.row_data_size(16), 2);
        assert_eq!(BmpDepth::One.row_size(16), 4);
        assert_eq!(BmpDepth::One.row_size(32), 4);
        assert_eq!(BmpDepth::One.row_size(33), 8);
        assert_eq!(BmpDepth::One.row_size(48), 8);
        assert_eq!(BmpDepth::One.row_size(256), 32);
    }

    #[test]
    fn color_rows_need_no_padding() {
        for width in [1, 3, 16, 17, 255, 256] {
            assert_eq!(BmpDepth::ThirtyTwo.row_data_size(width),
                       4 * width as usize);
            assert_eq!(BmpDepth::ThirtyTwo.row_size(width),
                       4 * width as usize);
        }
    }
}

//===========================================================================//
