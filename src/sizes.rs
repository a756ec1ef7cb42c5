use crate::error::ExportError;
use crate::icondir::MAX_ICON_SIZE;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The size, in pixels, of the single image produced by a PNG export.
pub const PNG_EXPORT_SIZE: u32 = 512;

// The resolutions included in an ICO export unless the caller asks otherwise.
const DEFAULT_ICON_SIZES: &[u32] = &[16, 32, 48, 64, 128, 256];

//===========================================================================//

/// An ordered list of square icon resolutions to export.  Each size is
/// between 1 and 256 inclusive.  Duplicates are allowed, though each one
/// costs a redundant copy of the image in the output file.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u32>", into = "Vec<u32>"))]
pub struct IconSizeSet {
    sizes: Vec<u32>,
}

impl IconSizeSet {
    /// Creates a size set, preserving the given order.  Returns an error if
    /// the list is empty or any size is zero or larger than 256.
    pub fn new(sizes: &[u32]) -> Result<IconSizeSet, ExportError> {
        if sizes.is_empty() {
            invalid_image!("At least one icon size is required");
        }
        for &size in sizes.iter() {
            if size == 0 || size > MAX_ICON_SIZE {
                invalid_image!(
                    "Invalid icon size (was {}, but must be from 1 to {})",
                    size,
                    MAX_ICON_SIZE
                );
            }
        }
        Ok(IconSizeSet { sizes: sizes.to_vec() })
    }

    /// Returns the sizes, in the order they will appear in the ICO
    /// directory.
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Returns the number of sizes.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always false; a size set can't be empty.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Iterates over the sizes in order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.sizes.iter().copied()
    }
}

impl Default for IconSizeSet {
    fn default() -> IconSizeSet {
        IconSizeSet { sizes: DEFAULT_ICON_SIZES.to_vec() }
    }
}

impl TryFrom<Vec<u32>> for IconSizeSet {
    type Error = ExportError;

    fn try_from(sizes: Vec<u32>) -> Result<IconSizeSet, ExportError> {
        IconSizeSet::new(&sizes)
    }
}

impl From<IconSizeSet> for Vec<u32> {
    fn from(set: IconSizeSet) -> Vec<u32> {
        set.sizes
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::IconSizeSet;
    use crate::error::ExportError;

    #[test]
    fn default_sizes() {
        let sizes = IconSizeSet::default();
        assert_eq!(sizes.sizes(), &[16, 32, 48, 64, 128, 256]);
        assert_eq!(sizes.len(), 6);
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let sizes = IconSizeSet::new(&[256, 16, 32, 16]).unwrap();
        assert_eq!(sizes.iter().collect::<Vec<u32>>(), vec![256, 16, 32, 16]);
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        for bad in [&[][..], &[0][..], &[16, 257][..], &[512][..]] {
            let result = IconSizeSet::new(bad);
            assert!(
                matches!(result, Err(ExportError::InvalidImage(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_validates_sizes() {
        let sizes: IconSizeSet = serde_json::from_str("[256, 16]").unwrap();
        assert_eq!(sizes.sizes(), &[256, 16]);
        assert_eq!(serde_json::to_string(&sizes).unwrap(), "[256,16]");
        for bad in ["[]", "[0]", "[512]", "[16, 257]"] {
            assert!(
                serde_json::from_str::<IconSizeSet>(bad).is_err(),
                "{} should be rejected",
                bad
            );
        }
    }
}

//===========================================================================//
