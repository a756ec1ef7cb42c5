use std::io;
use thiserror::Error;

//===========================================================================//

/// An error that aborts an icon export.  No partial output is ever produced
/// alongside one of these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// An image (or a requested size) can't be encoded: zero or non-square
    /// dimensions, a pixel buffer of the wrong length, a size the ICO
    /// directory can't represent, or a missing image for a requested size.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    /// The image codec failed while producing output bytes.
    #[error("encoding failed: {0}")]
    Encoding(String),
}

impl From<ExportError> for io::Error {
    fn from(error: ExportError) -> io::Error {
        let kind = match error {
            ExportError::InvalidImage(_) => io::ErrorKind::InvalidInput,
            ExportError::Encoding(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, error)
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::ExportError;
    use std::io;

    #[test]
    fn converts_to_io_error_kind() {
        let error: io::Error =
            ExportError::InvalidImage("10x20 is not square".to_string())
                .into();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(error.to_string(), "invalid image: 10x20 is not square");
        let error: io::Error =
            ExportError::Encoding("out of memory".to_string()).into();
        assert_eq!(error.kind(), io::ErrorKind::Other);
    }
}

//===========================================================================//
