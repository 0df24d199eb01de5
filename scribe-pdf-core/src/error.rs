use crate::objects::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unresolved object references: {}", format_ids(.0))]
    UnresolvedReferences(Vec<ObjectId>),

    #[error("Position already recorded for object {0}")]
    PositionAlreadySet(ObjectId),

    #[error("Object {0} was not allocated by this reference table")]
    UnknownReference(ObjectId),

    #[error("Byte offset {0} does not fit in a 10-digit xref field")]
    OffsetOutOfRange(u64),

    #[error("Invalid predictor tag {tag} in row {row}")]
    InvalidPredictorTag { row: usize, tag: u8 },

    #[error("Truncated scanline: expected a multiple of {expected} bytes, got {actual}")]
    TruncatedScanline { expected: usize, actual: usize },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Cannot write non-finite number {0}")]
    NonFiniteNumber(f64),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Compression error: {0}")]
    CompressionError(String),
}

impl PdfError {
    /// The calling writer broke the allocate/resolve contract.
    pub fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            PdfError::UnresolvedReferences(_)
                | PdfError::PositionAlreadySet(_)
                | PdfError::UnknownReference(_)
                | PdfError::OffsetOutOfRange(_)
        )
    }

    /// The input bytes are structurally invalid.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            PdfError::InvalidPredictorTag { .. }
                | PdfError::TruncatedScanline { .. }
                | PdfError::InvalidFormat(_)
        )
    }
}

fn format_ids(ids: &[ObjectId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_pdf_error_display() {
        let error = PdfError::InvalidFormat("test message".to_string());
        assert_eq!(error.to_string(), "Invalid format: test message");
    }

    #[test]
    fn test_unresolved_references_display() {
        let error =
            PdfError::UnresolvedReferences(vec![ObjectId::new(3, 0), ObjectId::new(7, 0)]);
        assert_eq!(
            error.to_string(),
            "Unresolved object references: 3 0 R, 7 0 R"
        );
    }

    #[test]
    fn test_pdf_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let pdf_error = PdfError::from(io_error);

        match pdf_error {
            PdfError::Io(ref err) => {
                assert_eq!(err.kind(), ErrorKind::NotFound);
            }
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_error_kinds_are_distinguishable() {
        let authoring = vec![
            PdfError::UnresolvedReferences(vec![ObjectId::new(1, 0)]),
            PdfError::PositionAlreadySet(ObjectId::new(1, 0)),
            PdfError::UnknownReference(ObjectId::new(9, 0)),
            PdfError::OffsetOutOfRange(10_000_000_000),
        ];
        for error in authoring {
            assert!(error.is_authoring_error(), "{error}");
            assert!(!error.is_format_error(), "{error}");
        }

        let format = vec![
            PdfError::InvalidPredictorTag { row: 0, tag: 5 },
            PdfError::TruncatedScanline {
                expected: 4,
                actual: 3,
            },
            PdfError::InvalidFormat("bad".to_string()),
        ];
        for error in format {
            assert!(error.is_format_error(), "{error}");
            assert!(!error.is_authoring_error(), "{error}");
        }

        let nan = PdfError::NonFiniteNumber(f64::NAN);
        assert_eq!(nan.to_string(), "Cannot write non-finite number NaN");
        assert!(!nan.is_authoring_error());
        assert!(!nan.is_format_error());

        let io = PdfError::from(IoError::new(ErrorKind::Other, "disk"));
        assert!(!io.is_authoring_error());
        assert!(!io.is_format_error());
    }

    #[test]
    fn test_error_chain_display() {
        let errors = [
            (
                "Position already recorded for object 4 0 R",
                PdfError::PositionAlreadySet(ObjectId::new(4, 0)),
            ),
            (
                "Object 12 0 R was not allocated by this reference table",
                PdfError::UnknownReference(ObjectId::new(12, 0)),
            ),
            (
                "Byte offset 10000000000 does not fit in a 10-digit xref field",
                PdfError::OffsetOutOfRange(10_000_000_000),
            ),
            (
                "Invalid predictor tag 7 in row 2",
                PdfError::InvalidPredictorTag { row: 2, tag: 7 },
            ),
            (
                "Truncated scanline: expected a multiple of 4 bytes, got 6",
                PdfError::TruncatedScanline {
                    expected: 4,
                    actual: 6,
                },
            ),
            (
                "Invalid image: expected 12 sample bytes, got 11",
                PdfError::InvalidImage("expected 12 sample bytes, got 11".to_string()),
            ),
            (
                "Compression error: deflate failed",
                PdfError::CompressionError("deflate failed".to_string()),
            ),
        ];

        for (expected, error) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfError>();
    }
}
