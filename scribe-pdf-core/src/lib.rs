//! # scribe-pdf
//!
//! PDF output plumbing in pure Rust: classic cross-reference tables with
//! two-phase object allocation, and the PNG scanline predictors used by
//! Flate-compressed streams.
//!
//! ## Features
//!
//! - **Cross-reference tables**: Reserve object numbers before the objects
//!   exist, resolve their byte offsets when they are written, and emit the
//!   fixed-width `xref` table once every reference has a position
//! - **Scanline predictors**: Decode and encode PNG predictor rows
//!   (None, Sub, Up, Average, Paeth) with exact wrapping arithmetic
//! - **PDF generation**: Write multi-page documents with raw content streams,
//!   images and an Info dictionary
//!
//! ## Quick Start
//!
//! ### Creating PDFs
//!
//! ```rust
//! use scribe_pdf::{Document, Page, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.set_title("My PDF");
//!
//! let mut page = Page::a4();
//! page.append_content(b"0 0 1 rg 100 100 200 200 re f\n");
//! doc.add_page(page);
//!
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Forward references
//!
//! ```rust
//! use scribe_pdf::xref::ReferenceTableBuilder;
//!
//! # fn main() -> scribe_pdf::Result<()> {
//! let mut builder = ReferenceTableBuilder::new();
//! let pages = builder.reserve_id();
//! let catalog = builder.allocate(15);
//! builder.set_position(pages, 64)?;
//!
//! let table = builder.build_table()?;
//! assert_eq!(table.size(), 3);
//! # let _ = catalog;
//! # Ok(())
//! # }
//! ```
//!
//! ### Undoing a predictor
//!
//! ```rust
//! use scribe_pdf::filters::decode_rows;
//!
//! # fn main() -> scribe_pdf::Result<()> {
//! // Sub predictor, three bytes per row
//! let decoded = decode_rows(&[1, 1, 1, 1], 3)?;
//! assert_eq!(decoded, vec![1, 2, 3]);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "compression")]
pub mod compression;
pub mod document;
pub mod error;
pub mod filters;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod writer;
pub mod xref;

pub use document::{Document, DocumentMetadata};
pub use error::{PdfError, Result};
pub use filters::{decode_rows, encode_rows, PredictorParams, PredictorStrategy, PredictorTag};
pub use graphics::{ColorSpace, Image};
pub use objects::{Dictionary, Object, ObjectId, Stream};
pub use page::Page;
pub use writer::{PdfWriter, WriterConfig};
pub use xref::{ObjectNumberGenerator, ReferenceTableBuilder, XRefEntry, XRefTable};

/// Current version of scribe-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Supported PDF versions
pub mod pdf_version {
    /// Versions accepted in the file header
    pub const SUPPORTED_VERSIONS: &[&str] =
        &["1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7"];

    pub fn is_supported(version: &str) -> bool {
        SUPPORTED_VERSIONS.contains(&version)
    }
}
