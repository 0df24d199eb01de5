//! PDF writing functionality

mod pdf_writer;

pub use pdf_writer::{PdfWriter, WriterConfig};
