use crate::document::Document;
use crate::error::{PdfError, Result};
use crate::objects::{encode_name, encode_text_string, Dictionary, Object, ObjectId, Stream};
use crate::page::Page;
use crate::xref::ReferenceTableBuilder;
use chrono::{DateTime, Utc};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output options for [`PdfWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Version written in the `%PDF-x.y` header
    pub pdf_version: String,
    /// Flate-compress page contents and images
    pub compress_streams: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pdf_version: "1.7".to_string(),
            compress_streams: true,
        }
    }
}

/// Serializes objects to a byte sink and keeps the cross-reference
/// bookkeeping for everything it writes.
///
/// Object numbers come from an internal [`ReferenceTableBuilder`]. Objects
/// that must be referenced before they are written are [`reserve`]d first
/// and resolved when [`write_object`] reaches them; objects written on the
/// spot go through [`add_object`].
///
/// [`reserve`]: PdfWriter::reserve
/// [`write_object`]: PdfWriter::write_object
/// [`add_object`]: PdfWriter::add_object
pub struct PdfWriter<W: Write> {
    writer: W,
    references: ReferenceTableBuilder,
    current_position: u64,
    config: WriterConfig,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self::with_config(writer, WriterConfig::default())
    }

    pub fn with_config(writer: W, config: WriterConfig) -> Self {
        Self {
            writer,
            references: ReferenceTableBuilder::new(),
            current_position: 0,
            config,
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.current_position
    }

    /// Reserves an object number for an object written later.
    pub fn reserve(&mut self) -> ObjectId {
        self.references.reserve_id()
    }

    /// Writes the `%PDF-x.y` header followed by a binary comment line.
    pub fn write_header(&mut self) -> Result<()> {
        let header = format!("%PDF-{}\n", self.config.pdf_version);
        self.write_bytes(header.as_bytes())?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    /// Writes a previously reserved object at the current position.
    pub fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        self.references.set_position(id, self.current_position)?;
        self.write_indirect(id, object)
    }

    /// Allocates a new object number at the current position and writes the
    /// object there.
    pub fn add_object(&mut self, object: &Object) -> Result<ObjectId> {
        let id = self.references.allocate(self.current_position);
        self.write_indirect(id, object)?;
        Ok(id)
    }

    /// Writes a complete file for `document`.
    ///
    /// Page sizes are checked before the header goes out, so a NaN or
    /// infinite dimension fails without writing any bytes.
    pub fn write_document(&mut self, document: &Document) -> Result<()> {
        for page in &document.pages {
            format_real(page.width())?;
            format_real(page.height())?;
        }

        self.write_header()?;

        let catalog_id = self.reserve();
        let pages_id = self.reserve();
        let page_ids: Vec<ObjectId> = document.pages.iter().map(|_| self.reserve()).collect();

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name("Catalog".to_string()));
        catalog.set("Pages", Object::Reference(pages_id));
        self.write_object(catalog_id, &Object::Dictionary(catalog))?;

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name("Pages".to_string()));
        pages_dict.set(
            "Kids",
            Object::Array(page_ids.iter().copied().map(Object::Reference).collect()),
        );
        pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
        self.write_object(pages_id, &Object::Dictionary(pages_dict))?;

        for (page, page_id) in document.pages.iter().zip(page_ids) {
            self.write_page(page_id, pages_id, page)?;
        }

        let info_id = self.write_info(document)?;
        self.finish(catalog_id, Some(info_id))?;
        Ok(())
    }

    /// Writes the cross-reference table and trailer.
    ///
    /// Fails without writing anything if a reserved object was never
    /// written. Returns the byte offset of the `xref` keyword.
    pub fn finish(&mut self, root: ObjectId, info: Option<ObjectId>) -> Result<u64> {
        let table = self.references.build_table()?;

        let xref_position = self.current_position;
        let written = table.write_to(&mut self.writer)?;
        self.current_position += written as u64;

        let mut trailer = Dictionary::new();
        trailer.set("Size", Object::Integer(i64::from(table.size())));
        trailer.set("Root", Object::Reference(root));
        if let Some(info) = info {
            trailer.set("Info", Object::Reference(info));
        }

        self.write_bytes(b"trailer\n")?;
        self.write_object_value(&Object::Dictionary(trailer))?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;
        self.writer.flush()?;

        tracing::debug!(
            objects = table.size() - 1,
            xref_offset = xref_position,
            total_bytes = self.current_position,
            "finished PDF output"
        );
        Ok(xref_position)
    }

    fn write_page(&mut self, page_id: ObjectId, parent_id: ObjectId, page: &Page) -> Result<()> {
        let mut resources = Dictionary::new();

        if !page.images().is_empty() {
            let mut xobject_dict = Dictionary::new();
            for (name, image) in page.images() {
                let stream = image.to_stream(self.config.compress_streams)?;
                let image_id = self.add_object(&Object::from(stream))?;
                xobject_dict.set(name.as_str(), Object::Reference(image_id));
            }
            resources.set("XObject", Object::Dictionary(xobject_dict));
        }

        let mut content = Stream::new(page.content().to_vec());
        self.compress(&mut content)?;
        let content_id = self.add_object(&Object::from(content))?;

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name("Page".to_string()));
        page_dict.set("Parent", Object::Reference(parent_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width()),
                Object::Real(page.height()),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(resources));
        page_dict.set("Contents", Object::Reference(content_id));

        self.write_object(page_id, &Object::Dictionary(page_dict))
    }

    fn write_info(&mut self, document: &Document) -> Result<ObjectId> {
        let metadata = &document.metadata;
        let mut info_dict = Dictionary::new();

        let text_fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
            ("Creator", &metadata.creator),
            ("Producer", &metadata.producer),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                info_dict.set(key, Object::String(value.clone()));
            }
        }

        if let Some(creation_date) = metadata.creation_date {
            info_dict.set(
                "CreationDate",
                Object::String(format_pdf_date(creation_date)),
            );
        }
        if let Some(mod_date) = metadata.modification_date {
            info_dict.set("ModDate", Object::String(format_pdf_date(mod_date)));
        }

        self.add_object(&Object::Dictionary(info_dict))
    }

    #[cfg(feature = "compression")]
    fn compress(&self, stream: &mut Stream) -> Result<()> {
        if self.config.compress_streams {
            stream.compress_flate()?;
        }
        Ok(())
    }

    #[cfg(not(feature = "compression"))]
    fn compress(&self, _stream: &mut Stream) -> Result<()> {
        Ok(())
    }

    fn write_indirect(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        tracing::trace!(object = %id, offset = self.current_position, "writing object");

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;
        self.write_object_value(object)?;
        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_real(*f)?.as_bytes())?,
            Object::String(s) => self.write_bytes(&encode_text_string(s))?,
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(encode_name(n).as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => self.write_dictionary(dict)?,
            Object::Stream(dict, data) => {
                let mut dict = dict.clone();
                dict.set("Length", data.len() as i64);
                self.write_dictionary(&dict)?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(data)?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => self.write_bytes(id.to_string().as_bytes())?,
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &Dictionary) -> Result<()> {
        self.write_bytes(b"<<")?;
        for (key, value) in dict.iter() {
            self.write_bytes(b"\n/")?;
            self.write_bytes(encode_name(key).as_bytes())?;
            self.write_bytes(b" ")?;
            self.write_object_value(value)?;
        }
        self.write_bytes(b"\n>>")?;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

impl PdfWriter<BufWriter<std::fs::File>> {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new_with_writer(BufWriter::new(file)))
    }
}

/// Up to six decimals, trailing zeros dropped. PDF has no NaN or infinity.
fn format_real(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(PdfError::NonFiniteNumber(value));
    }
    Ok(format!("{value:.6}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
pub(crate) fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");

    // For UTC, the offset is always +00'00
    format!("{formatted}+00'00")
}
