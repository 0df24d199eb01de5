use crate::error::Result;
use crate::xref::entry::XRefEntry;
use crate::xref::section::XRefSection;
use std::io::{Seek, Write};

const KEYWORD: &[u8] = b"xref\r\n";

/// A finalized classic cross-reference table.
///
/// Holds a single section starting at object 0, whose first entry is always
/// the free-list sentinel. Produced once by
/// [`ReferenceTableBuilder::build_table`](crate::xref::ReferenceTableBuilder::build_table)
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRefTable {
    section: XRefSection,
}

impl XRefTable {
    /// Builds a table for objects `1..=entries.len()`, prepending the
    /// sentinel as object 0.
    ///
    /// Free entries are chained in ascending object order: the sentinel
    /// points at the first free object, each free entry at the next one, and
    /// the last back at 0.
    pub fn new(entries: Vec<XRefEntry>) -> Self {
        let mut all = Vec::with_capacity(entries.len() + 1);
        all.push(XRefEntry::SENTINEL);
        all.extend(entries);

        let mut next_free = 0u32;
        for (number, entry) in all.iter_mut().enumerate().rev() {
            if entry.is_free() {
                *entry = entry.linked_to(next_free);
                next_free = number as u32;
            }
        }

        Self {
            section: XRefSection::new(0, all),
        }
    }

    pub fn section(&self) -> &XRefSection {
        &self.section
    }

    pub fn entries(&self) -> &[XRefEntry] {
        self.section.entries()
    }

    /// Value for the trailer's `/Size`: one past the highest object number.
    pub fn size(&self) -> u32 {
        self.section.first_object_number() + self.section.len() as u32
    }

    pub fn encoded_len(&self) -> usize {
        KEYWORD.len() + self.section.encoded_len()
    }

    /// Renders the table into one exactly-sized buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.encoded_len()];
        buf[..KEYWORD.len()].copy_from_slice(KEYWORD);
        self.section.write_into(&mut buf[KEYWORD.len()..]);
        buf
    }

    /// Writes the table to `writer` and returns the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize> {
        let bytes = self.to_bytes();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }

    /// Writes the table at the stream's current position and returns that
    /// position, which belongs in the file's `startxref` field.
    pub fn write_at<W: Write + Seek>(&self, writer: &mut W) -> Result<u64> {
        let start = writer.stream_position()?;
        self.write_to(writer)?;
        tracing::debug!(
            start,
            entries = self.section.len(),
            "wrote cross-reference table"
        );
        Ok(start)
    }
}
