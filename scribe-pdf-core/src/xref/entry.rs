use crate::error::{PdfError, Result};
use crate::xref::digits::write_padded;

/// Largest byte offset a classic xref entry can carry (10 decimal digits).
pub const MAX_OFFSET: u64 = 9_999_999_999;

/// One row of a classic cross-reference section.
///
/// Serialized form is always exactly [`XRefEntry::LEN`] bytes:
/// `oooooooooo ggggg n\r\n`. Readers locate entries by arithmetic on that
/// width, so it never varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefEntry {
    offset: u64,
    generation: u16,
    free: bool,
}

impl XRefEntry {
    pub const LEN: usize = 20;

    /// Head of the free list stored at object 0. Until the table links it to
    /// a free object its offset is 0, the empty list.
    pub const SENTINEL: XRefEntry = XRefEntry {
        offset: 0,
        generation: 65535,
        free: true,
    };

    pub fn new(offset: u64, generation: u16, free: bool) -> Result<Self> {
        if offset > MAX_OFFSET {
            return Err(PdfError::OffsetOutOfRange(offset));
        }
        Ok(Self {
            offset,
            generation,
            free,
        })
    }

    pub fn in_use(offset: u64, generation: u16) -> Result<Self> {
        Self::new(offset, generation, false)
    }

    /// Free entry with no successor in the free list.
    pub fn free(generation: u16) -> Self {
        Self {
            offset: 0,
            generation,
            free: true,
        }
    }

    /// Same entry pointing at `next_free`, the next object number in the
    /// free list. In-use entries are returned unchanged.
    pub(crate) fn linked_to(self, next_free: u32) -> Self {
        if !self.free {
            return self;
        }
        Self {
            offset: next_free as u64,
            ..self
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    /// Fills `buf[..20]` with the serialized entry.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`XRefEntry::LEN`].
    pub fn write_into(&self, buf: &mut [u8]) {
        let buf = &mut buf[..Self::LEN];
        write_padded(&mut buf[0..10], self.offset);
        buf[10] = b' ';
        write_padded(&mut buf[11..16], self.generation as u64);
        buf[16] = b' ';
        buf[17] = if self.free { b'f' } else { b'n' };
        buf[18] = b'\r';
        buf[19] = b'\n';
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut buf = [0u8; Self::LEN];
        self.write_into(&mut buf);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_use_entry_layout() {
        let entry = XRefEntry::in_use(1234, 0).unwrap();
        assert_eq!(&entry.to_bytes(), b"0000001234 00000 n\r\n");
    }

    #[test]
    fn test_sentinel_layout() {
        assert_eq!(&XRefEntry::SENTINEL.to_bytes(), b"0000000000 65535 f\r\n");
        assert!(XRefEntry::SENTINEL.is_free());
    }

    #[test]
    fn test_free_entry_layout() {
        let entry = XRefEntry::free(3);
        assert_eq!(&entry.to_bytes(), b"0000000000 00003 f\r\n");
    }

    #[test]
    fn test_linked_free_entry_points_at_next_free_number() {
        let entry = XRefEntry::free(0).linked_to(7);
        assert_eq!(&entry.to_bytes(), b"0000000007 00000 f\r\n");

        let in_use = XRefEntry::in_use(42, 0).unwrap();
        assert_eq!(in_use.linked_to(7), in_use);
    }

    #[test]
    fn test_max_offset_is_accepted() {
        let entry = XRefEntry::in_use(MAX_OFFSET, 65535).unwrap();
        assert_eq!(&entry.to_bytes(), b"9999999999 65535 n\r\n");
    }

    #[test]
    fn test_offset_overflow_is_reported() {
        let err = XRefEntry::in_use(MAX_OFFSET + 1, 0).unwrap_err();
        assert!(matches!(err, PdfError::OffsetOutOfRange(10_000_000_000)));
        assert!(err.is_authoring_error());
    }

    #[test]
    fn test_write_into_larger_buffer() {
        let mut buf = [b'.'; 24];
        XRefEntry::in_use(17, 2).unwrap().write_into(&mut buf[2..]);
        assert_eq!(&buf[..2], b"..");
        assert_eq!(&buf[2..22], b"0000000017 00002 n\r\n");
        assert_eq!(&buf[22..], b"..");
    }
}
