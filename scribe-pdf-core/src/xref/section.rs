use crate::xref::digits::{decimal_len, write_decimal};
use crate::xref::entry::XRefEntry;

/// A run of entries numbered contiguously from `first_object_number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRefSection {
    first_object_number: u32,
    entries: Vec<XRefEntry>,
}

impl XRefSection {
    pub fn new(first_object_number: u32, entries: Vec<XRefEntry>) -> Self {
        Self {
            first_object_number,
            entries,
        }
    }

    pub fn first_object_number(&self) -> u32 {
        self.first_object_number
    }

    pub fn entries(&self) -> &[XRefEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `object_number`, if it falls inside this section.
    pub fn get(&self, object_number: u32) -> Option<&XRefEntry> {
        let index = object_number.checked_sub(self.first_object_number)?;
        self.entries.get(index as usize)
    }

    fn header_len(&self) -> usize {
        decimal_len(self.first_object_number as u64) + 1 + decimal_len(self.entries.len() as u64) + 2
    }

    /// Exact serialized size: header line plus 20 bytes per entry.
    pub fn encoded_len(&self) -> usize {
        self.header_len() + self.entries.len() * XRefEntry::LEN
    }

    /// Serializes into `buf`, which must be exactly [`Self::encoded_len`]
    /// bytes long.
    pub fn write_into(&self, buf: &mut [u8]) {
        debug_assert_eq!(buf.len(), self.encoded_len());

        let mut pos = write_decimal(buf, self.first_object_number as u64);
        buf[pos] = b' ';
        pos += 1;
        pos += write_decimal(&mut buf[pos..], self.entries.len() as u64);
        buf[pos] = b'\r';
        buf[pos + 1] = b'\n';
        pos += 2;

        for (entry, slot) in self
            .entries
            .iter()
            .zip(buf[pos..].chunks_exact_mut(XRefEntry::LEN))
        {
            entry.write_into(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section() {
        let section = XRefSection::new(0, Vec::new());
        assert!(section.is_empty());
        assert_eq!(section.encoded_len(), 5);

        let mut buf = vec![0u8; section.encoded_len()];
        section.write_into(&mut buf);
        assert_eq!(buf, b"0 0\r\n");
    }

    #[test]
    fn test_section_layout() {
        let section = XRefSection::new(
            0,
            vec![
                XRefEntry::SENTINEL,
                XRefEntry::in_use(15, 0).unwrap(),
                XRefEntry::in_use(94, 0).unwrap(),
            ],
        );

        let mut buf = vec![0u8; section.encoded_len()];
        section.write_into(&mut buf);

        let expected: &[u8] = b"0 3\r\n\
0000000000 65535 f\r\n\
0000000015 00000 n\r\n\
0000000094 00000 n\r\n";
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_multi_digit_header() {
        let entries = vec![XRefEntry::free(0); 12];
        let section = XRefSection::new(250, entries);

        assert_eq!(section.encoded_len(), "250 12\r\n".len() + 12 * 20);

        let mut buf = vec![0u8; section.encoded_len()];
        section.write_into(&mut buf);
        assert!(buf.starts_with(b"250 12\r\n0000000000 00000 f\r\n"));
    }

    #[test]
    fn test_get_by_object_number() {
        let section = XRefSection::new(
            4,
            vec![XRefEntry::in_use(10, 0).unwrap(), XRefEntry::in_use(20, 0).unwrap()],
        );

        assert_eq!(section.get(4).map(|e| e.offset()), Some(10));
        assert_eq!(section.get(5).map(|e| e.offset()), Some(20));
        assert!(section.get(3).is_none());
        assert!(section.get(6).is_none());
    }
}
