//! Byte-level encoding of name and text string tokens
//! (ISO 32000-1 §7.3.4 and §7.3.5).

use std::fmt::Write;

/// Bytes that may appear in a name unescaped: printable ASCII other than
/// `#` and the delimiters.
fn is_regular_name_byte(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7E)
        && !matches!(
            byte,
            b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
        )
}

/// Name body without the leading `/`. Every other byte is written as `#xx`.
pub fn encode_name(name: &str) -> String {
    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if is_regular_name_byte(byte) {
            encoded.push(byte as char);
        } else {
            // Writing into a String cannot fail
            let _ = write!(encoded, "#{byte:02X}");
        }
    }
    encoded
}

/// Complete text string token, delimiters included.
///
/// ASCII text is written as a literal string with `\`, `(`, `)` and CR
/// escaped. Any other text is written as a UTF-16BE hex string behind a
/// `FE FF` byte order mark, which readers decode regardless of
/// PDFDocEncoding.
pub fn encode_text_string(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        let mut literal = Vec::with_capacity(text.len() + 2);
        literal.push(b'(');
        for byte in text.bytes() {
            match byte {
                b'\\' | b'(' | b')' => {
                    literal.push(b'\\');
                    literal.push(byte);
                }
                b'\r' => literal.extend_from_slice(b"\\r"),
                _ => literal.push(byte),
            }
        }
        literal.push(b')');
        literal
    } else {
        let mut hex = String::with_capacity(4 * text.len() + 6);
        hex.push_str("<FEFF");
        for unit in text.encode_utf16() {
            let _ = write!(hex, "{unit:04X}");
        }
        hex.push('>');
        hex.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_names_are_unchanged() {
        assert_eq!(encode_name("Im1"), "Im1");
        assert_eq!(encode_name("FlateDecode"), "FlateDecode");
        assert_eq!(encode_name("A;B-C.D_E"), "A;B-C.D_E");
    }

    #[test]
    fn test_name_escapes() {
        assert_eq!(encode_name("My Image"), "My#20Image");
        assert_eq!(encode_name("A#1"), "A#231");
        assert_eq!(encode_name("x/y"), "x#2Fy");
        assert_eq!(encode_name("(a)<b>[c]{d}%"), "#28a#29#3Cb#3E#5Bc#5D#7Bd#7D#25");
        assert_eq!(encode_name("tab\there"), "tab#09here");
        assert_eq!(encode_name("é"), "#C3#A9");
    }

    #[test]
    fn test_ascii_text_is_literal() {
        assert_eq!(encode_text_string("Hello"), b"(Hello)");
        assert_eq!(
            encode_text_string("a (b) \\ c"),
            b"(a \\(b\\) \\\\ c)".to_vec()
        );
        assert_eq!(encode_text_string("line\r\nnext"), b"(line\\r\nnext)".to_vec());
        assert_eq!(encode_text_string(""), b"()");
    }

    #[test]
    fn test_non_ascii_text_is_utf16_hex() {
        assert_eq!(encode_text_string("Café"), b"<FEFF00430061006600E9>".to_vec());
        // Outside the BMP: surrogate pair
        assert_eq!(encode_text_string("😀"), b"<FEFFD83DDE00>".to_vec());
    }
}
