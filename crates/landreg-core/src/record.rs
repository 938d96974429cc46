//! # Ledger Record Encoding
//!
//! `RecordBytes` is the byte form every Land and Deed record takes in world
//! state. Other clients of the same ledger read and write these keys, so the
//! encoding is fixed field for field:
//!
//! 1. **Fields in declared order.** Record structs declare their fields in
//!    the order they are stored (alphabetical, case-insensitive), and the
//!    encoder emits them as declared. This is not RFC 8785 order, which
//!    would put `OwnerNID` before `OwnerName`.
//! 2. **Compact separators**, no whitespace.
//! 3. **HTML-sensitive characters escaped.** `<`, `>`, `&`, U+2028 and
//!    U+2029 inside strings are written as `\u00XX` escapes. All other
//!    non-ASCII text passes through as UTF-8.
//! 4. **Floats are rejected**, exactly as for [`CanonicalBytes`].
//!
//! [`CanonicalBytes`]: crate::CanonicalBytes

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::canonical::reject_floats;
use crate::error::CanonicalizationError;

/// Stored bytes of a ledger record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordBytes(Vec<u8>);

impl RecordBytes {
    /// Encode a record struct.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the record carries a non-integral number,
    /// `SerializationFailed` if serde cannot represent it as JSON.
    pub fn new(record: &impl Serialize) -> Result<Self, CanonicalizationError> {
        reject_floats(&serde_json::to_value(record)?)?;
        let mut buf = Vec::with_capacity(256);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, EscapeHtml);
        record.serialize(&mut ser)?;
        Ok(Self(buf))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for RecordBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Compact output (the trait defaults) with HTML-sensitive characters
/// escaped in strings.
struct EscapeHtml;

impl Formatter for EscapeHtml {
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escape = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escape.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Owner {
        Name: &'static str,
        NID: i64,
        Note: &'static str,
    }

    fn encode(record: &impl Serialize) -> String {
        String::from_utf8(RecordBytes::new(record).unwrap().into_vec()).unwrap()
    }

    #[test]
    fn test_fields_emitted_as_declared() {
        let s = encode(&Owner {
            Name: "A",
            NID: 100,
            Note: "",
        });
        assert_eq!(s, r#"{"Name":"A","NID":100,"Note":""}"#);
    }

    #[test]
    fn test_html_characters_escaped() {
        let s = encode(&Owner {
            Name: "<b>&</b>",
            NID: 1,
            Note: "a\u{2028}b\u{2029}c",
        });
        assert_eq!(
            s,
            r#"{"Name":"\u003cb\u003e\u0026\u003c/b\u003e","NID":1,"Note":"a\u2028b\u2029c"}"#
        );
    }

    #[test]
    fn test_quotes_and_controls_still_escaped() {
        let s = encode(&Owner {
            Name: "say \"hi\"\n",
            NID: 1,
            Note: "ঢাকা",
        });
        assert_eq!(s, "{\"Name\":\"say \\\"hi\\\"\\n\",\"NID\":1,\"Note\":\"ঢাকা\"}");
    }

    #[test]
    fn test_float_rejected() {
        #[derive(Serialize)]
        struct Area {
            acres: f64,
        }
        assert!(matches!(
            RecordBytes::new(&Area { acres: 1.5 }),
            Err(CanonicalizationError::FloatRejected(_))
        ));
    }

    #[test]
    fn test_output_parses_back() {
        let bytes = RecordBytes::new(&Owner {
            Name: "<x>",
            NID: 7,
            Note: "&",
        })
        .unwrap();
        let v: serde_json::Value = serde_json::from_slice(bytes.as_bytes()).unwrap();
        assert_eq!(v["Name"], "<x>");
        assert_eq!(v["Note"], "&");
    }
}
