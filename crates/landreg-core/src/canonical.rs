//! # Canonical Encoding for Hashing
//!
//! `CanonicalBytes` is the byte form a value takes before it is hashed.
//! Endorsing peers that build the same transaction-id seed must hash the
//! same bytes, so this encoding cannot depend on struct field declaration
//! order or map iteration order.
//!
//! Stored records use [`RecordBytes`](crate::RecordBytes) instead, which
//! keeps declared field order.
//!
//! ## Rules
//!
//! 1. **Floats are rejected.** Parcel numbers and NIDs are integers; a float
//!    in hashed input is a bug and would make number formatting an interop
//!    hazard.
//! 2. **Objects are emitted with sorted keys** and compact separators
//!    (RFC 8785 via `serde_jcs`).
//! 3. **Strings pass through as UTF-8**, no ASCII escaping.
//!
//! The inner buffer is private; the sole constructor is
//! [`CanonicalBytes::new`].

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// JCS-canonical bytes of a serializable value.
///
/// # Invariants
///
/// - Object keys are sorted by UTF-16 code unit, as RFC 8785 requires.
/// - No floating point numbers appear anywhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a non-integral number,
    /// `SerializationFailed` if serde cannot represent the value as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into the owned buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

pub(crate) fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct OutOfOrder {
        Upazila: &'static str,
        DagNo: i64,
        AssetID: &'static str,
        Authenticators: Vec<i64>,
    }

    #[test]
    fn test_struct_fields_emitted_alphabetically() {
        let rec = OutOfOrder {
            Upazila: "Savar",
            DagNo: 12,
            AssetID: "12x",
            Authenticators: vec![3, 1],
        };
        let cb = CanonicalBytes::new(&rec).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(
            s,
            r#"{"AssetID":"12x","Authenticators":[3,1],"DagNo":12,"Upazila":"Savar"}"#
        );
    }

    #[test]
    fn test_nested_objects_sorted() {
        let data = serde_json::json!({"z": {"b": 2, "a": 1}, "m": [3, 2]});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"m":[3,2],"z":{"a":1,"b":2}}"#);
    }

    #[test]
    fn test_float_rejected() {
        let data = serde_json::json!({"DagNo": 1.5});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 1.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_float_in_array_rejected() {
        let data = serde_json::json!({"Authenticators": [1, 2.25]});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_negative_and_large_integers() {
        let data = serde_json::json!({"a": -42, "b": 9_999_999_999i64});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":-42,"b":9999999999}"#);
    }

    #[test]
    fn test_bengali_text_not_escaped() {
        let data = serde_json::json!({"Mouza": "\u{09ac}\u{09be}\u{0997}"});
        let cb = CanonicalBytes::new(&data).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert!(s.contains('\u{09ac}'));
    }

    #[test]
    fn test_empty_document() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 2);
        assert_eq!(cb.into_vec(), b"{}".to_vec());
    }
}
