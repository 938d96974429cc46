//! # Content Digests
//!
//! SHA-256 over canonical bytes. The in-memory ledger derives transaction
//! identifiers this way.
//!
//! Only `&CanonicalBytes` can be hashed, so two peers hashing the same
//! logical value always agree.

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Lowercase hex SHA-256 of canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    Sha256::digest(data.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_format() {
        let cb = CanonicalBytes::new(&serde_json::json!({"AssetID": "12x"})).unwrap();
        let hex = sha256_hex(&cb);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_vector_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_hex(&cb),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_key_order_does_not_change_digest() {
        let a = CanonicalBytes::new(&serde_json::json!({"x": 1, "y": 2})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"y": 2, "x": 1})).unwrap();
        assert_eq!(sha256_hex(&a), sha256_hex(&b));
    }
}
