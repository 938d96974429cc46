//! # Digest Vectors
//!
//! Fixed inputs with their expected canonical bytes and SHA-256 digests.
//! Peers that hash the same logical value must agree, so these vectors pin
//! the encoding down independently of the in-crate unit tests.

use landreg_core::{sha256_hex, CanonicalBytes};
use serde_json::json;

fn canonical(value: &serde_json::Value) -> String {
    let cb = CanonicalBytes::new(value).expect("canonicalization should succeed");
    String::from_utf8(cb.into_vec()).expect("canonical bytes are UTF-8")
}

fn digest(value: &serde_json::Value) -> String {
    sha256_hex(&CanonicalBytes::new(value).expect("canonicalization should succeed"))
}

#[test]
fn empty_object() {
    let v = json!({});
    assert_eq!(canonical(&v), "{}");
    assert_eq!(
        digest(&v),
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    );
}

#[test]
fn empty_array() {
    assert_eq!(
        digest(&json!([])),
        "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
    );
}

#[test]
fn keys_are_sorted_before_hashing() {
    let v = json!({"b": 2, "a": 1});
    assert_eq!(canonical(&v), r#"{"a":1,"b":2}"#);
    assert_eq!(
        digest(&v),
        "43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777"
    );
}

#[test]
fn non_ascii_text_is_not_escaped() {
    let v = json!({"name": "ঢাকা"});
    assert_eq!(canonical(&v), "{\"name\":\"ঢাকা\"}");
    assert_eq!(
        digest(&v),
        "062df62781d997f4634efc25bed8344a295250d3c2b945f7ab0f062459d80a86"
    );
}
