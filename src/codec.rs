//! Conversion of raw entry bytes to text.
//!
//! Keys are always decoded lossily. Values are kept as text when they are
//! valid UTF-8 and otherwise carried as base64, with the variant recording
//! which of the two happened.

use std::fmt::{self, Write as _};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Serialize, Serializer};

use crate::types::Entry;

/// A value decoded for display, tagged with the representation used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodedValue {
    /// The raw bytes were valid UTF-8.
    Text(String),
    /// The raw bytes were not valid UTF-8; holds their base64 encoding.
    Binary(String),
}

impl DecodedValue {
    pub fn as_str(&self) -> &str {
        match self {
            DecodedValue::Text(text) | DecodedValue::Binary(text) => text,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, DecodedValue::Binary(_))
    }

    /// Name of the representation, as used in tagged exports.
    pub fn encoding(&self) -> &'static str {
        match self {
            DecodedValue::Text(_) => "utf8",
            DecodedValue::Binary(_) => "base64",
        }
    }

    /// Length in characters of the rendered string.
    pub fn char_len(&self) -> usize {
        self.as_str().chars().count()
    }

    /// Recovers the original bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        match self {
            DecodedValue::Text(text) => Ok(text.as_bytes().to_vec()),
            DecodedValue::Binary(encoded) => BASE64.decode(encoded),
        }
    }
}

impl From<&str> for DecodedValue {
    fn from(text: &str) -> Self {
        DecodedValue::Text(text.to_string())
    }
}

impl From<String> for DecodedValue {
    fn from(text: String) -> Self {
        DecodedValue::Text(text)
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Decodes a key, replacing invalid sequences with U+FFFD.
pub fn decode_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

pub fn decode_value(value: Vec<u8>) -> DecodedValue {
    match String::from_utf8(value) {
        Ok(text) => DecodedValue::Text(text),
        Err(err) => DecodedValue::Binary(BASE64.encode(err.into_bytes())),
    }
}

pub fn decode_entry(entry: Entry) -> (String, DecodedValue) {
    (decode_key(&entry.key), decode_value(entry.value))
}

/// Lowercase hex rendering used for root hashes.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}
