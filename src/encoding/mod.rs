//! # Binary value codec
//!
//! Encodes a value graph into a compact, self-describing byte sequence and
//! back. Every value starts with a single tag byte: typed headers (tags
//! 0–23) carry a type id and 1–4 little-endian value bytes, tags 24–28 are
//! float and constant markers, and tags 29–255 are one-byte references into
//! the table of previously seen values. Repeated strings and numbers are
//! written once and referenced afterwards; tables are registered before
//! their contents so cyclic and shared structure survives the round trip.
//!
//! # Example
//!
//! ```
//! use vson::{bytes_to_value, value_to_bytes, Table, Value};
//!
//! let t = Table::new();
//! t.push(Value::from(1));
//! t.push(Value::from(2));
//!
//! let (bytes, omitted) = value_to_bytes(&Value::Table(t), &[], false).unwrap();
//! assert_eq!(omitted, 0);
//! // array of two, then the integers 1 and 2
//! assert_eq!(bytes, vec![0x08, 0x02, 0x10, 0x01, 0x10, 0x02]);
//!
//! let back = bytes_to_value(&bytes, &[]).unwrap();
//! assert_eq!(back.to_table().unwrap().get(&Value::Int(2)), Value::Int(2));
//! ```

pub(crate) mod constants;
mod de;
mod ser;

use crate::{
    errors::{DecodeError, EncodeError},
    Value,
};

/// Encodes a value graph into its binary representation.
///
/// `externals` seeds the reference table: the value at index `i` encodes as
/// a reference to id `i` wherever it appears in the graph. With
/// `omit_unsupported` set, table entries that cannot encode are dropped and
/// counted instead of failing; the count is returned next to the bytes
/// (skipped map entries count twice, once for the key and once for the
/// value).
///
/// A nil top-level value encodes as the empty byte sequence.
pub fn value_to_bytes(
    v: &Value,
    externals: &[Value],
    omit_unsupported: bool,
) -> Result<(Vec<u8>, usize), EncodeError> {
    ser::Encoder::new(externals, omit_unsupported).encode(v)
}

/// Decodes a binary representation back into a value graph.
///
/// `externals` must match the list given to the encoder in contents and
/// order; references into the external range resolve to these values. The
/// whole input must be consumed, otherwise [`DecodeError::TrailingData`] is
/// returned.
pub fn bytes_to_value(data: &[u8], externals: &[Value]) -> Result<Value, DecodeError> {
    de::Decoder::new(data, externals).decode()
}
