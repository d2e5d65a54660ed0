//! # vson
//!
//! A self-describing binary codec for small dynamic value graphs — nil,
//! booleans, numbers, byte strings, and possibly-cyclic tables — with a
//! printable radix-85 transport and an optional keyed obfuscation pass:
//!
//! ```text
//! value graph → binary codec → [cipher] → radix-85 → ASCII string
//! ```
//!
//! Repeated values are deduplicated through a reference table, shared and
//! cyclic tables survive the round trip, and callers can substitute opaque
//! host objects by identity through the externals channel.
//!
//! # Example
//!
//! ```
//! use vson::{decode_value, encode_value, Table, Value};
//!
//! let t = Table::new();
//! t.set("name".into(), "vson".into());
//! t.set("version".into(), 1.into());
//!
//! let (transport, omitted) = encode_value(&Value::Table(t), &[], None, false).unwrap();
//! assert_eq!(omitted, 0);
//!
//! let back = decode_value(&transport, &[], None).unwrap();
//! assert_eq!(back.to_table().unwrap().get(&"version".into()), Value::Int(1));
//! ```
//!
//! With a key, the byte stage is obfuscated before transport:
//!
//! ```
//! use vson::{decode_value, encode_value, Value};
//!
//! let (transport, _) = encode_value(&Value::from(42), &[], Some(b"secret"), false).unwrap();
//! assert_eq!(decode_value(&transport, &[], Some(b"secret")).unwrap(), Value::Int(42));
//! ```

pub mod cipher;
pub mod encoding;
mod errors;
pub mod float;
pub mod prelude;
pub mod radix85;
mod refs;
pub mod table;
mod util;

pub use bytes::Bytes;
pub use cipher::{decrypt_bytes, decrypt_string, encrypt_bytes, encrypt_string};
pub use encoding::{bytes_to_value, value_to_bytes};
pub use errors::{CipherError, DecodeError, EncodeError, Error, TransportError};
pub use float::Float;
pub use radix85::{bytes_to_r85, r85_to_bytes};
pub use table::Table;

use encoding::constants::MAX_INT;
use float::classify;
use std::{any::Any, fmt, rc::Rc};

/// The dynamic values the codec understands.
#[derive(Clone, Debug)]
pub enum Value {
    /// The absent value. It has no wire form of its own: a nil top-level
    /// value encodes as the empty sequence, and tables cannot hold nil.
    Nil,
    /// Boolean.
    Bool(bool),
    /// Integer with |v| ≤ 4,311,744,511; larger magnitudes travel as floats.
    Int(i64),
    /// Floating point number, stored as bits.
    Float(Float),
    /// Byte string.
    Str(Bytes),
    /// Shared, possibly cyclic container.
    Table(Table),
    /// Opaque host object; crosses the codec only through the externals
    /// channel.
    Opaque(Opaque),
}

impl Value {
    /// Indicates whether the value is nil.
    pub fn is_nil(&self) -> bool { matches!(self, Value::Nil) }

    /// The value as a bool, if it is one.
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an integer, if it is one.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Any numeric value widened to an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(f.to_f64()),
            _ => None,
        }
    }

    /// The value as a byte string, if it is one.
    pub fn to_str(&self) -> Option<&Bytes> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a table handle, if it is one.
    pub fn to_table(&self) -> Option<Table> {
        match self {
            Value::Table(t) => Some(t.clone()),
            _ => None,
        }
    }

    /// Host-facing name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::Float(_) => "number",
            Value::Str(_) => "string",
            Value::Table(_) => "table",
            Value::Opaque(_) => "opaque",
        }
    }

    /// Structural equality across whole graphs, tolerant of cycles.
    ///
    /// Unlike `==`, tables compare by shape (entry for entry, in insertion
    /// order) rather than by identity, and numbers compare by exact
    /// representation rather than numerically. A decoded graph compares
    /// `deep_eq` to its canonically-constructed original.
    pub fn deep_eq(&self, other: &Value) -> bool {
        fn go(a: &Value, b: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
            match (a, b) {
                (Value::Table(x), Value::Table(y)) => {
                    if x.ptr_eq(y) {
                        return true;
                    }
                    let pair = (x.address(), y.address());
                    if seen.contains(&pair) {
                        // already comparing this pair further up the stack
                        return true;
                    }
                    seen.push(pair);
                    let xs = x.pairs();
                    let ys = y.pairs();
                    xs.len() == ys.len()
                        && xs
                            .iter()
                            .zip(&ys)
                            .all(|((ka, va), (kb, vb))| go(ka, kb, seen) && go(va, vb, seen))
                }
                (Value::Int(i), Value::Int(j)) => i == j,
                (Value::Float(f), Value::Float(g)) => f == g,
                (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_)) => false,
                _ => a == b,
            }
        }
        go(self, other, &mut Vec::new())
    }
}

impl PartialEq for Value {
    /// Host equality: numbers compare numerically (an integer equals the
    /// float of the same value), strings by contents, tables and opaque
    /// handles by identity.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => {
                a.to_f64().to_bits() == b.to_f64().to_bits()
            }
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == b.to_f64()
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a.ptr_eq(b),
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

/// An opaque host object carried by identity.
///
/// Opaque values have no wire form; they cross the codec only when listed in
/// the externals of both the encoder and the decoder (see [`encode_value`]).
/// Cloning clones the handle, and equality is handle identity.
#[derive(Clone)]
pub struct Opaque(Rc<dyn Any>);

impl Opaque {
    /// Wraps a host object.
    pub fn new<T: 'static>(value: T) -> Opaque { Opaque(Rc::new(value)) }

    /// Borrows the wrapped object, if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> { self.0.downcast_ref() }

    pub(crate) fn address(&self) -> usize { Rc::as_ptr(&self.0) as *const () as usize }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Opaque) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl Eq for Opaque {}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Opaque({:#x})", self.address())
    }
}

// scalars
from_fn!(Value, bool, Value::Bool);
from_fn!(Value, f64, classify);
from_fn!(Value, f32, |f: f32| classify(f as f64));
from_fn!(Value, Float, Value::Float);

from_fn!(Value, i64, |i: i64| {
    if i.unsigned_abs() <= MAX_INT as u64 {
        Value::Int(i)
    } else {
        classify(i as f64)
    }
});
from_fn!(Value, u64, |u: u64| {
    if u <= MAX_INT as u64 {
        Value::Int(u as i64)
    } else {
        classify(u as f64)
    }
});
compose_from!(Value, i64, i8);
compose_from!(Value, i64, i16);
compose_from!(Value, i64, i32);
compose_from!(Value, i64, u8);
compose_from!(Value, i64, u16);
compose_from!(Value, i64, u32);
from_fn!(Value, isize, |i: isize| Value::from(i as i64));
from_fn!(Value, usize, |u: usize| Value::from(u as u64));

// strings
from_fn!(Value, Bytes, Value::Str);
from_fn!(Value, &str, |s: &str| Value::Str(Bytes::copy_from_slice(
    s.as_bytes()
)));
from_fn!(Value, String, |s: String| Value::Str(Bytes::from(s)));
from_fn!(Value, &[u8], |b: &[u8]| Value::Str(Bytes::copy_from_slice(b)));
from_fn!(Value, Vec<u8>, |b: Vec<u8>| Value::Str(Bytes::from(b)));

// containers
from_fn!(Value, Table, Value::Table);
from_fn!(Value, Opaque, Value::Opaque);
from_fn!(Value, Vec<Value>, |v: Vec<Value>| Value::Table(Table::from(v)));

/// Encodes a value graph all the way to the printable transport form.
///
/// `externals` seeds the reference table on both ends: the value at index
/// `i` encodes as a reference wherever it appears in the graph, which is how
/// opaque host objects cross the codec. `crypt_key` enables the obfuscation
/// pass. With `omit_unsupported` set, entries that cannot encode are dropped
/// and counted instead of failing; the count is returned next to the
/// transport string.
///
/// # Example
///
/// ```
/// use vson::{encode_value, Value};
///
/// let (transport, _) = encode_value(&Value::Nil, &[], None, false).unwrap();
/// assert_eq!(transport, "");
/// ```
pub fn encode_value(
    v: &Value,
    externals: &[Value],
    crypt_key: Option<&[u8]>,
    omit_unsupported: bool,
) -> Result<(String, usize), Error> {
    let (mut bytes, omitted) = value_to_bytes(v, externals, omit_unsupported)?;
    if let Some(key) = crypt_key {
        cipher::encrypt_bytes(&mut bytes, key)?;
    }
    Ok((radix85::bytes_to_r85(&bytes), omitted))
}

/// Decodes a transport string produced by [`encode_value`].
///
/// `externals` and `crypt_key` must match the encoding call.
///
/// # Example
///
/// ```
/// use vson::{decode_value, Value};
///
/// assert_eq!(decode_value("", &[], None).unwrap(), Value::Nil);
/// ```
pub fn decode_value(
    transport: &str,
    externals: &[Value],
    crypt_key: Option<&[u8]>,
) -> Result<Value, Error> {
    let mut bytes = radix85::r85_to_bytes(transport)?;
    if let Some(key) = crypt_key {
        cipher::decrypt_bytes(&mut bytes, key)?;
    }
    Ok(bytes_to_value(&bytes, externals)?)
}
