use super::constants::*;
use crate::{
    errors::EncodeError,
    refs::{header_len, reduce_extended, ref_cost, RefKey},
    table::Table,
    Value,
};
use bytes::Bytes;
use hashbrown::HashMap;

/// Streaming encoder for one value graph.
///
/// Owns the output buffer and the reference table for the duration of a
/// single call; neither outlives it.
pub(crate) struct Encoder {
    out: Vec<u8>,
    refs: HashMap<RefKey, u64>,
    next_id: u64,
    omit_unsupported: bool,
    omitted: usize,
}

impl Encoder {
    /// Seeds the reference table with the externals. Every slot advances the
    /// id cursor, including nil placeholders, so both ends agree on where
    /// internal ids start.
    pub(crate) fn new(externals: &[Value], omit_unsupported: bool) -> Encoder {
        let mut refs = HashMap::with_capacity(externals.len());
        for (id, v) in externals.iter().enumerate() {
            if let Some(key) = RefKey::of(v) {
                // first occurrence wins for duplicated externals
                refs.entry(key).or_insert(id as u64);
            }
        }
        Encoder {
            out: Vec::new(),
            refs,
            next_id: externals.len() as u64,
            omit_unsupported,
            omitted: 0,
        }
    }

    pub(crate) fn encode(mut self, v: &Value) -> Result<(Vec<u8>, usize), EncodeError> {
        // a top-level nil is the empty byte sequence
        if v.is_nil() {
            return Ok((self.out, self.omitted));
        }
        if !self.is_encodable(v) {
            if self.omit_unsupported {
                self.omitted += 1;
                return Ok((self.out, self.omitted));
            }
            return Err(EncodeError::UnsupportedType(v.type_name()));
        }
        self.put_value(v)?;
        Ok((self.out, self.omitted))
    }

    /// A value can be written when its type has a wire form, or when the
    /// externals seeded a reference for it.
    fn is_encodable(&self, v: &Value) -> bool {
        match v {
            Value::Nil => false,
            Value::Opaque(_) => match RefKey::of(v) {
                Some(key) => self.refs.contains_key(&key),
                None => false,
            },
            _ => true,
        }
    }

    fn put_value(&mut self, v: &Value) -> Result<(), EncodeError> {
        if let Some(key) = RefKey::of(v) {
            if let Some(&id) = self.refs.get(&key) {
                return self.put_ref(id);
            }
        }
        match v {
            Value::Nil | Value::Opaque(_) => Err(EncodeError::UnsupportedType(v.type_name())),
            Value::Bool(true) => {
                self.out.push(TAG_TRUE);
                Ok(())
            }
            Value::Bool(false) => {
                self.out.push(TAG_FALSE);
                Ok(())
            }
            Value::Int(i) => self.put_number(*i as f64),
            Value::Float(f) => self.put_number(f.to_f64()),
            Value::Str(s) => self.put_str(s),
            Value::Table(t) => self.put_table(t),
        }
    }

    fn put_number(&mut self, n: f64) -> Result<(), EncodeError> {
        if n.is_nan() {
            self.out.push(TAG_NAN);
            return Ok(());
        }
        let start = self.out.len();
        let negative_zero = n == 0.0 && n.is_sign_negative();
        if negative_zero {
            // magnitude zero under the negative type carries the sign
            self.put_header(TYPE_NEG, 0)?;
        } else if n.is_finite() && n == n.trunc() && n.abs() <= MAX_INT as f64 {
            if n < 0.0 {
                self.put_header(TYPE_NEG, -n as u64)?;
            } else {
                self.put_header(TYPE_POS, n as u64)?;
            }
        } else if (n as f32) as f64 == n {
            self.out.push(TAG_SINGLE);
            self.out.extend_from_slice(&(n as f32).to_le_bytes());
        } else {
            self.out.push(TAG_DOUBLE);
            self.out.extend_from_slice(&n.to_le_bytes());
        }
        self.register(RefKey::Num(n.to_bits()), start);
        Ok(())
    }

    fn put_str(&mut self, s: &Bytes) -> Result<(), EncodeError> {
        let start = self.out.len();
        self.put_header(TYPE_STR, s.len() as u64)?;
        self.out.extend_from_slice(s);
        self.register(RefKey::Str(s.clone()), start);
        Ok(())
    }

    fn put_table(&mut self, t: &Table) -> Result<(), EncodeError> {
        // the id is assigned before descent so cycles resolve to it
        self.refs.insert(RefKey::Table(t.address()), self.next_id);
        self.next_id += 1;

        let entries = t.pairs();
        if let Some(values) = as_array(&entries) {
            let mut writable = Vec::with_capacity(values.len());
            for v in values {
                if self.is_encodable(v) {
                    writable.push(v);
                } else if self.omit_unsupported {
                    self.omitted += 1;
                } else {
                    return Err(EncodeError::UnsupportedType(v.type_name()));
                }
            }
            self.put_header(TYPE_ARR, writable.len() as u64)?;
            for v in writable {
                self.put_value(v)?;
            }
        } else {
            let mut writable = Vec::with_capacity(entries.len());
            for (k, v) in &entries {
                if self.is_encodable(k) && self.is_encodable(v) {
                    writable.push((k, v));
                } else if self.omit_unsupported {
                    // a skipped pair drops both a key and a value
                    self.omitted += 2;
                } else {
                    let bad = if self.is_encodable(k) { v } else { k };
                    return Err(EncodeError::UnsupportedType(bad.type_name()));
                }
            }
            self.put_header(TYPE_MAP, writable.len() as u64)?;
            for (k, v) in writable {
                self.put_value(k)?;
                self.put_value(v)?;
            }
        }
        Ok(())
    }

    fn put_ref(&mut self, id: u64) -> Result<(), EncodeError> {
        if id < REF_BASE {
            self.out.push(TAG_REF + id as u8);
            Ok(())
        } else {
            self.put_header(TYPE_REF, id - REF_BASE)
        }
    }

    /// Writes a typed tag plus 1–4 little-endian value bytes, choosing the
    /// narrowest width and storing extended-range values reduced so their
    /// final byte is zero.
    fn put_header(&mut self, type_id: u8, value: u64) -> Result<(), EncodeError> {
        let len = header_len(value).ok_or(EncodeError::OutOfRange(value))?;
        let reduced = reduce_extended(value, len);
        self.out.push(type_id << 2 | (len as u8 - 1));
        self.out.extend_from_slice(&reduced.to_le_bytes()[..len]);
        Ok(())
    }

    /// Economy rule: assign the next id only when a future reference would
    /// be strictly cheaper than the bytes just written.
    fn register(&mut self, key: RefKey, start: usize) {
        let consumed = self.out.len() - start;
        if consumed > ref_cost(self.next_id) {
            self.refs.insert(key, self.next_id);
            self.next_id += 1;
        }
    }
}

/// Dense-array check: the keys must be exactly the integers `1..=n` with no
/// duplicates. Returns the values in ascending key order.
fn as_array(entries: &[(Value, Value)]) -> Option<Vec<&Value>> {
    let n = entries.len();
    let mut slots: Vec<Option<&Value>> = vec![None; n];
    for (k, v) in entries {
        let i = match k {
            Value::Int(i) if *i >= 1 && *i <= n as i64 => (*i - 1) as usize,
            _ => return None,
        };
        if slots[i].is_some() {
            return None;
        }
        slots[i] = Some(v);
    }
    Some(slots.into_iter().flatten().collect())
}
