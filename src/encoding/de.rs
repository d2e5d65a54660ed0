use super::constants::*;
use crate::{errors::DecodeError, refs::ref_cost, table::Table, Float, Value};
use bytes::{Buf, Bytes};

/// Streaming decoder for one byte sequence.
///
/// The entry list doubles as the reference table: the externals occupy the
/// first slots, and decoded values that pass the economy rule are appended
/// in the same order the encoder assigned their ids.
pub(crate) struct Decoder<B> {
    data: B,
    entries: Vec<Value>,
}

impl<B: Buf> Decoder<B> {
    pub(crate) fn new(data: B, externals: &[Value]) -> Decoder<B> {
        Decoder {
            data,
            entries: externals.to_vec(),
        }
    }

    pub(crate) fn decode(mut self) -> Result<Value, DecodeError> {
        // the empty byte sequence is a top-level nil
        if !self.data.has_remaining() {
            return Ok(Value::Nil);
        }
        let value = self.take_value()?;
        if self.data.has_remaining() {
            return Err(DecodeError::TrailingData(self.data.remaining()));
        }
        Ok(value)
    }

    fn take_value(&mut self) -> Result<Value, DecodeError> {
        let before = self.data.remaining();
        let tag = self.take_u8("a value tag")?;
        match tag {
            0x00..=0x03 => {
                let id = self.take_header_value(tag)? + REF_BASE;
                self.lookup(id)
            }
            0x04..=0x07 => {
                let len = self.take_header_value(tag)?;
                self.take_map(len)
            }
            0x08..=0x0B => {
                let len = self.take_header_value(tag)?;
                self.take_array(len)
            }
            0x0C..=0x0F => {
                let len = self.take_header_value(tag)?;
                let value = Value::Str(self.take_bytes(len)?);
                self.consider(&value, before);
                Ok(value)
            }
            0x10..=0x13 => {
                let value = Value::Int(self.take_header_value(tag)? as i64);
                self.consider(&value, before);
                Ok(value)
            }
            0x14..=0x17 => {
                let magnitude = self.take_header_value(tag)?;
                let value = if magnitude == 0 {
                    // the negative type with magnitude zero is IEEE −0.0
                    Value::Float(Float::Single((-0.0f32).to_bits()))
                } else {
                    Value::Int(-(magnitude as i64))
                };
                self.consider(&value, before);
                Ok(value)
            }
            TAG_SINGLE => {
                let bits = self.take_u32("a single-precision float")?;
                let value = if f32::from_bits(bits).is_nan() {
                    Value::Float(Float::NAN)
                } else {
                    Value::Float(Float::Single(bits))
                };
                self.consider(&value, before);
                Ok(value)
            }
            TAG_DOUBLE => {
                let bits = self.take_u64("a double-precision float")?;
                let value = if f64::from_bits(bits).is_nan() {
                    Value::Float(Float::NAN)
                } else {
                    Value::Float(Float::Double(bits))
                };
                self.consider(&value, before);
                Ok(value)
            }
            TAG_TRUE => Ok(Value::Bool(true)),
            TAG_FALSE => Ok(Value::Bool(false)),
            TAG_NAN => Ok(Value::Float(Float::NAN)),
            _ => self.lookup((tag - TAG_REF) as u64),
        }
    }

    /// Reads the 1–4 little-endian bytes after a typed tag. A zero in the
    /// final position of a multi-byte header stands for the extended range.
    fn take_header_value(&mut self, tag: u8) -> Result<u64, DecodeError> {
        let len = (tag & 3) as usize + 1;
        if self.data.remaining() < len {
            return Err(DecodeError::Truncated("a header value"));
        }
        let mut raw = [0u8; 4];
        self.data.copy_to_slice(&mut raw[..len]);
        let mut value = u32::from_le_bytes(raw) as u64;
        if len > 1 && raw[len - 1] == 0 {
            value += EXTENDED_OFFSET[len - 1];
        }
        Ok(value)
    }

    fn take_array(&mut self, len: u64) -> Result<Value, DecodeError> {
        let table = Table::new();
        // registered before recursion so inner references can reach it
        self.entries.push(Value::Table(table.clone()));
        for _ in 0..len {
            let v = self.take_value()?;
            table.push(v);
        }
        Ok(Value::Table(table))
    }

    fn take_map(&mut self, len: u64) -> Result<Value, DecodeError> {
        let table = Table::new();
        self.entries.push(Value::Table(table.clone()));
        for _ in 0..len {
            let k = self.take_value()?;
            let v = self.take_value()?;
            table.set(k, v);
        }
        Ok(Value::Table(table))
    }

    fn lookup(&self, id: u64) -> Result<Value, DecodeError> {
        self.entries
            .get(id as usize)
            .cloned()
            .ok_or(DecodeError::UnassignedReference(id))
    }

    /// Economy rule, mirrored from the encoder: keep the value for future
    /// references only when re-encoding it would cost more than a reference.
    fn consider(&mut self, value: &Value, before: usize) {
        let consumed = before - self.data.remaining();
        if consumed > ref_cost(self.entries.len() as u64) {
            self.entries.push(value.clone());
        }
    }

    fn take_u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        if self.data.has_remaining() {
            Ok(self.data.get_u8())
        } else {
            Err(DecodeError::Truncated(what))
        }
    }

    fn take_u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        if self.data.remaining() >= 4 {
            Ok(self.data.get_u32_le())
        } else {
            Err(DecodeError::Truncated(what))
        }
    }

    fn take_u64(&mut self, what: &'static str) -> Result<u64, DecodeError> {
        if self.data.remaining() >= 8 {
            Ok(self.data.get_u64_le())
        } else {
            Err(DecodeError::Truncated(what))
        }
    }

    /// Length-checked before any allocation sized by the header.
    fn take_bytes(&mut self, len: u64) -> Result<Bytes, DecodeError> {
        if (self.data.remaining() as u64) < len {
            return Err(DecodeError::Truncated("string contents"));
        }
        Ok(self.data.copy_to_bytes(len as usize))
    }
}
