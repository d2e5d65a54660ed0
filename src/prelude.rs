pub use crate::{
    bytes_to_r85, bytes_to_value, decode_value, decrypt_bytes, decrypt_string, encode_value,
    encrypt_bytes, encrypt_string, r85_to_bytes, value_to_bytes, Bytes, Error, Float, Opaque,
    Table, Value,
};
