use thiserror::Error;

/// Errors produced while encoding a value graph into bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A header value (integer magnitude, length, count, or reference id)
    /// exceeds the 4,311,744,511 ceiling.
    #[error("value {0} does not fit in a header")]
    OutOfRange(u64),
    /// The encoder met a value that has no wire form and was not substituted
    /// through the externals list.
    #[error("cannot encode a value of type `{0}`")]
    UnsupportedType(&'static str),
}

/// Errors produced while decoding bytes back into a value graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ended in the middle of a value.
    #[error("input ended while reading {0}")]
    Truncated(&'static str),
    /// A reference pointed past the end of the entry list.
    #[error("reference {0} has not been assigned")]
    UnassignedReference(u64),
    /// The top-level value ended before the input did.
    #[error("{0} trailing bytes after the top-level value")]
    TrailingData(usize),
}

/// Errors produced by the radix-85 transport decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// A byte that is neither a radix-85 digit nor an assigned compression
    /// slot.
    #[error("byte 0x{0:02x} is not a radix-85 digit or an assigned compression slot")]
    InvalidByte(u8),
    /// The header digit declared more dictionary slots than exist.
    #[error("header declares {0} compression blocks, at most 6 are possible")]
    InvalidHeader(usize),
}

/// Errors produced by the obfuscation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Keys must carry at least one byte.
    #[error("cipher key must not be empty")]
    EmptyKey,
    /// The ciphertext is shorter than any output the key could produce.
    #[error("ciphertext of {len} bytes is shorter than the {min} bytes the key implies")]
    ShortCiphertext {
        /// Length of the rejected ciphertext.
        len: usize,
        /// Minimum length a ciphertext under this key can have.
        min: usize,
    },
}

/// Any failure from the composed string-level entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
}
