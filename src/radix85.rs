//! # Radix-85 transport
//!
//! Maps arbitrary byte sequences onto an 85-character printable alphabet.
//! Input bytes are packed into little-endian 32-bit blocks and written as
//! five base-85 digits each, least-significant digit first. Up to six blocks
//! that repeat often enough earn a slot in a compression dictionary and are
//! emitted as a single byte from a separate six-symbol alphabet.
//!
//! The first output character is a header digit encoding both the zero
//! padding of the last block and the dictionary size; trailing zero digits
//! of the last block are dropped (at most four) since the header lets the
//! decoder rebuild them.
//!
//! # Example
//!
//! ```
//! use vson::{bytes_to_r85, r85_to_bytes};
//!
//! let transport = bytes_to_r85(&[0x1A]);
//! assert_eq!(transport, "@q");
//! assert_eq!(r85_to_bytes(&transport).unwrap(), vec![0x1A]);
//! ```

use crate::errors::TransportError;
use hashbrown::HashMap;
use smallvec::SmallVec;

/// The 85 transport digits, in value order.
pub(crate) const ALPHABET: &[u8; 85] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#";

/// The six dictionary symbols, in slot order. Disjoint from the digits.
pub(crate) const COMPRESSION: &[u8; 6] = b",;_`|~";

/// Most dictionary slots a header can declare.
const MAX_DICT: usize = 6;

const INVALID: u8 = 0xFF;

const DIGIT_VALUE: [u8; 256] = digit_table();

const fn digit_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

fn digit_value(byte: u8) -> Option<u64> {
    match DIGIT_VALUE[byte as usize] {
        INVALID => None,
        digit => Some(digit as u64),
    }
}

fn compression_slot(byte: u8) -> Option<usize> {
    COMPRESSION.iter().position(|&c| c == byte)
}

/// Encodes bytes into the printable transport form.
///
/// The empty sequence maps to the empty string.
pub fn bytes_to_r85(data: &[u8]) -> String {
    if data.is_empty() {
        return String::new();
    }
    let discard = (4 - data.len() % 4) % 4;
    let blocks = to_blocks(data);
    let dict = build_dictionary(&blocks);

    let mut out = String::with_capacity(1 + 5 * (dict.len() + blocks.len()));
    out.push(ALPHABET[84 - (discard + 4 * dict.len())] as char);
    for &block in &dict {
        push_digits(&mut out, block);
    }
    for &block in &blocks {
        match dict.iter().position(|&d| d == block) {
            Some(slot) => out.push(COMPRESSION[slot] as char),
            None => push_digits(&mut out, block),
        }
    }
    trim_zeros(&mut out);
    out
}

/// Decodes the printable transport form back into bytes.
pub fn r85_to_bytes(transport: &str) -> Result<Vec<u8>, TransportError> {
    let input = transport.as_bytes();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let header = match digit_value(input[0]) {
        Some(digit) => (84 - digit) as usize,
        None => return Err(TransportError::InvalidByte(input[0])),
    };
    let discard = header % 4;
    let slots = header / 4;
    if slots > MAX_DICT {
        return Err(TransportError::InvalidHeader(slots));
    }

    let mut pos = 1;
    let mut dict: SmallVec<[u32; 6]> = SmallVec::new();
    for _ in 0..slots {
        dict.push(read_block(input, &mut pos)?);
    }

    let mut out = Vec::with_capacity(4 * (input.len() / 5 + 1));
    while pos < input.len() {
        let byte = input[pos];
        let block = match compression_slot(byte) {
            Some(slot) => {
                pos += 1;
                *dict.get(slot).ok_or(TransportError::InvalidByte(byte))?
            }
            None => read_block(input, &mut pos)?,
        };
        out.extend_from_slice(&block.to_le_bytes());
    }
    out.truncate(out.len().saturating_sub(discard));
    Ok(out)
}

fn to_blocks(data: &[u8]) -> Vec<u32> {
    data.chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect()
}

fn push_digits(out: &mut String, block: u32) {
    let mut rest = block as u64;
    for _ in 0..5 {
        out.push(ALPHABET[(rest % 85) as usize] as char);
        rest /= 85;
    }
}

/// Reads one 5-digit block. Digits trimmed off the end of the input read as
/// zero.
fn read_block(input: &[u8], pos: &mut usize) -> Result<u32, TransportError> {
    let mut value: u64 = 0;
    let mut scale: u64 = 1;
    for offset in 0..5 {
        if let Some(&byte) = input.get(*pos + offset) {
            let digit = digit_value(byte).ok_or(TransportError::InvalidByte(byte))?;
            value += digit * scale;
        }
        scale *= 85;
    }
    *pos += 5;
    Ok((value & 0xFFFF_FFFF) as u32)
}

/// Up to four trailing zero digits are implicit; the header's padding count
/// lets the decoder rebuild them. Compression symbols are never the zero
/// digit, so a compressed final block always stops the trim.
fn trim_zeros(out: &mut String) {
    let zero = ALPHABET[0] as char;
    let mut trimmed = 0;
    while trimmed < 4 && out.ends_with(zero) {
        out.pop();
        trimmed += 1;
    }
}

/// Adaptive frequency scan over all blocks. A block earns a slot once its
/// count clears the threshold; when all six slots are taken the cheapest
/// entry is evicted and the bar rises to the runner-up's count.
fn build_dictionary(blocks: &[u32]) -> SmallVec<[u32; 6]> {
    let mut counts: HashMap<u32, u32> = HashMap::new();
    let mut dict: SmallVec<[u32; 6]> = SmallVec::new();
    let mut threshold = 1;
    for &block in blocks {
        let count = {
            let entry = counts.entry(block).or_insert(0);
            *entry += 1;
            *entry
        };
        if count > threshold && !dict.contains(&block) {
            dict.push(block);
            if dict.len() > MAX_DICT {
                dict.sort_by_key(|b| counts[b]);
                threshold = counts[&dict[1]];
                dict.remove(0);
            }
        }
    }
    dict
}
