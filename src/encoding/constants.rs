/// Type ids carried in the high six bits of a multi-byte header tag.
pub(crate) const TYPE_REF: u8 = 0;
pub(crate) const TYPE_MAP: u8 = 1;
pub(crate) const TYPE_ARR: u8 = 2;
pub(crate) const TYPE_STR: u8 = 3;
pub(crate) const TYPE_POS: u8 = 4;
pub(crate) const TYPE_NEG: u8 = 5;

/// Single-precision float marker, followed by 4 little-endian bytes.
pub(crate) const TAG_SINGLE: u8 = 24;
/// Double-precision float marker, followed by 8 little-endian bytes.
pub(crate) const TAG_DOUBLE: u8 = 25;
/// Boolean true.
pub(crate) const TAG_TRUE: u8 = 26;
/// Boolean false.
pub(crate) const TAG_FALSE: u8 = 27;
/// Not-a-number.
pub(crate) const TAG_NAN: u8 = 28;
/// First of the one-byte reference tags; 29..=255 cover references 0..=226.
pub(crate) const TAG_REF: u8 = 29;

/// First reference id that needs a multi-byte header.
pub(crate) const REF_BASE: u64 = 227;

/// Largest header value each trailing-byte count can carry.
pub(crate) const HEADER_MAX: [u64; 4] = [0xFF, 0x1_00FF, 0x100_FFFF, 0x1_00FF_FFFF];

/// Range reclaimed when the final length byte decodes as zero.
pub(crate) const EXTENDED_OFFSET: [u64; 4] = [0, 0x1_0000, 0x100_0000, 0x1_0000_0000];

/// Ceiling on any header value: integer magnitudes, lengths, counts, ids.
pub(crate) const MAX_HEADER_VALUE: u64 = 0x1_00FF_FFFF;

/// Integer magnitude bound; larger integers travel as floats.
pub(crate) const MAX_INT: i64 = MAX_HEADER_VALUE as i64;
