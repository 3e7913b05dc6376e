//! Low-level bit arithmetic and string rendering shared by registers, fields and
//! the selection translator.
//!
//! Raw bit indices are LSB-first: raw bit 0 is the least significant bit.

/// Separator inserted between 4-bit groups of a delimited binary string.
pub const DELIMITER: char = '_';

/// Number of binary digits per delimited group.
pub const GROUP_WIDTH: usize = 4;

/// Largest value representable in `bit_length` bits.
pub fn max_for(bit_length: u32) -> u64 {
    if bit_length >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bit_length) - 1
    }
}

/// Mirrors a bit index between LSB-first and MSB-first numbering. Its own inverse.
pub fn mirror(index: i64, bit_length: u32) -> i64 {
    i64::from(bit_length) - index - 1
}

/// Maps undelimited character offsets of an MSB-first binary string to raw bit indices.
///
/// `start` is the offset of the first selected character and `end` is one past the last,
/// so the returned pair is `(high bit, low bit)`.
pub fn offsets_to_bits(start: usize, end: usize, bit_length: u32) -> (i64, i64) {
    let bit_length = i64::from(bit_length);
    (bit_length - start as i64 - 1, bit_length - end as i64)
}

/// Reverses the byte order of the low `bit_length` bits of `value`.
///
/// Only 16 and 32 bit values have bytes to swap; any other width is returned unchanged.
pub fn swap_bytes(value: u64, bit_length: u32) -> u64 {
    match bit_length {
        16 => ((value >> 0x08) & 0x00FF) | ((value << 0x08) & 0xFF00),
        32 => {
            ((value >> 0x18) & 0x0000_00FF)
                | ((value >> 0x08) & 0x0000_FF00)
                | ((value << 0x08) & 0x00FF_0000)
                | ((value << 0x18) & 0xFF00_0000)
        }
        _ => value,
    }
}

/// Unsigned base-10 rendering.
pub fn format_dec(value: u64) -> String {
    format!("{value}")
}

/// Uppercase base-16 rendering without padding.
pub fn format_hex(value: u64) -> String {
    format!("{value:X}")
}

/// Binary rendering zero-padded to exactly `bit_length` digits.
pub fn format_bin(value: u64, bit_length: u32) -> String {
    format!("{:0width$b}", value, width = bit_length as usize)
}

/// Binary rendering split into 4-digit groups joined by [DELIMITER].
///
/// Groups are cut left to right over the padded string, so a width that is not a
/// multiple of four leaves the rightmost group short.
pub fn format_bin_delimited(value: u64, bit_length: u32) -> String {
    let bin = format_bin(value, bit_length);
    let mut out = String::with_capacity(bin.len() + bin.len() / GROUP_WIDTH);

    for (i, c) in bin.chars().enumerate() {
        if i != 0 && i % GROUP_WIDTH == 0 {
            out.push(DELIMITER);
        }
        out.push(c);
    }

    out
}

/// Number of delimiters [format_bin_delimited] inserts for `bit_length` digits.
pub fn delimiter_count(bit_length: u32) -> usize {
    (bit_length as usize).saturating_sub(1) / GROUP_WIDTH
}
