//! Parsing of user-entered hexadecimal, decimal and binary text.
//!
//! The rules mirror what an entry widget accepts: empty text is zero, the text may be no
//! wider than the container's widest value, and the value may not exceed its maximum.

use crate::{
    bits::{self, DELIMITER},
    container::BitContainer,
    errors::ParseError,
};

/// Number base of a text view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Dec,
    Hex,
    Bin,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Dec => 10,
            Radix::Hex => 16,
            Radix::Bin => 2,
        }
    }

    fn accepts(self, c: char) -> bool {
        match self {
            Radix::Dec => c.is_ascii_digit(),
            Radix::Hex => c.is_ascii_hexdigit(),
            Radix::Bin => c == '0' || c == '1' || c == DELIMITER,
        }
    }

    /// Longest text accepted for `container`.
    pub fn max_width<C: BitContainer + ?Sized>(self, container: &C, delimited: bool) -> usize {
        match self {
            Radix::Dec => container.max_dec_width(),
            Radix::Hex => container.max_hex_width(),
            Radix::Bin if delimited => {
                container.max_bin_width() + bits::delimiter_count(container.bit_length())
            }
            Radix::Bin => container.max_bin_width(),
        }
    }
}

/// Parses `text` in `radix` as a value for `container`.
pub fn parse_value<C: BitContainer + ?Sized>(
    radix: Radix,
    text: &str,
    container: &C,
) -> Result<u64, ParseError> {
    if let Some(c) = text.chars().find(|&c| !radix.accepts(c)) {
        return Err(ParseError::InvalidDigit(c));
    }

    let len = text.chars().count();
    let max = radix.max_width(container, text.contains(DELIMITER));
    if len > max {
        return Err(ParseError::TooLong { len, max });
    }

    let digits: String = text.chars().filter(|&c| c != DELIMITER).collect();
    if digits.is_empty() {
        return Ok(0);
    }

    let value = u64::from_str_radix(&digits, radix.base()).map_err(|_| ParseError::Overflow)?;
    if value > container.max() {
        return Err(ParseError::Overflow);
    }

    Ok(value)
}
