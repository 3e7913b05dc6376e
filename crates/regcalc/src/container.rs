//! Behaviour shared by registers and fields: width-derived limits and multi-base rendering.

use crate::{bits, errors::AccessError, parse::Radix};

/// Anything that holds an unsigned value of a known bit length.
///
/// [crate::register::Register] always has a value; a [crate::field::Field] may fail to
/// read once its register shrinks, which is why [BitContainer::read] is fallible.
pub trait BitContainer {
    /// Number of significant bits.
    fn bit_length(&self) -> u32;

    /// Current value, already truncated to [BitContainer::bit_length] bits.
    fn read(&self) -> Result<u64, AccessError>;

    /// Largest representable value, `2^bit_length - 1`.
    fn max(&self) -> u64 {
        bits::max_for(self.bit_length())
    }

    /// Characters needed to display [BitContainer::max] in decimal.
    fn max_dec_width(&self) -> usize {
        bits::format_dec(self.max()).len()
    }

    /// Characters needed to display [BitContainer::max] in hexadecimal.
    fn max_hex_width(&self) -> usize {
        bits::format_hex(self.max()).len()
    }

    /// Characters needed to display [BitContainer::max] in binary.
    fn max_bin_width(&self) -> usize {
        self.bit_length() as usize
    }

    /// Captures the current value for rendering.
    fn snapshot(&self) -> Result<Bits, AccessError> {
        Ok(Bits::new(self.read()?, self.bit_length()))
    }
}

/// A value frozen together with its bit length, rendered in any base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bits {
    value: u64,
    bit_length: u32,
}

impl Bits {
    /// Masks `value` down to `bit_length` bits.
    pub fn new(value: u64, bit_length: u32) -> Self {
        Bits {
            value: value & bits::max_for(bit_length),
            bit_length,
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn dec(&self) -> String {
        bits::format_dec(self.value)
    }

    pub fn hex(&self) -> String {
        bits::format_hex(self.value)
    }

    pub fn bin(&self) -> String {
        bits::format_bin(self.value, self.bit_length)
    }

    pub fn bin_delimited(&self) -> String {
        bits::format_bin_delimited(self.value, self.bit_length)
    }

    /// Renders in `radix`; binary is delimited when `delimited` is set.
    pub fn format(&self, radix: Radix, delimited: bool) -> String {
        match radix {
            Radix::Dec => self.dec(),
            Radix::Hex => self.hex(),
            Radix::Bin if delimited => self.bin_delimited(),
            Radix::Bin => self.bin(),
        }
    }
}

impl BitContainer for Bits {
    fn bit_length(&self) -> u32 {
        self.bit_length
    }

    fn read(&self) -> Result<u64, AccessError> {
        Ok(self.value)
    }
}
