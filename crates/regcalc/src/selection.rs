//! Translation of a text selection in a delimited binary string into a bit range.

use std::{fmt, ops::Range};

use crate::{
    bits::{self, DELIMITER},
    container::BitContainer,
    register::Register,
};

/// A candidate field range in display numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSelection {
    pub start: i64,
    pub end: i64,
}

impl fmt::Display for BitSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

/// Maps character ranges of a register's delimited binary text to bit ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTranslator {
    bit_length: u32,
    bit_0_is_lsb: bool,
}

impl SelectionTranslator {
    pub fn new(bit_length: u32, bit_0_is_lsb: bool) -> Self {
        SelectionTranslator {
            bit_length,
            bit_0_is_lsb,
        }
    }

    /// Uses the register's current width and numbering.
    pub fn for_register(register: &Register) -> Self {
        SelectionTranslator::new(register.bit_length(), register.bit_0_is_lsb())
    }

    /// Translates the character range `selection` of `text`, the text being the
    /// delimited binary rendering, most significant bit first.
    ///
    /// Returns `None` when nothing is selected or the selection holds only delimiters.
    /// Offsets past the end of `text` are clamped.
    pub fn translate(&self, text: &str, selection: Option<Range<usize>>) -> Option<BitSelection> {
        let selection = selection?;
        let len = text.chars().count();
        let (start, end) = (selection.start.min(len), selection.end.min(len));
        if start >= end {
            return None;
        }

        let before = text.chars().take(start).filter(|&c| c == DELIMITER).count();
        let inside = text
            .chars()
            .skip(start)
            .take(end - start)
            .filter(|&c| c == DELIMITER)
            .count();

        let first = start - before;
        let last = end - before - inside;
        if last <= first {
            return None;
        }

        let (mut start, mut end) = bits::offsets_to_bits(first, last, self.bit_length);
        if !self.bit_0_is_lsb {
            start = bits::mirror(start, self.bit_length);
            end = bits::mirror(end, self.bit_length);
        }

        Some(BitSelection { start, end })
    }
}
