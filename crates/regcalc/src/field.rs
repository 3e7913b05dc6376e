//! Fields: named views onto a contiguous bit range of a [Register].

use std::rc::Rc;

use crate::{
    bits,
    container::{BitContainer, Bits},
    errors::{AccessError, ConfigError, ParseError},
    observer::{Observer, ObserverId},
    parse::{self, Radix},
    register::{BitLength, Register},
};

/// Geometry of a field in raw LSB-first terms, fixed when the field is created.
///
/// The mask is never recomputed, so a range keeps addressing the same bits however the
/// register's width or numbering changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    start: u32,
    end: u32,
    mask: u64,
}

impl BitRange {
    /// Builds a range from display endpoints, as seen with the given register width
    /// and numbering.
    pub fn new(
        start: i64,
        end: i64,
        width: BitLength,
        bit_0_is_lsb: bool,
    ) -> Result<Self, ConfigError> {
        let bit_length = width.bits();
        let in_register = |index: i64| (0..i64::from(bit_length)).contains(&index);
        if !in_register(start) || !in_register(end) {
            return Err(ConfigError::InvalidBitRange { start, end });
        }

        let (raw_start, raw_end) = if bit_0_is_lsb {
            (start, end)
        } else {
            (bits::mirror(start, bit_length), bits::mirror(end, bit_length))
        };

        if raw_end > raw_start {
            return Err(ConfigError::InvalidBitRange { start, end });
        }

        let (start, end) = (raw_start as u32, raw_end as u32);
        let mask = bits::max_for(start - end + 1) << end;

        Ok(BitRange { start, end, mask })
    }

    /// Builds a range against the register's current width and numbering.
    pub fn for_register(register: &Register, start: i64, end: i64) -> Result<Self, ConfigError> {
        BitRange::new(start, end, register.width(), register.bit_0_is_lsb())
    }

    /// Most significant raw bit.
    pub fn raw_start(&self) -> u32 {
        self.start
    }

    /// Least significant raw bit.
    pub fn raw_end(&self) -> u32 {
        self.end
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn bit_length(&self) -> u32 {
        self.start - self.end + 1
    }

    fn display(raw: u32, bit_length: u32, bit_0_is_lsb: bool) -> Option<u32> {
        if raw >= bit_length {
            None
        } else if bit_0_is_lsb {
            Some(raw)
        } else {
            Some(bit_length - raw - 1)
        }
    }
}

/// A read/write view onto a [BitRange] of a borrowed [Register].
///
/// A field holds no value of its own. Reads compute from the register, writes replace
/// the register's value and so notify every register observer.
#[derive(Debug, Clone, Copy)]
pub struct Field<'r> {
    register: &'r Register,
    range: BitRange,
}

impl<'r> Field<'r> {
    /// Creates a field from display endpoints. `start` always names the field's most
    /// significant bit, so it is the smaller index when bit 0 is the MSB.
    pub fn new(register: &'r Register, start: i64, end: i64) -> Result<Self, ConfigError> {
        let range = BitRange::for_register(register, start, end).inspect_err(|err| {
            log::debug!(target: "regcalc", "field rejected: {err}");
        })?;

        log::debug!(
            target: "regcalc",
            "field {start}:{end} covers raw bits {}..={}",
            range.end,
            range.start
        );

        Ok(Field { register, range })
    }

    /// Re-materializes a field from a previously validated range.
    pub fn from_range(register: &'r Register, range: BitRange) -> Self {
        Field { register, range }
    }

    pub fn register(&self) -> &'r Register {
        self.register
    }

    pub fn range(&self) -> BitRange {
        self.range
    }

    /// True while the field's bits fit inside the register's current width.
    pub fn is_valid(&self) -> bool {
        self.range.start < self.register.bit_length()
    }

    /// Current value, or [AccessError::FieldOutOfRange] if the register has shrunk below
    /// the field. Checked on every read.
    pub fn value(&self) -> Result<u64, AccessError> {
        if !self.is_valid() {
            return Err(AccessError::FieldOutOfRange);
        }

        Ok((self.register.value() & self.range.mask) >> self.range.end)
    }

    /// Writes `value` into the field's bits, leaving the register's other bits intact.
    pub fn set_value(&self, value: u64) -> Result<(), AccessError> {
        let max = self.max();
        if value > max {
            return Err(AccessError::ValueTooLarge { value, max });
        }

        let register = self.register.value();
        self.register
            .set_value((register & !self.range.mask) | (value << self.range.end));
        Ok(())
    }

    pub fn bits(&self) -> Result<Bits, AccessError> {
        self.snapshot()
    }

    /// Parses user-entered text and writes the result.
    pub fn set_text(&self, radix: Radix, text: &str) -> Result<(), ParseError> {
        let value = parse::parse_value(radix, text, self)?;
        self.set_value(value)?;
        Ok(())
    }

    /// Display index of the first bit, or `None` while out of range.
    pub fn start_bit(&self) -> Option<u32> {
        BitRange::display(
            self.range.start,
            self.register.bit_length(),
            self.register.bit_0_is_lsb(),
        )
    }

    /// Display index of the last bit, or `None` while out of range.
    pub fn end_bit(&self) -> Option<u32> {
        BitRange::display(
            self.range.end,
            self.register.bit_length(),
            self.register.bit_0_is_lsb(),
        )
    }

    /// `"start:end"` in display numbering, `"N/A"` while out of range.
    pub fn label(&self) -> String {
        match (self.start_bit(), self.end_bit()) {
            (Some(start), Some(end)) => format!("{start}:{end}"),
            _ => "N/A".to_string(),
        }
    }

    pub fn bit_0_is_lsb(&self) -> bool {
        self.register.bit_0_is_lsb()
    }

    pub fn register_observer(&self, observer: Rc<dyn Observer>) -> ObserverId {
        self.register.register_observer(observer)
    }

    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.register.unregister_observer(id)
    }
}

impl BitContainer for Field<'_> {
    fn bit_length(&self) -> u32 {
        self.range.bit_length()
    }

    fn read(&self) -> Result<u64, AccessError> {
        self.value()
    }
}
