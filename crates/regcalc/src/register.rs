//! The register: canonical value, width and bit numbering, with change notification.

use std::{cell::Cell, fmt, rc::Rc};

use crate::{
    bits,
    container::{BitContainer, Bits},
    errors::{AccessError, ConfigError, ParseError},
    observer::{Observer, ObserverId, ObserverList},
    parse::{self, Radix},
};

/// Register widths that can be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BitLength {
    Bits8,
    Bits16,
    #[default]
    Bits32,
}

impl BitLength {
    pub const ALL: [BitLength; 3] = [BitLength::Bits8, BitLength::Bits16, BitLength::Bits32];

    pub fn bits(self) -> u32 {
        match self {
            BitLength::Bits8 => 8,
            BitLength::Bits16 => 16,
            BitLength::Bits32 => 32,
        }
    }
}

impl TryFrom<u32> for BitLength {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(BitLength::Bits8),
            16 => Ok(BitLength::Bits16),
            32 => Ok(BitLength::Bits32),
            other => Err(ConfigError::InvalidConfiguration(other)),
        }
    }
}

impl From<BitLength> for u32 {
    fn from(value: BitLength) -> Self {
        value.bits()
    }
}

impl fmt::Display for BitLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}

/// Source of truth for the value shown in every view.
///
/// Writes never fail: values wider than the register are masked down. Every mutation
/// is fully applied before observers run, and observers run in registration order.
/// The register is single-threaded; every method takes `&self` so that observers and
/// [crate::field::Field]s can hold plain shared references to it.
#[derive(Debug)]
pub struct Register {
    value: Cell<u64>,
    bit_length: Cell<BitLength>,
    bit_0_is_lsb: Cell<bool>,
    observers: ObserverList,
}

impl Default for Register {
    fn default() -> Self {
        Register::new(0, BitLength::default(), true)
    }
}

impl Register {
    pub fn new(value: u64, bit_length: BitLength, bit_0_is_lsb: bool) -> Self {
        Register {
            value: Cell::new(value & bits::max_for(bit_length.bits())),
            bit_length: Cell::new(bit_length),
            bit_0_is_lsb: Cell::new(bit_0_is_lsb),
            observers: ObserverList::new(),
        }
    }

    /// A 32 bit, LSB-first register holding `value`.
    pub fn with_value(value: u64) -> Self {
        Register::new(value, BitLength::default(), true)
    }

    pub fn value(&self) -> u64 {
        self.value.get()
    }

    /// Stores `value` masked to the current width, then notifies.
    pub fn set_value(&self, value: u64) {
        self.value.set(value & self.max());
        self.notify_observers();
    }

    pub fn width(&self) -> BitLength {
        self.bit_length.get()
    }

    /// Changes the width and re-masks the value. Fields are left as they are, even
    /// the ones the new width no longer covers.
    pub fn set_width(&self, bit_length: BitLength) {
        log::debug!(target: "regcalc", "register width {} -> {}", self.width(), bit_length);

        self.bit_length.set(bit_length);
        self.value.set(self.value.get() & self.max());
        self.notify_observers();
    }

    /// Like [Register::set_width], taking a raw bit count.
    pub fn set_bit_length(&self, bit_length: u32) -> Result<(), ConfigError> {
        let bit_length = BitLength::try_from(bit_length)?;
        self.set_width(bit_length);
        Ok(())
    }

    pub fn bit_0_is_lsb(&self) -> bool {
        self.bit_0_is_lsb.get()
    }

    /// Switches bit numbering. The value is untouched; observers re-render their labels.
    pub fn set_bit_0_is_lsb(&self, is_lsb: bool) {
        log::debug!(target: "regcalc", "bit 0 is {}", if is_lsb { "LSB" } else { "MSB" });

        self.bit_0_is_lsb.set(is_lsb);
        self.notify_observers();
    }

    /// Reverses the byte order of the value. An 8 bit register has nothing to swap but
    /// still notifies.
    pub fn swap_bytes(&self) {
        let swapped = bits::swap_bytes(self.value.get(), self.bit_length());
        log::debug!(target: "regcalc", "swap bytes {:#X} -> {:#X}", self.value.get(), swapped);

        self.value.set(swapped);
        self.notify_observers();
    }

    /// Current value with the register's width.
    pub fn bits(&self) -> Bits {
        Bits::new(self.value.get(), self.bit_length())
    }

    /// Parses user-entered text and stores the result.
    pub fn set_text(&self, radix: Radix, text: &str) -> Result<(), ParseError> {
        let value = parse::parse_value(radix, text, self)?;
        self.set_value(value);
        Ok(())
    }

    pub fn register_observer(&self, observer: Rc<dyn Observer>) -> ObserverId {
        self.observers.register(observer)
    }

    /// Registers a closure or other owned observer.
    pub fn observe(&self, observer: impl Observer + 'static) -> ObserverId {
        self.register_observer(Rc::new(observer))
    }

    pub fn unregister_observer(&self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify_observers(&self) {
        self.observers.notify_all();
    }
}

impl BitContainer for Register {
    fn bit_length(&self) -> u32 {
        self.bit_length.get().bits()
    }

    fn read(&self) -> Result<u64, AccessError> {
        Ok(self.value.get())
    }
}
