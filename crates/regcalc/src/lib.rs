//! # regcalc
//!
//! A model for inspecting and editing a fixed-width register and named bit fields
//! within it, keeping hexadecimal, decimal and binary renderings in sync.
//!
//! A [Register] holds the value, its width (8, 16 or 32 bits) and whether bit 0 is the
//! least or most significant bit. [Field]s are views onto a contiguous bit range of a
//! register. Every mutation notifies the register's observers synchronously, in
//! registration order, so each view can re-render from the new state.
//!
//! ## Example
//!
//! ```
//! use std::{cell::Cell, rc::Rc};
//!
//! use regcalc::{BitContainer, Field, Register};
//!
//! let reg = Rc::new(Register::with_value(0x1122_3344));
//! let field = Field::new(&reg, 15, 8).unwrap();
//! assert_eq!(field.value(), Ok(0x33));
//! assert_eq!(field.bits().unwrap().bin_delimited(), "0011_0011");
//!
//! let renders = Rc::new(Cell::new(0));
//! let seen = Rc::clone(&renders);
//! reg.observe(move || seen.set(seen.get() + 1));
//!
//! field.set_value(0xAB).unwrap();
//! assert_eq!(reg.value(), 0x1122_AB44);
//! assert_eq!(renders.get(), 1);
//!
//! reg.set_bit_length(16).unwrap();
//! assert_eq!(reg.max(), 0xFFFF);
//! ```

pub mod bits;
pub mod container;
pub mod document;
pub mod errors;
pub mod field;
pub mod observer;
pub mod parse;
pub mod register;
pub mod selection;
#[cfg(feature = "serde")]
pub mod serde;

pub use container::{BitContainer, Bits};
pub use document::Document;
pub use field::{BitRange, Field};
pub use observer::{Observer, ObserverId};
pub use parse::Radix;
pub use register::{BitLength, Register};
pub use selection::{BitSelection, SelectionTranslator};
