//! A session: one register plus the ordered list of named fields defined on it.

use std::{cmp::Ordering, rc::Rc};

use crate::{
    errors::ConfigError,
    field::{BitRange, Field},
    observer::{Observer, ObserverId},
    register::Register,
    selection::BitSelection,
};

#[derive(Debug, Clone)]
struct FieldSlot {
    name: String,
    range: BitRange,
    observers: Vec<ObserverId>,
}

/// Owns the register and the field list shown to the user.
///
/// The register is reference counted so observers can capture it; fields are stored as
/// [BitRange]s and handed out as [Field] views borrowing the register. Observers attached
/// through [Document::observe_field] are unregistered when their field is removed.
#[derive(Debug, Default)]
pub struct Document {
    register: Rc<Register>,
    slots: Vec<FieldSlot>,
}

impl Document {
    pub fn new(register: Register) -> Self {
        Document {
            register: Rc::new(register),
            slots: Vec::new(),
        }
    }

    pub fn register(&self) -> &Rc<Register> {
        &self.register
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends a field given in display numbering. Returns its row index.
    pub fn add_field(
        &mut self,
        start: i64,
        end: i64,
        name: impl Into<String>,
    ) -> Result<usize, ConfigError> {
        let range = Field::new(&self.register, start, end)?.range();
        self.slots.push(FieldSlot {
            name: name.into(),
            range,
            observers: Vec::new(),
        });

        Ok(self.slots.len() - 1)
    }

    /// Appends a field from a translated text selection.
    pub fn add_selection(
        &mut self,
        selection: BitSelection,
        name: impl Into<String>,
    ) -> Result<usize, ConfigError> {
        self.add_field(selection.start, selection.end, name)
    }

    pub fn field(&self, index: usize) -> Option<Field<'_>> {
        self.slots
            .get(index)
            .map(|slot| Field::from_range(&self.register, slot.range))
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|slot| slot.name.as_str())
    }

    pub fn rename_field(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Fields in row order with their names.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Field<'_>)> + '_ {
        self.slots.iter().map(|slot| {
            (
                slot.name.as_str(),
                Field::from_range(&self.register, slot.range),
            )
        })
    }

    /// Registers `observer` with the register on behalf of the field at `index`.
    pub fn observe_field(
        &mut self,
        index: usize,
        observer: Rc<dyn Observer>,
    ) -> Option<ObserverId> {
        let slot = self.slots.get_mut(index)?;
        let id = self.register.register_observer(observer);
        slot.observers.push(id);
        Some(id)
    }

    /// Removes the field at `index` and its observers. Returns the field's name.
    pub fn remove_field(&mut self, index: usize) -> Option<String> {
        if index >= self.slots.len() {
            return None;
        }

        let slot = self.slots.remove(index);
        self.release(&slot);
        Some(slot.name)
    }

    /// Removes every field and its observers.
    pub fn reset_fields(&mut self) {
        for slot in std::mem::take(&mut self.slots) {
            self.release(&slot);
        }
    }

    /// Orders rows by display start bit: descending when bit 0 is the LSB, ascending
    /// otherwise. Fields currently out of range go last.
    pub fn sort_fields(&mut self) {
        let register = &self.register;
        let descending = register.bit_0_is_lsb();

        self.slots.sort_by(|a, b| {
            let a = Field::from_range(register, a.range).start_bit();
            let b = Field::from_range(register, b.range).start_bit();
            match (a, b) {
                (Some(a), Some(b)) if descending => b.cmp(&a),
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    fn release(&self, slot: &FieldSlot) {
        for id in &slot.observers {
            self.register.unregister_observer(*id);
        }
    }
}

#[cfg(feature = "serde")]
impl Document {
    /// Describes the register configuration and the fields that currently fit it.
    pub fn to_layout(&self) -> crate::serde::LayoutDef {
        use crate::container::BitContainer;

        let mut fields = Vec::with_capacity(self.slots.len());
        for (name, field) in self.fields() {
            match (field.start_bit(), field.end_bit()) {
                (Some(start), Some(end)) => fields.push(crate::serde::FieldDef {
                    start: i64::from(start),
                    end: i64::from(end),
                    name: name.to_string(),
                }),
                _ => {
                    log::warn!(target: "regcalc", "field '{name}' does not fit the register, not exported");
                }
            }
        }

        crate::serde::LayoutDef {
            bit_length: self.register.bit_length(),
            bit_0_is_lsb: self.register.bit_0_is_lsb(),
            fields,
        }
    }

    /// Replaces the field list: width first, then numbering, then fields in order.
    ///
    /// An invalid width leaves the document untouched. An invalid field stops the load
    /// with the fields before it already added.
    pub fn load_layout(
        &mut self,
        layout: crate::serde::LayoutDef,
    ) -> Result<(), crate::errors::LayoutError> {
        let width = crate::register::BitLength::try_from(layout.bit_length)?;

        log::debug!(
            target: "regcalc",
            "loading layout: {} with {} field(s)",
            width,
            layout.fields.len()
        );

        self.reset_fields();
        self.register.set_width(width);
        self.register.set_bit_0_is_lsb(layout.bit_0_is_lsb);

        for field in layout.fields {
            self.add_field(field.start, field.end, field.name)
                .inspect_err(|err| log::warn!(target: "regcalc", "layout import stopped: {err}"))?;
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, crate::errors::LayoutError> {
        Ok(serde_json::to_string_pretty(&self.to_layout())?)
    }

    /// Loads a layout in the current or any legacy file format.
    pub fn load_json(&mut self, json: &str) -> Result<(), crate::errors::LayoutError> {
        let file: crate::serde::LayoutFile = serde_json::from_str(json)?;
        self.load_layout(file.into())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{register::BitLength, selection::SelectionTranslator};

    fn document() -> Document {
        let mut doc = Document::new(Register::with_value(0x1122_3344));
        doc.add_field(15, 8, "low").unwrap();
        doc.add_field(31, 24, "top").unwrap();
        doc.add_field(23, 16, "mid").unwrap();
        doc
    }

    fn names(doc: &Document) -> Vec<&str> {
        doc.fields().map(|(name, _)| name).collect()
    }

    #[test]
    fn test_add_and_read_fields() {
        let doc = document();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.name(2), Some("mid"));
        assert_eq!(doc.field(0).unwrap().value(), Ok(0x33));
        assert_eq!(doc.field(1).unwrap().value(), Ok(0x11));
        assert!(doc.field(3).is_none());
    }

    #[test]
    fn test_rejected_field_not_added() {
        let mut doc = document();
        assert_eq!(
            doc.add_field(8, 15, ""),
            Err(ConfigError::InvalidBitRange { start: 8, end: 15 })
        );
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn test_sort_fields() {
        let mut doc = document();
        doc.sort_fields();
        assert_eq!(names(&doc), vec!["top", "mid", "low"]);

        doc.register().set_bit_0_is_lsb(false);
        doc.sort_fields();
        assert_eq!(names(&doc), vec!["top", "mid", "low"]);

        doc.register().set_bit_0_is_lsb(true);
        doc.register().set_width(BitLength::Bits16);
        doc.sort_fields();
        assert_eq!(names(&doc), vec!["low", "top", "mid"]);
    }

    #[test]
    fn test_sort_msb_ascending() {
        let mut doc = Document::new(Register::new(0, BitLength::Bits16, false));
        doc.add_field(8, 15, "b").unwrap();
        doc.add_field(0, 3, "a").unwrap();
        doc.sort_fields();
        assert_eq!(names(&doc), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_field_unregisters_observers() {
        let mut doc = document();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        doc.observe_field(0, Rc::new(move || seen.set(seen.get() + 1)))
            .unwrap();
        assert_eq!(doc.register().observer_count(), 1);

        doc.register().set_value(1);
        assert_eq!(count.get(), 1);

        assert_eq!(doc.remove_field(0), Some("low".to_string()));
        assert_eq!(doc.register().observer_count(), 0);
        doc.register().set_value(2);
        assert_eq!(count.get(), 1);
        assert_eq!(doc.remove_field(5), None);
    }

    #[test]
    fn test_reset_fields() {
        let mut doc = document();
        for index in 0..doc.len() {
            doc.observe_field(index, Rc::new(|| {})).unwrap();
        }
        doc.register().observe(|| {});
        assert_eq!(doc.register().observer_count(), 4);

        doc.reset_fields();
        assert!(doc.is_empty());
        assert_eq!(doc.register().observer_count(), 1);
        assert_eq!(doc.register().value(), 0x1122_3344);
    }

    #[test]
    fn test_field_observer_reads_through_register() {
        let mut doc = document();
        let register = Rc::clone(doc.register());
        let range = doc.field(0).unwrap().range();
        let last = Rc::new(Cell::new(None));
        let seen = Rc::clone(&last);
        doc.observe_field(
            0,
            Rc::new(move || seen.set(Field::from_range(&register, range).value().ok())),
        );

        doc.field(2).unwrap().set_value(0xEE).unwrap();
        assert_eq!(last.get(), Some(0x33));
        assert_eq!(doc.register().value(), 0x11EE_3344);
    }

    #[test]
    fn test_rename() {
        let mut doc = document();
        assert!(doc.rename_field(1, "status"));
        assert_eq!(doc.name(1), Some("status"));
        assert!(!doc.rename_field(9, "x"));
    }

    #[test]
    fn test_add_field_does_not_notify() {
        let mut doc = Document::default();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        doc.register().observe(move || seen.set(seen.get() + 1));

        doc.add_field(7, 0, "low").unwrap();
        doc.add_selection(BitSelection { start: 15, end: 8 }, "high")
            .unwrap();
        assert_eq!(count.get(), 0);

        doc.field(0).unwrap().set_value(0xA).unwrap();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_add_selection() {
        let mut doc = Document::new(Register::with_value(0x1122_3344));
        let text = doc.register().bits().bin_delimited();
        let selection = SelectionTranslator::for_register(doc.register())
            .translate(&text, Some(20..29))
            .unwrap();
        assert_eq!(selection, BitSelection { start: 15, end: 8 });

        assert_eq!(doc.add_selection(selection, "sel"), Ok(0));
        assert_eq!(doc.name(0), Some("sel"));
        assert_eq!(doc.field(0).unwrap().value(), Ok(0x33));
        assert_eq!(doc.field(0).unwrap().label(), "15:8");
    }

    #[test]
    fn test_add_selection_msb() {
        let mut doc = Document::new(Register::new(0x1122_3344, BitLength::Bits32, false));
        let text = doc.register().bits().bin_delimited();
        let selection = SelectionTranslator::for_register(doc.register())
            .translate(&text, Some(20..29))
            .unwrap();
        assert_eq!(selection.to_string(), "16:23");

        doc.add_selection(selection, "sel").unwrap();
        assert_eq!(doc.field(0).unwrap().value(), Ok(0x33));
    }
}
