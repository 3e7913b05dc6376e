//! JSON description of a field layout.
//!
//! A layout records the register's width, its bit numbering and the fields defined on
//! it, each by display endpoints and name. Values are not persisted. Load and save
//! through [crate::document::Document::load_json] and [crate::document::Document::to_json].

use serde::{Deserialize, Serialize};

fn default_bit_0_is_lsb() -> bool {
    true
}

/// Top-level layout document.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LayoutDef {
    /// Register width: 8, 16 or 32.
    #[serde(rename = "bit length")]
    pub bit_length: u32,
    /// Bit numbering the field endpoints are written in. Missing in older files.
    #[serde(rename = "bit 0 is lsb", default = "default_bit_0_is_lsb")]
    pub bit_0_is_lsb: bool,
    /// Fields in row order.
    pub fields: Vec<FieldDef>,
}

/// A single field by display endpoints.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub name: String,
}

/// Every accepted file shape. The oldest files were a bare array of fields for a
/// 32 bit, LSB-first register.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum LayoutFile {
    Layout(LayoutDef),
    Fields(Vec<FieldDef>),
}

impl From<LayoutFile> for LayoutDef {
    fn from(value: LayoutFile) -> Self {
        match value {
            LayoutFile::Layout(layout) => layout,
            LayoutFile::Fields(fields) => LayoutDef {
                bit_length: 32,
                bit_0_is_lsb: true,
                fields,
            },
        }
    }
}
