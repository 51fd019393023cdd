//! Unit entity type - one physical, individually trackable piece of stock

use serde::{Deserialize, Serialize};

/// A single physical instance of a catalog item.
///
/// Many units may share the same `name` (fungible stock), but each is claimed
/// and released individually. A non-empty `code` marks a serialized unit and
/// must be unique within its name family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub is_available: bool,
}

impl Unit {
    /// Display label: the name, with the serial code appended when present.
    pub fn label(&self) -> String {
        match &self.code {
            Some(code) => format!("{} [{}]", self.name, code),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Availability summary for one name family, as shown by `item list`.
#[derive(Debug, Clone, Serialize)]
pub struct StockLine {
    pub name: String,
    pub total: u32,
    pub available: u32,
    /// Number of units in the family carrying a serial code.
    pub coded: u32,
}
