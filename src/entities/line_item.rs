//! LineItem entity type - one line of an order, claiming a block of units

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a line item.
///
/// `Returned` and `Denied` are terminal; the transition table lives in
/// [`crate::core::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LineStatus {
    #[default]
    Requested,
    Loaned,
    Returned,
    Denied,
}

impl LineStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, LineStatus::Returned | LineStatus::Denied)
    }

    /// Statuses under which the line item still holds its claimed units.
    pub fn is_active(self) -> bool {
        matches!(self, LineStatus::Requested | LineStatus::Loaned)
    }
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineStatus::Requested => write!(f, "requested"),
            LineStatus::Loaned => write!(f, "loaned"),
            LineStatus::Returned => write!(f, "returned"),
            LineStatus::Denied => write!(f, "denied"),
        }
    }
}

impl std::str::FromStr for LineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "requested" => Ok(LineStatus::Requested),
            "loaned" => Ok(LineStatus::Loaned),
            "returned" => Ok(LineStatus::Returned),
            "denied" => Ok(LineStatus::Denied),
            _ => Err(format!(
                "Invalid status: {}. Use requested, loaned, returned, or denied",
                s
            )),
        }
    }
}

/// One line of an order: a claim on `quantity` units of one name.
///
/// `unit_id` is the representative unit (the first claimed in the stable
/// ordering) used for code display; the full claimed set is kept in the
/// `line_item_units` table and is the authority for release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub order_id: i64,
    pub unit_id: i64,
    pub quantity: u32,
    pub status: LineStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
}
