//! Order entity type - one request submission, possibly shared by co-requesters

use serde::{Deserialize, Serialize};

use crate::entities::line_item::LineStatus;

/// A request submission against a class group.
///
/// Requesting students are kept in the `order_members` join table; the order
/// itself never reaches a terminal state, its line items do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub group_id: i64,
}

/// Administrative attention summary for an order, computed from its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAttention {
    /// At least one line is still awaiting an approve/deny decision.
    Pending,
    /// No pending lines, but stock is still out on loan.
    Loaned,
    /// Every line has reached a terminal state.
    Complete,
}

impl OrderAttention {
    /// Summarize a set of line statuses the way the admin order list does.
    pub fn from_statuses(statuses: &[LineStatus]) -> Self {
        if statuses.iter().any(|s| *s == LineStatus::Requested) {
            OrderAttention::Pending
        } else if statuses.iter().any(|s| *s == LineStatus::Loaned) {
            OrderAttention::Loaned
        } else {
            OrderAttention::Complete
        }
    }
}

impl std::fmt::Display for OrderAttention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderAttention::Pending => write!(f, "pending"),
            OrderAttention::Loaned => write!(f, "loaned"),
            OrderAttention::Complete => write!(f, "complete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attention_summary() {
        use LineStatus::*;
        assert_eq!(
            OrderAttention::from_statuses(&[Loaned, Requested, Returned]),
            OrderAttention::Pending
        );
        assert_eq!(
            OrderAttention::from_statuses(&[Loaned, Returned]),
            OrderAttention::Loaned
        );
        assert_eq!(
            OrderAttention::from_statuses(&[Returned, Denied]),
            OrderAttention::Complete
        );
        // An empty order has nothing outstanding
        assert_eq!(OrderAttention::from_statuses(&[]), OrderAttention::Complete);
    }
}
