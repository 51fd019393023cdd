//! Status lifecycle - the Requested -> Loaned -> {Returned | Denied} machine
//!
//! The transition table is a pure function consulted both for input
//! validation and for populating UI affordances. Transitions into a terminal
//! state release the line item's exact claimed units back to the pool.

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::core::error::{Result, StockError};
use crate::core::store::{claimed_unit_ids, encode_ts, fetch_line_item, Store};
use crate::entities::{LineItem, LineStatus};

/// Legal next states from `current`, self-transition included (a no-op save).
pub fn allowed_transitions(current: LineStatus) -> Vec<LineStatus> {
    match current {
        LineStatus::Requested => vec![
            LineStatus::Requested,
            LineStatus::Loaned,
            LineStatus::Denied,
        ],
        LineStatus::Loaned => vec![LineStatus::Loaned, LineStatus::Returned],
        LineStatus::Returned => vec![LineStatus::Returned],
        LineStatus::Denied => vec![LineStatus::Denied],
    }
}

/// Check if a status transition is valid. Returned and Denied never revert.
pub fn is_legal_transition(from: LineStatus, to: LineStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Flip the line item's claimed units back to available.
///
/// Releases precisely the units recorded at reservation time. If any of them
/// is no longer marked unavailable the data is corrupt; the operation fails
/// with [`StockError::ReleaseShortfall`] so the enclosing transaction rolls
/// back rather than silently under-releasing.
pub(crate) fn release_units(conn: &Connection, line_item: &LineItem) -> Result<()> {
    let mut released = 0u32;
    for unit_id in claimed_unit_ids(conn, line_item.id)? {
        released += conn.execute(
            "UPDATE units SET is_available = 1 WHERE id = ?1 AND is_available = 0",
            [unit_id],
        )? as u32;
    }
    if released != line_item.quantity {
        return Err(StockError::ReleaseShortfall {
            line_item: line_item.id,
            expected: line_item.quantity,
            released,
        });
    }
    Ok(())
}

/// Apply one transition on an open transaction; no commit here.
fn apply_transition(
    conn: &Connection,
    line_item_id: i64,
    new_status: LineStatus,
) -> Result<LineItem> {
    let line_item = fetch_line_item(conn, line_item_id)?;
    if !is_legal_transition(line_item.status, new_status) {
        return Err(StockError::IllegalTransition {
            from: line_item.status,
            to: new_status,
        });
    }
    if line_item.status == new_status {
        // self-transition: a no-op save
        return Ok(line_item);
    }

    let now = encode_ts(Utc::now());
    match new_status {
        LineStatus::Loaned => {
            conn.execute(
                "UPDATE line_items SET status = ?1, loaned_at = ?2 WHERE id = ?3",
                params![new_status, now, line_item_id],
            )?;
        }
        LineStatus::Returned => {
            release_units(conn, &line_item)?;
            conn.execute(
                "UPDATE line_items SET status = ?1, returned_at = ?2 WHERE id = ?3",
                params![new_status, now, line_item_id],
            )?;
        }
        LineStatus::Denied => {
            release_units(conn, &line_item)?;
            conn.execute(
                "UPDATE line_items SET status = ?1 WHERE id = ?2",
                params![new_status, line_item_id],
            )?;
        }
        LineStatus::Requested => unreachable!("no state transitions into Requested"),
    }
    fetch_line_item(conn, line_item_id)
}

impl Store {
    /// Apply one status change in its own transaction.
    pub fn transition(&mut self, line_item_id: i64, new_status: LineStatus) -> Result<LineItem> {
        let tx = self.immediate_tx()?;
        let line_item = apply_transition(&tx, line_item_id, new_status)?;
        tx.commit()?;
        Ok(line_item)
    }

    /// Apply a batch of status changes as one all-or-nothing transaction:
    /// if any row's transition or release fails, no row is changed.
    pub fn batch_transition(
        &mut self,
        changes: &[(i64, LineStatus)],
    ) -> Result<Vec<LineItem>> {
        let tx = self.immediate_tx()?;
        let mut updated = Vec::with_capacity(changes.len());
        for (line_item_id, new_status) in changes {
            updated.push(apply_transition(&tx, *line_item_id, *new_status)?);
        }
        tx.commit()?;
        Ok(updated)
    }
}
