//! Reservation engine - atomically claim a block of available units
//!
//! Selection, availability re-check and the claim itself all happen inside a
//! single `BEGIN IMMEDIATE` transaction, so two concurrent reservations for
//! the same stock resolve first-committer-wins: the loser sees the shrunken
//! pool and fails with `InsufficientStock` without mutating anything.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Transaction};

use crate::core::error::{Result, StockError};
use crate::core::store::{encode_ts, fetch_line_item, unit_from_row, Store};
use crate::entities::{LineItem, LineStatus, Unit};

/// What the caller wants to reserve. `code` selects mode A (one exact
/// serialized unit); without it mode B picks `quantity` units by name.
#[derive(Debug, Clone)]
pub struct ReserveRequest {
    pub name: String,
    pub quantity: u32,
    pub code: Option<String>,
}

impl Store {
    /// Reserve stock for an order, producing a new `Requested` line item.
    ///
    /// Either every selected unit is claimed and the line item exists, or
    /// nothing is mutated. The returned line item's `unit_id` is the first
    /// claimed unit; the whole block is recorded in `line_item_units`.
    pub fn reserve(&mut self, order_id: i64, request: &ReserveRequest) -> Result<LineItem> {
        if request.quantity == 0 {
            return Err(StockError::InvalidQuantity {
                quantity: 0,
                reason: "quantity must be at least 1".to_string(),
            });
        }

        let tx = self.immediate_tx()?;

        let order_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM orders WHERE id = ?1)",
            [order_id],
            |row| row.get(0),
        )?;
        if !order_exists {
            return Err(StockError::OrderNotFound(order_id));
        }

        let claimed = match &request.code {
            Some(code) => claim_by_code(&tx, &request.name, code, request.quantity)?,
            None => claim_by_name(&tx, &request.name, request.quantity)?,
        };

        // flip the whole block; the selection above ran under the same write
        // lock, so every row is still available here
        for unit in &claimed {
            tx.execute(
                "UPDATE units SET is_available = 0 WHERE id = ?1",
                [unit.id],
            )?;
        }

        let requested_at = encode_ts(Utc::now());
        tx.execute(
            "INSERT INTO line_items (order_id, unit_id, quantity, status, requested_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                order_id,
                claimed[0].id,
                request.quantity,
                LineStatus::Requested,
                requested_at
            ],
        )?;
        let line_item_id = tx.last_insert_rowid();
        for unit in &claimed {
            tx.execute(
                "INSERT INTO line_item_units (line_item_id, unit_id) VALUES (?1, ?2)",
                params![line_item_id, unit.id],
            )?;
        }

        let line_item = fetch_line_item(&tx, line_item_id)?;
        tx.commit()?;
        Ok(line_item)
    }
}

/// Mode A: one exact serialized unit. A coded unit is inherently singular.
fn claim_by_code(
    tx: &Transaction<'_>,
    name: &str,
    code: &str,
    quantity: u32,
) -> Result<Vec<Unit>> {
    if quantity != 1 {
        return Err(StockError::InvalidQuantity {
            quantity,
            reason: "a unit requested by code is singular".to_string(),
        });
    }
    let unit = tx
        .query_row(
            "SELECT id, name, code, is_available FROM units WHERE name = ?1 AND code = ?2",
            params![name, code],
            unit_from_row,
        )
        .optional()?
        .ok_or_else(|| StockError::NotFound {
            name: name.to_string(),
            code: Some(code.to_string()),
        })?;
    if !unit.is_available {
        return Err(StockError::Unavailable {
            name: name.to_string(),
            code: code.to_string(),
        });
    }
    Ok(vec![unit])
}

/// Mode B: the first `quantity` available units of the name family, in the
/// stable order (code ascending nulls first, then id). A family containing
/// any serialized unit only ever hands out one unit per request, so
/// individually tracked stock cannot be bulk-claimed ambiguously.
fn claim_by_name(tx: &Transaction<'_>, name: &str, quantity: u32) -> Result<Vec<Unit>> {
    let family_size: u32 = tx.query_row(
        "SELECT COUNT(*) FROM units WHERE name = ?1",
        [name],
        |row| row.get(0),
    )?;
    if family_size == 0 {
        return Err(StockError::NotFound {
            name: name.to_string(),
            code: None,
        });
    }

    let coded: u32 = tx.query_row(
        "SELECT COUNT(*) FROM units WHERE name = ?1 AND code IS NOT NULL",
        [name],
        |row| row.get(0),
    )?;
    if coded > 0 && quantity > 1 {
        return Err(StockError::InvalidQuantity {
            quantity,
            reason: format!("'{name}' units carry serial codes; request them one at a time"),
        });
    }

    let mut stmt = tx.prepare(
        "SELECT id, name, code, is_available FROM units
         WHERE name = ?1 AND is_available = 1
         ORDER BY code ASC NULLS FIRST, id ASC
         LIMIT ?2",
    )?;
    let available = stmt
        .query_map(params![name, quantity], unit_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if (available.len() as u32) < quantity {
        return Err(StockError::InsufficientStock {
            name: name.to_string(),
            requested: quantity,
            available: available.len() as u32,
        });
    }
    Ok(available)
}
