//! Expiration sweeper - reclaim stock from abandoned requests
//!
//! Invoked by an external scheduler (cron, systemd timer, by hand). Each
//! expired row is processed under its own savepoint so one corrupt row cannot
//! block reclamation of the rest; re-running immediately after a successful
//! pass matches zero rows.

use chrono::{Duration, Utc};

use crate::core::error::{Result, StockError};
use crate::core::lifecycle::release_units;
use crate::core::store::{encode_ts, fetch_line_item, Store};

/// One row the sweep could not reclaim. The caller decides how to log it.
#[derive(Debug)]
pub struct SweepFailure {
    pub line_item_id: i64,
    pub error: StockError,
}

/// What a sweep pass accomplished.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// Line items deleted.
    pub deleted: u32,
    /// Physical units returned to the pool.
    pub released: u32,
    /// Rows skipped because release or deletion failed.
    pub failures: Vec<SweepFailure>,
}

impl SweepOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Store {
    /// Delete every line item still `Requested` after `threshold`, releasing
    /// its claimed units. Unlike a denial, no historical record is kept.
    pub fn sweep_expired(&mut self, threshold: Duration) -> Result<SweepOutcome> {
        let cutoff = encode_ts(Utc::now() - threshold);
        let mut tx = self.immediate_tx()?;

        let expired: Vec<i64> = {
            let mut stmt = tx.prepare(
                "SELECT id FROM line_items
                 WHERE status = 'requested' AND requested_at < ?1
                 ORDER BY requested_at, id",
            )?;
            let ids = stmt
                .query_map([&cutoff], |row| row.get(0))?
                .collect::<rusqlite::Result<_>>()?;
            ids
        };

        let mut outcome = SweepOutcome::default();
        for line_item_id in expired {
            let reclaimed = (|| -> Result<u32> {
                let sp = tx.savepoint()?;
                let line_item = fetch_line_item(&sp, line_item_id)?;
                release_units(&sp, &line_item)?;
                sp.execute(
                    "DELETE FROM line_item_units WHERE line_item_id = ?1",
                    [line_item_id],
                )?;
                sp.execute("DELETE FROM line_items WHERE id = ?1", [line_item_id])?;
                sp.commit()?;
                Ok(line_item.quantity)
            })();
            match reclaimed {
                Ok(quantity) => {
                    outcome.deleted += 1;
                    outcome.released += quantity;
                }
                Err(error) => outcome.failures.push(SweepFailure {
                    line_item_id,
                    error,
                }),
            }
        }

        tx.commit()?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reserve::ReserveRequest;
    use crate::entities::{LineStatus, Role, Term};

    fn setup(store: &mut Store) -> i64 {
        let prof = store.add_user("Prof Vega", "vega@uni.edu", Role::Teacher).unwrap();
        let student = store.add_user("Ana", "ana@uni.edu", Role::Student).unwrap();
        let course = store.add_course("Circuits I", "EE101").unwrap();
        let group = store
            .add_group(course.id, 1, 2026, Term::I, prof.id)
            .unwrap();
        store.create_order(group.id, &[student.id]).unwrap().id
    }

    fn reserve(store: &mut Store, order_id: i64, name: &str, quantity: u32) -> i64 {
        store
            .reserve(
                order_id,
                &ReserveRequest {
                    name: name.to_string(),
                    quantity,
                    code: None,
                },
            )
            .unwrap()
            .id
    }

    fn backdate(store: &Store, line_item_id: i64, hours: i64) {
        let then = encode_ts(Utc::now() - Duration::hours(hours));
        store
            .conn()
            .execute(
                "UPDATE line_items SET requested_at = ?1 WHERE id = ?2",
                rusqlite::params![then, line_item_id],
            )
            .unwrap();
    }

    #[test]
    fn test_sweep_reclaims_only_expired_requests() {
        // Scenario: one request 30h old, one 2h old; only the first goes
        let mut store = Store::open_in_memory().unwrap();
        let order_id = setup(&mut store);
        store.create_units("Resistor 100", 4, None).unwrap();
        let stale = reserve(&mut store, order_id, "Resistor 100", 2);
        let fresh = reserve(&mut store, order_id, "Resistor 100", 1);
        backdate(&store, stale, 30);
        backdate(&store, fresh, 2);

        let outcome = store.sweep_expired(Duration::hours(24)).unwrap();
        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.released, 2);
        assert!(outcome.is_clean());

        // the stale row is gone entirely, not denied
        assert!(matches!(
            store.line_item(stale),
            Err(StockError::LineItemNotFound(_))
        ));
        assert_eq!(
            store.line_item(fresh).unwrap().status,
            LineStatus::Requested
        );
        assert_eq!(store.count_available("Resistor 100").unwrap(), 3);
    }

    #[test]
    fn test_sweep_ignores_loaned_rows() {
        let mut store = Store::open_in_memory().unwrap();
        let order_id = setup(&mut store);
        store.create_units("Multimeter", 1, None).unwrap();
        let line = reserve(&mut store, order_id, "Multimeter", 1);
        store.transition(line, LineStatus::Loaned).unwrap();
        backdate(&store, line, 48);

        let outcome = store.sweep_expired(Duration::hours(24)).unwrap();
        assert_eq!(outcome.deleted, 0);
        assert_eq!(store.line_item(line).unwrap().status, LineStatus::Loaned);
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let mut store = Store::open_in_memory().unwrap();
        let order_id = setup(&mut store);
        store.create_units("Resistor 100", 2, None).unwrap();
        let line = reserve(&mut store, order_id, "Resistor 100", 2);
        backdate(&store, line, 30);

        let first = store.sweep_expired(Duration::hours(24)).unwrap();
        assert_eq!(first.deleted, 1);

        let second = store.sweep_expired(Duration::hours(24)).unwrap();
        assert_eq!(second.deleted, 0);
        assert_eq!(second.released, 0);
        assert!(second.is_clean());
    }

    #[test]
    fn test_sweep_isolates_corrupt_rows() {
        let mut store = Store::open_in_memory().unwrap();
        let order_id = setup(&mut store);
        store.create_units("Resistor 100", 3, None).unwrap();
        let bad = reserve(&mut store, order_id, "Resistor 100", 2);
        let good = reserve(&mut store, order_id, "Resistor 100", 1);
        backdate(&store, bad, 30);
        backdate(&store, good, 30);

        // corrupt the first row's claim so its release falls short
        let claimed = store.claimed_units(bad).unwrap();
        store
            .conn()
            .execute(
                "UPDATE units SET is_available = 1 WHERE id = ?1",
                [claimed[0].id],
            )
            .unwrap();

        let outcome = store.sweep_expired(Duration::hours(24)).unwrap();
        assert_eq!(outcome.deleted, 1);
        assert_eq!(outcome.released, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].line_item_id, bad);
        assert!(matches!(
            outcome.failures[0].error,
            StockError::ReleaseShortfall { .. }
        ));

        // good row reclaimed, bad row left for an operator to inspect
        assert!(store.line_item(good).is_err());
        assert_eq!(
            store.line_item(bad).unwrap().status,
            LineStatus::Requested
        );
    }
}
