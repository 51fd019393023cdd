//! Item catalog - batch creation, guarded deletion and availability counts

use rusqlite::params;

use crate::core::error::{Result, StockError};
use crate::core::store::{fetch_unit, unit_from_row, Store};
use crate::entities::Unit;

impl Store {
    /// Create `count` units sharing `name` in one transaction.
    ///
    /// With `first_code`, units receive sequential serial codes
    /// `first_code, first_code+1, ...`; if any resulting `(name, code)` pair
    /// already exists the whole batch fails with [`StockError::DuplicateCode`]
    /// and nothing is created.
    pub fn create_units(
        &mut self,
        name: &str,
        count: u32,
        first_code: Option<u32>,
    ) -> Result<Vec<Unit>> {
        if count == 0 {
            return Err(StockError::InvalidQuantity {
                quantity: 0,
                reason: "at least one unit must be created".to_string(),
            });
        }

        let tx = self.immediate_tx()?;
        let mut created = Vec::with_capacity(count as usize);
        for i in 0..count {
            let code = first_code.map(|first| (first + i).to_string());
            if let Some(code) = &code {
                let taken: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM units WHERE name = ?1 AND code = ?2)",
                    params![name, code],
                    |row| row.get(0),
                )?;
                if taken {
                    // rolls back the units inserted so far
                    return Err(StockError::DuplicateCode {
                        name: name.to_string(),
                        code: code.clone(),
                    });
                }
            }
            tx.execute(
                "INSERT INTO units (name, code, is_available) VALUES (?1, ?2, 1)",
                params![name, code],
            )?;
            created.push(Unit {
                id: tx.last_insert_rowid(),
                name: name.to_string(),
                code,
                is_available: true,
            });
        }
        tx.commit()?;
        Ok(created)
    }

    /// Permanently remove a unit from the catalog.
    ///
    /// Refuses with [`StockError::UnitInUse`] while the unit is claimed or
    /// referenced by any line item, past or present.
    pub fn delete_unit(&mut self, id: i64) -> Result<()> {
        let tx = self.immediate_tx()?;
        let unit = fetch_unit(&tx, id)?;
        if !unit.is_available {
            return Err(StockError::UnitInUse { id });
        }
        let referenced: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM line_item_units WHERE unit_id = ?1)
                 OR EXISTS(SELECT 1 FROM line_items WHERE unit_id = ?1)",
            [id],
            |row| row.get(0),
        )?;
        if referenced {
            return Err(StockError::UnitInUse { id });
        }
        tx.execute("DELETE FROM units WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(())
    }

    /// How many units sharing `name` are currently available. Read-only.
    pub fn count_available(&self, name: &str) -> Result<u32> {
        Ok(self.conn().query_row(
            "SELECT COUNT(*) FROM units WHERE name = ?1 AND is_available = 1",
            [name],
            |row| row.get(0),
        )?)
    }

    /// All units sharing `name`, stable order (code ascending nulls first).
    pub fn units_named(&self, name: &str) -> Result<Vec<Unit>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, code, is_available FROM units
             WHERE name = ?1 ORDER BY code ASC NULLS FIRST, id ASC",
        )?;
        let units = stmt
            .query_map([name], unit_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_batch_plain() {
        let mut store = Store::open_in_memory().unwrap();
        let units = store.create_units("Resistor 100", 3, None).unwrap();
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| u.is_available && u.code.is_none()));
        assert_eq!(store.count_available("Resistor 100").unwrap(), 3);
    }

    #[test]
    fn test_create_batch_sequential_codes() {
        let mut store = Store::open_in_memory().unwrap();
        let units = store.create_units("Oscilloscope", 3, Some(100)).unwrap();
        let codes: Vec<_> = units.iter().map(|u| u.code.clone().unwrap()).collect();
        assert_eq!(codes, vec!["100", "101", "102"]);
    }

    #[test]
    fn test_duplicate_code_no_partial_creation() {
        let mut store = Store::open_in_memory().unwrap();
        store.create_units("Oscilloscope", 2, Some(101)).unwrap();

        // codes 99, 100, 101 - the last collides, so none must be created
        let err = store.create_units("Oscilloscope", 3, Some(99)).unwrap_err();
        assert!(matches!(err, StockError::DuplicateCode { ref code, .. } if code == "101"));
        assert_eq!(store.count_available("Oscilloscope").unwrap(), 2);
        assert_eq!(store.units_named("Oscilloscope").unwrap().len(), 2);
    }

    #[test]
    fn test_same_code_different_name_is_fine() {
        let mut store = Store::open_in_memory().unwrap();
        store.create_units("Multimeter", 1, Some(7)).unwrap();
        store.create_units("Oscilloscope", 1, Some(7)).unwrap();
        assert_eq!(store.count_available("Multimeter").unwrap(), 1);
        assert_eq!(store.count_available("Oscilloscope").unwrap(), 1);
    }

    #[test]
    fn test_delete_available_unit() {
        let mut store = Store::open_in_memory().unwrap();
        let units = store.create_units("Resistor 100", 1, None).unwrap();
        store.delete_unit(units[0].id).unwrap();
        assert_eq!(store.count_available("Resistor 100").unwrap(), 0);
    }

    #[test]
    fn test_delete_missing_unit() {
        let mut store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.delete_unit(42),
            Err(StockError::UnitNotFound(42))
        ));
    }

    #[test]
    fn test_zero_count_rejected() {
        let mut store = Store::open_in_memory().unwrap();
        assert!(matches!(
            store.create_units("Resistor 100", 0, None),
            Err(StockError::InvalidQuantity { .. })
        ));
    }
}
