//! SQLite-backed store for the stockroom ledger
//!
//! One [`Store`] owns the connection, creates the schema on open, and exposes
//! row-level CRUD for users, courses, groups and orders. The invariant-bearing
//! operations (reservation, lifecycle, sweep) live in their own modules and
//! run inside `BEGIN IMMEDIATE` transactions obtained from [`Store::immediate_tx`]:
//! SQLite's single-writer lock makes every read-then-write section exclusive
//! against concurrent writers, which is what the reservation race needs.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::core::error::{Result, StockError};
use crate::entities::{
    ClassGroup, Course, LineItem, LineStatus, Order, OrderAttention, Role, StockLine, Unit, User,
};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS units (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    code         TEXT,
    is_available INTEGER NOT NULL DEFAULT 1
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_units_name_code
    ON units(name, code) WHERE code IS NOT NULL;
CREATE INDEX IF NOT EXISTS idx_units_name ON units(name);

CREATE TABLE IF NOT EXISTS users (
    id    INTEGER PRIMARY KEY,
    name  TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role  TEXT NOT NULL DEFAULT 'student'
);

CREATE TABLE IF NOT EXISTS courses (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    code TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS class_groups (
    id           INTEGER PRIMARY KEY,
    course_id    INTEGER NOT NULL REFERENCES courses(id),
    number       INTEGER NOT NULL DEFAULT 1,
    year         INTEGER NOT NULL,
    term         TEXT NOT NULL DEFAULT 'I',
    professor_id INTEGER NOT NULL REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS group_members (
    group_id   INTEGER NOT NULL REFERENCES class_groups(id),
    student_id INTEGER NOT NULL REFERENCES users(id),
    UNIQUE(group_id, student_id)
);

CREATE TABLE IF NOT EXISTS orders (
    id       INTEGER PRIMARY KEY,
    group_id INTEGER NOT NULL REFERENCES class_groups(id)
);

CREATE TABLE IF NOT EXISTS order_members (
    order_id INTEGER NOT NULL REFERENCES orders(id),
    user_id  INTEGER NOT NULL REFERENCES users(id),
    UNIQUE(order_id, user_id)
);

CREATE TABLE IF NOT EXISTS line_items (
    id           INTEGER PRIMARY KEY,
    order_id     INTEGER NOT NULL REFERENCES orders(id),
    unit_id      INTEGER NOT NULL REFERENCES units(id),
    quantity     INTEGER NOT NULL CHECK (quantity >= 1),
    status       TEXT NOT NULL DEFAULT 'requested',
    requested_at TEXT NOT NULL,
    loaned_at    TEXT,
    returned_at  TEXT
);
CREATE INDEX IF NOT EXISTS idx_line_items_status ON line_items(status, requested_at);

CREATE TABLE IF NOT EXISTS line_item_units (
    line_item_id INTEGER NOT NULL REFERENCES line_items(id) ON DELETE CASCADE,
    unit_id      INTEGER NOT NULL REFERENCES units(id),
    UNIQUE(line_item_id, unit_id)
);
"#;

/// Encode a timestamp as fixed-width RFC 3339 text (microsecond precision,
/// always Z-suffixed) so lexicographic comparison matches chronological order.
pub(crate) fn encode_ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_ts(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

pub(crate) fn unit_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Unit> {
    Ok(Unit {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        is_available: row.get(3)?,
    })
}

pub(crate) fn line_item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LineItem> {
    let requested_at: String = row.get(5)?;
    let loaned_at: Option<String> = row.get(6)?;
    let returned_at: Option<String> = row.get(7)?;
    Ok(LineItem {
        id: row.get(0)?,
        order_id: row.get(1)?,
        unit_id: row.get(2)?,
        quantity: row.get(3)?,
        status: row.get(4)?,
        requested_at: decode_ts(5, &requested_at)?,
        loaned_at: loaned_at.as_deref().map(|s| decode_ts(6, s)).transpose()?,
        returned_at: returned_at.as_deref().map(|s| decode_ts(7, s)).transpose()?,
    })
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
    })
}

const LINE_ITEM_COLS: &str =
    "id, order_id, unit_id, quantity, status, requested_at, loaned_at, returned_at";

/// Fetch a unit by id. Works on a plain connection or inside a transaction.
pub(crate) fn fetch_unit(conn: &Connection, id: i64) -> Result<Unit> {
    conn.query_row(
        "SELECT id, name, code, is_available FROM units WHERE id = ?1",
        [id],
        unit_from_row,
    )
    .optional()?
    .ok_or(StockError::UnitNotFound(id))
}

/// Fetch a line item by id.
pub(crate) fn fetch_line_item(conn: &Connection, id: i64) -> Result<LineItem> {
    conn.query_row(
        &format!("SELECT {LINE_ITEM_COLS} FROM line_items WHERE id = ?1"),
        [id],
        line_item_from_row,
    )
    .optional()?
    .ok_or(StockError::LineItemNotFound(id))
}

/// Ids of the units claimed by a line item, in claim order.
pub(crate) fn claimed_unit_ids(conn: &Connection, line_item_id: i64) -> Result<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT unit_id FROM line_item_units WHERE line_item_id = ?1 ORDER BY unit_id")?;
    let ids = stmt
        .query_map([line_item_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

/// A pending or loaned line for one student, as handed to the letter renderer.
#[derive(Debug, Clone)]
pub struct PendingLine {
    pub line_item_id: i64,
    pub order_id: i64,
    pub item_name: String,
    pub code: Option<String>,
    pub quantity: u32,
    pub status: LineStatus,
    pub requested_at: DateTime<Utc>,
}

/// SQLite-backed store. One instance per process; concurrency correctness is
/// delegated to SQLite's transaction and locking machinery.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Open a throwaway in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // journal_mode returns a result row, so it cannot go through execute_batch
        let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Begin a `BEGIN IMMEDIATE` transaction: the write lock is taken up
    /// front, so every read inside observes state no other writer can change
    /// before we commit. This is the select-for-update of the design.
    pub(crate) fn immediate_tx(&mut self) -> Result<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ---- users ----

    pub fn add_user(&mut self, name: &str, email: &str, role: Role) -> Result<User> {
        self.conn.execute(
            "INSERT INTO users (name, email, role) VALUES (?1, ?2, ?3)",
            params![name, email, role],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        })
    }

    pub fn user_by_email(&self, email: &str) -> Result<User> {
        self.conn
            .query_row(
                "SELECT id, name, email, role FROM users WHERE email = ?1",
                [email],
                user_from_row,
            )
            .optional()?
            .ok_or_else(|| StockError::UserNotFound(email.to_string()))
    }

    pub fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        let mut out = Vec::new();
        match role {
            Some(role) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, email, role FROM users WHERE role = ?1 ORDER BY name",
                )?;
                for user in stmt.query_map([role], user_from_row)? {
                    out.push(user?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT id, name, email, role FROM users ORDER BY name")?;
                for user in stmt.query_map([], user_from_row)? {
                    out.push(user?);
                }
            }
        }
        Ok(out)
    }

    // ---- courses and groups ----

    pub fn add_course(&mut self, name: &str, code: &str) -> Result<Course> {
        self.conn.execute(
            "INSERT INTO courses (name, code) VALUES (?1, ?2)",
            params![name, code],
        )?;
        Ok(Course {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            code: code.to_string(),
        })
    }

    pub fn course_by_code(&self, code: &str) -> Result<Option<Course>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, code FROM courses WHERE code = ?1",
                [code],
                |row| {
                    Ok(Course {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        code: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    pub fn list_courses(&self) -> Result<Vec<Course>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, code FROM courses ORDER BY name")?;
        let courses = stmt
            .query_map([], |row| {
                Ok(Course {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    code: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(courses)
    }

    pub fn add_group(
        &mut self,
        course_id: i64,
        number: u32,
        year: u32,
        term: crate::entities::Term,
        professor_id: i64,
    ) -> Result<ClassGroup> {
        self.conn.execute(
            "INSERT INTO class_groups (course_id, number, year, term, professor_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![course_id, number, year, term, professor_id],
        )?;
        Ok(ClassGroup {
            id: self.conn.last_insert_rowid(),
            course_id,
            number,
            year,
            term,
            professor_id,
        })
    }

    pub fn group(&self, id: i64) -> Result<ClassGroup> {
        self.conn
            .query_row(
                "SELECT id, course_id, number, year, term, professor_id
                 FROM class_groups WHERE id = ?1",
                [id],
                group_from_row,
            )
            .optional()?
            .ok_or(StockError::GroupNotFound(id))
    }

    /// Groups, newest semester first, optionally restricted to one course.
    pub fn list_groups(&self, course_id: Option<i64>) -> Result<Vec<ClassGroup>> {
        let mut out = Vec::new();
        match course_id {
            Some(course_id) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, course_id, number, year, term, professor_id
                     FROM class_groups WHERE course_id = ?1 ORDER BY year DESC, term DESC",
                )?;
                for group in stmt.query_map([course_id], group_from_row)? {
                    out.push(group?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, course_id, number, year, term, professor_id
                     FROM class_groups ORDER BY year DESC, term DESC",
                )?;
                for group in stmt.query_map([], group_from_row)? {
                    out.push(group?);
                }
            }
        }
        Ok(out)
    }

    pub fn enroll(&mut self, group_id: i64, student_id: i64) -> Result<()> {
        // verify the group exists so a typo fails loudly instead of inserting
        // an orphan membership row
        self.group(group_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO group_members (group_id, student_id) VALUES (?1, ?2)",
            params![group_id, student_id],
        )?;
        Ok(())
    }

    pub fn group_students(&self, group_id: i64) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name, u.email, u.role FROM users u
             JOIN group_members gm ON gm.student_id = u.id
             WHERE gm.group_id = ?1 ORDER BY u.name",
        )?;
        let users = stmt
            .query_map([group_id], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    // ---- orders ----

    /// Create an order for a group with its requesting students. Membership
    /// is immutable after creation except by admin edit.
    pub fn create_order(&mut self, group_id: i64, member_ids: &[i64]) -> Result<Order> {
        let tx = self.immediate_tx()?;
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM class_groups WHERE id = ?1)",
            [group_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StockError::GroupNotFound(group_id));
        }
        tx.execute("INSERT INTO orders (group_id) VALUES (?1)", [group_id])?;
        let order_id = tx.last_insert_rowid();
        for user_id in member_ids {
            tx.execute(
                "INSERT OR IGNORE INTO order_members (order_id, user_id) VALUES (?1, ?2)",
                params![order_id, user_id],
            )?;
        }
        tx.commit()?;
        Ok(Order {
            id: order_id,
            group_id,
        })
    }

    pub fn order(&self, id: i64) -> Result<Order> {
        self.conn
            .query_row(
                "SELECT id, group_id FROM orders WHERE id = ?1",
                [id],
                |row| {
                    Ok(Order {
                        id: row.get(0)?,
                        group_id: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or(StockError::OrderNotFound(id))
    }

    /// All orders, newest semester first (admin view).
    pub fn list_orders(&self) -> Result<Vec<Order>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id, o.group_id FROM orders o
             JOIN class_groups g ON g.id = o.group_id
             ORDER BY g.year DESC, g.term DESC, o.id",
        )?;
        let orders = stmt
            .query_map([], |row| {
                Ok(Order {
                    id: row.get(0)?,
                    group_id: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(orders)
    }

    pub fn orders_for_user(&self, user_id: i64) -> Result<Vec<Order>> {
        let mut stmt = self.conn.prepare(
            "SELECT o.id, o.group_id FROM orders o
             JOIN order_members om ON om.order_id = o.id
             JOIN class_groups g ON g.id = o.group_id
             WHERE om.user_id = ?1
             ORDER BY g.year DESC, g.term DESC, o.id",
        )?;
        let orders = stmt
            .query_map([user_id], |row| {
                Ok(Order {
                    id: row.get(0)?,
                    group_id: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(orders)
    }

    pub fn order_members(&self, order_id: i64) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name, u.email, u.role FROM users u
             JOIN order_members om ON om.user_id = u.id
             WHERE om.order_id = ?1 ORDER BY u.name",
        )?;
        let users = stmt
            .query_map([order_id], user_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    pub fn order_lines(&self, order_id: i64) -> Result<Vec<LineItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LINE_ITEM_COLS} FROM line_items WHERE order_id = ?1 ORDER BY id"
        ))?;
        let lines = stmt
            .query_map([order_id], line_item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }

    /// Does this order still need an admin decision, hold loaned stock, or
    /// is it fully settled?
    pub fn order_attention(&self, order_id: i64) -> Result<OrderAttention> {
        let statuses = self
            .order_lines(order_id)?
            .iter()
            .map(|line| line.status)
            .collect::<Vec<_>>();
        Ok(OrderAttention::from_statuses(&statuses))
    }

    // ---- line items and units ----

    pub fn line_item(&self, id: i64) -> Result<LineItem> {
        fetch_line_item(&self.conn, id)
    }

    pub fn unit(&self, id: i64) -> Result<Unit> {
        fetch_unit(&self.conn, id)
    }

    /// The exact units claimed by a line item.
    pub fn claimed_units(&self, line_item_id: i64) -> Result<Vec<Unit>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name, u.code, u.is_available FROM units u
             JOIN line_item_units lu ON lu.unit_id = u.id
             WHERE lu.line_item_id = ?1 ORDER BY u.id",
        )?;
        let units = stmt
            .query_map([line_item_id], unit_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(units)
    }

    /// Per-name stock summary for the catalog listing.
    pub fn stock_summary(&self) -> Result<Vec<StockLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, COUNT(*), SUM(is_available), SUM(code IS NOT NULL)
             FROM units GROUP BY name ORDER BY name",
        )?;
        let lines = stmt
            .query_map([], |row| {
                Ok(StockLine {
                    name: row.get(0)?,
                    total: row.get(1)?,
                    available: row.get(2)?,
                    coded: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }

    /// Every still-active (requested or loaned) line on any order the user
    /// belongs to. This is the query behind the loan-letter notification;
    /// rendering and delivery are the caller's business.
    pub fn pending_items_for(&self, user_id: i64) -> Result<Vec<PendingLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT li.id, li.order_id, u.name, u.code, li.quantity, li.status, li.requested_at
             FROM line_items li
             JOIN units u ON u.id = li.unit_id
             JOIN order_members om ON om.order_id = li.order_id
             WHERE om.user_id = ?1 AND li.status IN ('requested', 'loaned')
             ORDER BY li.requested_at, li.id",
        )?;
        let lines = stmt
            .query_map([user_id], |row| {
                let requested_at: String = row.get(6)?;
                Ok(PendingLine {
                    line_item_id: row.get(0)?,
                    order_id: row.get(1)?,
                    item_name: row.get(2)?,
                    code: row.get(3)?,
                    quantity: row.get(4)?,
                    status: row.get(5)?,
                    requested_at: decode_ts(6, &requested_at)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lines)
    }
}

fn group_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClassGroup> {
    Ok(ClassGroup {
        id: row.get(0)?,
        course_id: row.get(1)?,
        number: row.get(2)?,
        year: row.get(3)?,
        term: row.get(4)?,
        professor_id: row.get(5)?,
    })
}
