//! SQLite serialization for typed enums
//!
//! Implements ToSql and FromSql for LineStatus, Role, and Term
//! to enable typed storage and retrieval from SQLite.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::entities::{LineStatus, Role, Term};

// =========================================================================
// LineStatus - ToSql/FromSql
// =========================================================================

impl ToSql for LineStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for LineStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|e: String| FromSqlError::Other(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            ))))
    }
}

// =========================================================================
// Role - ToSql/FromSql
// =========================================================================

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|e: String| FromSqlError::Other(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            ))))
    }
}

// =========================================================================
// Term - ToSql/FromSql
// =========================================================================

impl ToSql for Term {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Term {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|e: String| FromSqlError::Other(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                e,
            ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_status_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE test (status TEXT)", []).unwrap();

        for status in [
            LineStatus::Requested,
            LineStatus::Loaned,
            LineStatus::Returned,
            LineStatus::Denied,
        ] {
            conn.execute("INSERT INTO test (status) VALUES (?1)", [status])
                .unwrap();
        }

        let mut stmt = conn.prepare("SELECT status FROM test ORDER BY rowid").unwrap();
        let back: Vec<LineStatus> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(
            back,
            vec![
                LineStatus::Requested,
                LineStatus::Loaned,
                LineStatus::Returned,
                LineStatus::Denied,
            ]
        );
    }

    #[test]
    fn test_role_and_term_roundtrip() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE test (role TEXT, term TEXT)", [])
            .unwrap();
        conn.execute(
            "INSERT INTO test (role, term) VALUES (?1, ?2)",
            rusqlite::params![Role::Teacher, Term::III],
        )
        .unwrap();

        let (role, term): (Role, Term) = conn
            .query_row("SELECT role, term FROM test", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(role, Role::Teacher);
        assert_eq!(term, Term::III);
    }

    #[test]
    fn test_invalid_status_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE test (status TEXT)", []).unwrap();
        conn.execute("INSERT INTO test (status) VALUES ('prestado')", [])
            .unwrap();

        let result: rusqlite::Result<LineStatus> =
            conn.query_row("SELECT status FROM test", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
