//! Durable descriptor storage.
//!
//! A [`DescriptorStore`] maps each structure's unique identifier to its
//! feature values and target label in one SQLite table: an implicit `uuid`
//! primary-key column followed by one `REAL` column per declared descriptor
//! name. The schema is fixed at creation but extensible — columns may be
//! appended later and are default-populated for existing rows.
//!
//! One store owns one connection; Rust ownership is the single-writer
//! serialization, and SQLite commits synchronously, so every mutation is
//! durable before the next read observes it. Bulk inserts run inside a
//! transaction and abort wholesale on the first malformed row.

mod error;

pub use error::StoreError;

use std::path::Path;

use log::debug;
use rusqlite::Connection;

/// Identifier column present in every descriptor table.
pub const ID_COLUMN: &str = "uuid";

/// A named descriptor table backed by SQLite.
#[derive(Debug)]
pub struct DescriptorStore {
    conn: Connection,
    table: String,
}

impl DescriptorStore {
    /// Opens (or creates) the database file and binds to the given table.
    ///
    /// The table itself is not created until [`create`](Self::create).
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidName`] for a malformed table name;
    /// [`StoreError::Sqlite`] if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, StoreError> {
        validate_name(table)?;
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Opens an in-memory store (for tests).
    pub fn open_in_memory(table: &str) -> Result<Self, StoreError> {
        validate_name(table)?;
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }

    /// Declares the column schema: `uuid` plus one `REAL` column per name.
    ///
    /// # Errors
    ///
    /// [`StoreError::SchemaExists`] if the table was already created;
    /// [`StoreError::ColumnExists`] for a duplicate name in `names`;
    /// [`StoreError::InvalidName`] for a malformed column name.
    pub fn create(&mut self, names: &[&str]) -> Result<(), StoreError> {
        if self.table_exists()? {
            return Err(StoreError::SchemaExists {
                table: self.table.clone(),
            });
        }
        let mut seen = vec![ID_COLUMN.to_string()];
        for name in names {
            validate_name(name)?;
            if seen.iter().any(|s| s == name) {
                return Err(StoreError::ColumnExists {
                    column: (*name).to_string(),
                });
            }
            seen.push((*name).to_string());
        }

        let mut columns = vec![format!("{ID_COLUMN} TEXT PRIMARY KEY")];
        columns.extend(names.iter().map(|n| format!("\"{n}\" REAL")));
        self.conn.execute(
            &format!(
                "CREATE TABLE \"{}\" ({})",
                self.table,
                columns.join(", ")
            ),
            [],
        )?;
        self.bump_schema_version()?;
        debug!(
            "created descriptor table '{}' with {} value column(s)",
            self.table,
            names.len()
        );
        Ok(())
    }

    /// Bulk-inserts rows of `(unique_id, values)` in one transaction.
    ///
    /// `names` selects the value columns, in order; every row must carry
    /// exactly one value per name.
    ///
    /// # Errors
    ///
    /// [`StoreError::RowWidthMismatch`] aborts the whole batch with nothing
    /// written; [`StoreError::UnknownColumn`] for a name outside the schema.
    pub fn fill(&mut self, names: &[&str], rows: &[(String, Vec<f64>)]) -> Result<(), StoreError> {
        self.check_columns(names)?;
        for (i, (_, values)) in rows.iter().enumerate() {
            if values.len() != names.len() {
                return Err(StoreError::RowWidthMismatch {
                    row: i,
                    expected: names.len(),
                    got: values.len(),
                });
            }
        }

        let mut columns = vec![ID_COLUMN.to_string()];
        columns.extend(names.iter().map(|n| format!("\"{n}\"")));
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (unique_id, values) in rows {
                let mut params: Vec<&dyn rusqlite::ToSql> = vec![unique_id];
                for v in values {
                    params.push(v);
                }
                stmt.execute(params.as_slice())?;
            }
        }
        tx.commit()?;
        debug!("inserted {} row(s) into '{}'", rows.len(), self.table);
        Ok(())
    }

    /// Queries the requested value columns, optionally restricted to one
    /// identifier.
    ///
    /// Returns an empty vector — not an error — when no rows match.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownColumn`] for a name outside the schema.
    pub fn query(
        &self,
        names: &[&str],
        unique_id: Option<&str>,
    ) -> Result<Vec<Vec<f64>>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.check_columns(names)?;
        let quoted: Vec<String> = names.iter().map(|n| format!("\"{n}\"")).collect();
        let mut sql = format!(
            "SELECT {} FROM \"{}\"",
            quoted.join(", "),
            self.table
        );
        if unique_id.is_some() {
            sql.push_str(&format!(" WHERE {ID_COLUMN} = ?1"));
        }
        sql.push_str(" ORDER BY rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let map_row = |row: &rusqlite::Row| -> rusqlite::Result<Vec<f64>> {
            (0..names.len()).map(|i| row.get(i)).collect()
        };
        let rows = match unique_id {
            Some(id) => stmt.query_map([id], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
    }

    /// Returns every stored identifier, insertion order.
    pub fn ids(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ID_COLUMN} FROM \"{}\" ORDER BY rowid",
            self.table
        ))?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    /// Appends new `REAL` columns, default-populated with `0.0` for every
    /// existing row.
    ///
    /// # Errors
    ///
    /// [`StoreError::ColumnExists`] on a name collision;
    /// [`StoreError::InvalidName`] for a malformed name.
    pub fn create_column(&mut self, new_columns: &[&str]) -> Result<(), StoreError> {
        let existing = self.column_names()?;
        for name in new_columns {
            validate_name(name)?;
            if existing.iter().any(|c| c == name) {
                return Err(StoreError::ColumnExists {
                    column: (*name).to_string(),
                });
            }
        }
        for name in new_columns {
            self.conn.execute(
                &format!(
                    "ALTER TABLE \"{}\" ADD COLUMN \"{name}\" REAL DEFAULT 0.0",
                    self.table
                ),
                [],
            )?;
        }
        self.bump_schema_version()?;
        debug!(
            "added {} column(s) to '{}'",
            new_columns.len(),
            self.table
        );
        Ok(())
    }

    /// Sets a single cell by column name and identifier.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownColumn`] for a name outside the schema;
    /// [`StoreError::RowNotFound`] if the identifier is absent — the table
    /// is left unchanged.
    pub fn update(
        &mut self,
        descriptor: &str,
        new_data: f64,
        unique_id: &str,
    ) -> Result<(), StoreError> {
        self.check_columns(&[descriptor])?;
        let changed = self.conn.execute(
            &format!(
                "UPDATE \"{}\" SET \"{descriptor}\" = ?1 WHERE {ID_COLUMN} = ?2",
                self.table
            ),
            rusqlite::params![new_data, unique_id],
        )?;
        if changed == 0 {
            return Err(StoreError::RowNotFound {
                unique_id: unique_id.to_string(),
            });
        }
        Ok(())
    }

    /// The ordered schema, starting with the identifier column.
    pub fn column_names(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info(\"{}\")", self.table))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Monotonic schema version: bumped by [`create`](Self::create) and each
    /// [`create_column`](Self::create_column) migration.
    pub fn schema_version(&self) -> Result<i64, StoreError> {
        let version = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    fn bump_schema_version(&self) -> Result<(), StoreError> {
        let next = self.schema_version()? + 1;
        self.conn
            .pragma_update(None, "user_version", next)?;
        Ok(())
    }

    fn table_exists(&self) -> Result<bool, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [&self.table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn check_columns(&self, names: &[&str]) -> Result<(), StoreError> {
        let existing = self.column_names()?;
        for name in names {
            if !existing.iter().any(|c| c == name) {
                return Err(StoreError::UnknownColumn {
                    column: (*name).to_string(),
                });
            }
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if head_ok && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(StoreError::InvalidName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        let mut n: Vec<String> = (0..4).map(|i| format!("f{i}")).collect();
        n.push("energy".to_string());
        n
    }

    fn as_refs(names: &[String]) -> Vec<&str> {
        names.iter().map(String::as_str).collect()
    }

    fn filled_store() -> DescriptorStore {
        let mut store = DescriptorStore::open_in_memory("finger_vector").unwrap();
        let names = names();
        store.create(&as_refs(&names)).unwrap();
        let rows: Vec<(String, Vec<f64>)> = (0..3)
            .map(|i| {
                let values: Vec<f64> = (0..5).map(|j| (i * 5 + j) as f64).collect();
                (format!("cand-{i:03}"), values)
            })
            .collect();
        store.fill(&as_refs(&names), &rows).unwrap();
        store
    }

    #[test]
    fn round_trip_preserves_order_and_values() {
        let store = filled_store();
        let names = names();
        let rows = store.query(&as_refs(&names), Some("cand-001")).unwrap();
        assert_eq!(rows, vec![vec![5.0, 6.0, 7.0, 8.0, 9.0]]);
    }

    #[test]
    fn query_without_filter_returns_all_rows_in_insertion_order() {
        let store = filled_store();
        let rows = store.query(&["f0"], None).unwrap();
        assert_eq!(rows, vec![vec![0.0], vec![5.0], vec![10.0]]);
        assert_eq!(
            store.ids().unwrap(),
            vec!["cand-000", "cand-001", "cand-002"]
        );
    }

    #[test]
    fn missing_identifier_yields_empty_not_error() {
        let store = filled_store();
        let rows = store.query(&["f0"], Some("no-such-id")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn create_twice_fails() {
        let mut store = filled_store();
        let result = store.create(&["other"]);
        assert!(matches!(result, Err(StoreError::SchemaExists { .. })));
    }

    #[test]
    fn malformed_row_aborts_whole_batch() {
        let mut store = DescriptorStore::open_in_memory("finger_vector").unwrap();
        store.create(&["f0", "f1"]).unwrap();
        let rows = vec![
            ("a".to_string(), vec![1.0, 2.0]),
            ("b".to_string(), vec![3.0]),
        ];
        let result = store.fill(&["f0", "f1"], &rows);
        assert!(matches!(
            result,
            Err(StoreError::RowWidthMismatch {
                row: 1,
                expected: 2,
                got: 1
            })
        ));
        assert!(store.query(&["f0"], None).unwrap().is_empty());
    }

    #[test]
    fn new_column_backfills_existing_rows() {
        let mut store = filled_store();
        store.create_column(&["random"]).unwrap();

        let columns = store.column_names().unwrap();
        assert_eq!(columns.iter().filter(|c| *c == "random").count(), 1);
        let rows = store.query(&["random"], None).unwrap();
        assert_eq!(rows, vec![vec![0.0], vec![0.0], vec![0.0]]);

        let result = store.create_column(&["random"]);
        assert!(matches!(result, Err(StoreError::ColumnExists { .. })));
    }

    #[test]
    fn schema_version_tracks_migrations() {
        let mut store = DescriptorStore::open_in_memory("finger_vector").unwrap();
        assert_eq!(store.schema_version().unwrap(), 0);
        store.create(&["f0"]).unwrap();
        assert_eq!(store.schema_version().unwrap(), 1);
        store.create_column(&["random"]).unwrap();
        assert_eq!(store.schema_version().unwrap(), 2);
    }

    #[test]
    fn update_sets_one_cell() {
        let mut store = filled_store();
        store.create_column(&["random"]).unwrap();
        store.update("random", 0.42, "cand-001").unwrap();

        let rows = store.query(&["random"], None).unwrap();
        assert_eq!(rows, vec![vec![0.0], vec![0.42], vec![0.0]]);
    }

    #[test]
    fn update_of_absent_row_fails_and_changes_nothing() {
        let mut store = filled_store();
        let before = store.query(&["f0"], None).unwrap();
        let result = store.update("f0", 9.9, "no-such-id");
        assert!(matches!(result, Err(StoreError::RowNotFound { .. })));
        assert_eq!(store.query(&["f0"], None).unwrap(), before);
    }

    #[test]
    fn unknown_column_is_a_request_error() {
        let store = filled_store();
        let result = store.query(&["not_a_column"], None);
        assert!(matches!(result, Err(StoreError::UnknownColumn { .. })));
    }

    #[test]
    fn schema_is_ordered_with_uuid_first() {
        let store = filled_store();
        let columns = store.column_names().unwrap();
        assert_eq!(
            columns,
            vec!["uuid", "f0", "f1", "f2", "f3", "energy"]
        );
    }

    #[test]
    fn invalid_names_are_rejected() {
        let store = DescriptorStore::open_in_memory("t");
        assert!(store.is_ok());
        assert!(matches!(
            DescriptorStore::open_in_memory("bad table"),
            Err(StoreError::InvalidName { .. })
        ));
        let mut s = store.unwrap();
        assert!(matches!(
            s.create(&["ok", "not ok"]),
            Err(StoreError::InvalidName { .. })
        ));
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fpv_store.sqlite");
        {
            let mut store = DescriptorStore::open(&path, "finger_vector").unwrap();
            store.create(&["f0", "energy"]).unwrap();
            store
                .fill(
                    &["f0", "energy"],
                    &[("cand-000".to_string(), vec![1.5, -0.25])],
                )
                .unwrap();
        }
        let store = DescriptorStore::open(&path, "finger_vector").unwrap();
        let rows = store.query(&["f0", "energy"], Some("cand-000")).unwrap();
        assert_eq!(rows, vec![vec![1.5, -0.25]]);
    }
}
