//! Schema introspection queries.

use super::Database;
use crate::error::StorageResult;
use serde::Serialize;

/// Information about a foreign key relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKeyInfo {
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

/// A table and the foreign keys it declares.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub foreign_keys: Vec<ForeignKeyInfo>,
}

impl Database {
    /// Names of the user tables, excluding SQLite internals and refinery bookkeeping.
    pub fn get_table_names(&self) -> StorageResult<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master
                 WHERE type = 'table'
                 AND name NOT LIKE 'sqlite_%'
                 AND name NOT LIKE 'refinery_%'
                 ORDER BY name",
            )?;

            let names: Vec<String> = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(names)
        })
    }

    /// Foreign keys declared by a table. Empty if the table has none or does not exist.
    pub fn get_foreign_keys(&self, table_name: &str) -> StorageResult<Vec<ForeignKeyInfo>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT \"from\", \"table\", COALESCE(\"to\", '') FROM pragma_foreign_key_list(?1) ORDER BY id",
            )?;

            let foreign_keys = stmt
                .query_map([table_name], |row| {
                    Ok(ForeignKeyInfo {
                        from_column: row.get(0)?,
                        to_table: row.get(1)?,
                        to_column: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(foreign_keys)
        })
    }

    /// Every user table with its foreign keys.
    pub fn get_schema(&self) -> StorageResult<Vec<TableInfo>> {
        self.get_table_names()?
            .into_iter()
            .map(|name| {
                let foreign_keys = self.get_foreign_keys(&name)?;
                Ok(TableInfo { name, foreign_keys })
            })
            .collect()
    }
}
