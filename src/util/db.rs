use std::path::{Path, PathBuf};

use rusqlite::{params, params_from_iter, Connection, Result};

use super::contract::{Column, TABLE_NAME};
use super::records::{Product, ProductValues, Value};

/// Bumped whenever the products schema changes.
pub const DATABASE_VERSION: i64 = 5;

/// Which rows an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Id(i64),
}

impl Selection {
    fn where_clause(&self) -> (String, Vec<Value>) {
        match self {
            Selection::All => (String::new(), Vec::new()),
            Selection::Id(id) => (
                format!(" WHERE {}=?", Column::Id.name()),
                vec![Value::Integer(*id)],
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    fn order_clause(&self) -> String {
        format!(
            " ORDER BY {} {}",
            self.column.name(),
            if self.descending { "DESC" } else { "ASC" }
        )
    }
}

/// Owns the database file and the products schema.
#[derive(Debug, Clone)]
pub struct DbHelper {
    db_path: PathBuf,
}

impl DbHelper {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Opens a connection, creating the products table on first use.
    pub fn connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                        _id         INTEGER PRIMARY KEY AUTOINCREMENT,
                        brand       TEXT,
                        model       TEXT NOT NULL,
                        price       INTEGER NOT NULL DEFAULT 0,
                        quantity    INTEGER NOT NULL DEFAULT 0,
                        supplier    TEXT NOT NULL,
                        email       TEXT,
                        image       TEXT);
             PRAGMA user_version = {};",
            TABLE_NAME, DATABASE_VERSION
        ))?;

        Ok(conn)
    }

    pub fn insert(&self, values: &ProductValues) -> Result<i64> {
        let conn = self.connection()?;

        let columns = values
            .iter()
            .map(|(column, _)| column.name())
            .collect::<Vec<_>>();
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>();

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", TABLE_NAME)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                TABLE_NAME,
                columns.join(","),
                placeholders.join(",")
            )
        };

        conn.prepare(&sql)?
            .execute(params_from_iter(values.iter().map(|(_, value)| value)))?;

        Ok(conn.last_insert_rowid())
    }

    pub fn query(&self, selection: Selection, sort: Option<SortOrder>) -> Result<Vec<Product>> {
        let conn = self.connection()?;

        let (filter, args) = selection.where_clause();
        let columns = Column::ALL.map(|column| column.name()).join(",");
        let sql = format!(
            "SELECT {} FROM {}{}{}",
            columns,
            TABLE_NAME,
            filter,
            sort.map(|sort| sort.order_clause()).unwrap_or_default()
        );

        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map(params_from_iter(args.iter()), Product::from_row)?
            .collect::<Result<Vec<_>>>()?;

        Ok(products)
    }

    pub fn update(&self, values: &ProductValues, selection: Selection) -> Result<usize> {
        if values.is_empty() {
            return Ok(0);
        }
        let conn = self.connection()?;

        let assignments = values
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{}=?{}", column.name(), i + 1))
            .collect::<Vec<_>>();
        let (filter, args) = selection.where_clause();
        let filter = filter.replace('?', &format!("?{}", values.len() + 1));

        let sql = format!(
            "UPDATE {} SET {}{}",
            TABLE_NAME,
            assignments.join(","),
            filter
        );

        let params = values
            .iter()
            .map(|(_, value)| value)
            .chain(args.iter())
            .collect::<Vec<_>>();
        let rows = conn.prepare(&sql)?.execute(params_from_iter(params))?;

        Ok(rows)
    }

    pub fn delete(&self, selection: Selection) -> Result<usize> {
        let conn = self.connection()?;

        let rows = match selection {
            Selection::All => conn.execute(&format!("DELETE FROM {}", TABLE_NAME), [])?,
            Selection::Id(id) => conn.execute(
                &format!("DELETE FROM {} WHERE {}=?1", TABLE_NAME, Column::Id.name()),
                params![id],
            )?,
        };

        Ok(rows)
    }
}
