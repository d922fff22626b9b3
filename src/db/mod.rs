//! SQLite-backed catalog store.
//!
//! The connection is opened once at startup and held for the lifetime of the
//! process. The store assumes a single writer; no transaction ever spans
//! more than one record.

mod schema;

use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

use crate::catalog::CatalogError;

pub use schema::SCHEMA;

/// One row of the `images` table.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    pub id: i64,
    pub filename: String,
    pub url: String,
    pub file_size: i64,
    pub rating: f64,
    pub ranking: f64,
    pub tags: String,
    pub creation_time: String,
    pub person: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail_path: Option<String>,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn initialize(&self) -> Result<(), CatalogError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Append one catalog record and return its rowid.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_image(
        &self,
        filename: &str,
        url: &str,
        file_size: i64,
        rating: f64,
        ranking: f64,
        tags: &str,
        creation_time: &str,
        person: &str,
        location: &str,
        kind: &str,
        thumbnail_path: Option<&str>,
    ) -> Result<i64, CatalogError> {
        self.conn.execute(
            r#"
            INSERT INTO images (filename, url, file_size, rating, ranking, tags,
                                creation_time, person, location, type, thumbnail_path)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            rusqlite::params![
                filename,
                url,
                file_size,
                rating,
                ranking,
                tags,
                creation_time,
                person,
                location,
                kind,
                thumbnail_path,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Read the full table in insertion order. Display ordering is applied
    /// by the caller, not the query.
    pub fn all_images(&self) -> Result<Vec<ImageRecord>, CatalogError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, filename, url, file_size, rating, ranking, tags,
                   creation_time, person, location, type, thumbnail_path
            FROM images
            ORDER BY id
            "#,
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    url: row.get(2)?,
                    file_size: row.get(3)?,
                    rating: row.get(4)?,
                    ranking: row.get(5)?,
                    tags: row.get(6)?,
                    creation_time: row.get(7)?,
                    person: row.get(8)?,
                    location: row.get(9)?,
                    kind: row.get(10)?,
                    thumbnail_path: row.get(11)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn count_images(&self) -> Result<i64, CatalogError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }
}
