//! The catalog writer: normalizes incoming metadata, generates a thumbnail
//! when an original image is supplied, and appends one record to the store.
//!
//! There is no partial-success state. If thumbnailing fails, no row is
//! inserted; every failure propagates to the caller untouched.

pub mod size;

use chrono::{Local, NaiveDateTime};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::{Database, ImageRecord};
use crate::thumbs::ThumbnailGenerator;

pub use size::{format_file_size, parse_file_size};

/// Storage format for `creation_time`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder shown for records without a thumbnail.
pub const DEFAULT_THUMBNAIL: &str = "default_thumbnail.webp";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Metadata for a catalog insert, as entered by the user. `file_size` and
/// `creation_time` are raw strings and get normalized by `add_image`.
#[derive(Debug, Clone, Default)]
pub struct NewImage {
    pub filename: String,
    pub url: String,
    pub file_size: String,
    pub rating: f64,
    pub ranking: f64,
    pub tags: String,
    pub creation_time: String,
    pub person: String,
    pub location: String,
    /// Free-form image category (the `type` column).
    pub kind: String,
    pub original_image_path: Option<PathBuf>,
}

pub struct Catalog {
    db: Database,
    thumbnails: ThumbnailGenerator,
}

impl Catalog {
    pub fn new(db: Database, thumbnails: ThumbnailGenerator) -> Self {
        Self { db, thumbnails }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Normalize, thumbnail if an original image was supplied, and insert
    /// one record. Returns the new record's id.
    pub fn add_image(&self, image: &NewImage) -> Result<i64, CatalogError> {
        let file_size = parse_file_size(&image.file_size)?;
        let creation_time = normalize_creation_time(&image.creation_time)?;

        let thumbnail_path = match &image.original_image_path {
            Some(original) => Some(self.thumbnails.generate(original)?),
            None => None,
        };
        let thumbnail_str = thumbnail_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let id = self.db.insert_image(
            &image.filename,
            &image.url,
            file_size,
            image.rating,
            image.ranking,
            &image.tags,
            &creation_time,
            &image.person,
            &image.location,
            &image.kind,
            thumbnail_str.as_deref(),
        )?;

        tracing::info!(
            id,
            filename = %image.filename,
            size_bytes = file_size,
            thumbnail = thumbnail_str.as_deref().unwrap_or("none"),
            "Image cataloged"
        );
        Ok(id)
    }
}

/// An empty creation time becomes the current local time; anything else must
/// already match the storage format and is stored verbatim.
fn normalize_creation_time(raw: &str) -> Result<String, CatalogError> {
    if raw.is_empty() {
        return Ok(Local::now().format(TIMESTAMP_FORMAT).to_string());
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        CatalogError::Parse(format!("invalid creation time {raw:?}: {e}"))
    })?;
    Ok(raw.to_string())
}

/// Order records for display: ranking ascending, ties broken by rating
/// descending. Pure over the slice, independent of store query order.
pub fn sort_for_display(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| {
        a.ranking
            .partial_cmp(&b.ranking)
            .unwrap_or(Ordering::Equal)
            .then(b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
    });
}

/// Basename of the thumbnail for display, or the default placeholder when
/// the record has none.
pub fn thumbnail_display_name(thumbnail_path: Option<&str>) -> String {
    match thumbnail_path {
        Some(path) => Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string()),
        None => DEFAULT_THUMBNAIL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThumbnailConfig;
    use image::RgbImage;
    use tempfile::tempdir;

    fn test_catalog(dir: &Path) -> Catalog {
        let db = Database::open(&dir.join("catalog.db")).unwrap();
        db.initialize().unwrap();
        let thumbnails = ThumbnailGenerator::new(&ThumbnailConfig {
            path: dir.join("thumbnails"),
            max_width: 150,
            max_height: 150,
            quality: 80,
        });
        Catalog::new(db, thumbnails)
    }

    fn record(filename: &str, rating: f64, ranking: f64) -> ImageRecord {
        ImageRecord {
            id: 0,
            filename: filename.to_string(),
            url: String::new(),
            file_size: 0,
            rating,
            ranking,
            tags: String::new(),
            creation_time: String::new(),
            person: String::new(),
            location: String::new(),
            kind: String::new(),
            thumbnail_path: None,
        }
    }

    #[test]
    fn test_empty_creation_time_becomes_now() {
        let stored = normalize_creation_time("").unwrap();
        let parsed = NaiveDateTime::parse_from_str(&stored, TIMESTAMP_FORMAT).unwrap();
        let drift = Local::now().naive_local() - parsed;
        assert!(drift.num_seconds().abs() < 5);
    }

    #[test]
    fn test_explicit_creation_time_stored_verbatim() {
        let stored = normalize_creation_time("2024-09-10 16:02:00").unwrap();
        assert_eq!(stored, "2024-09-10 16:02:00");
    }

    #[test]
    fn test_malformed_creation_time_is_a_parse_error() {
        assert!(matches!(
            normalize_creation_time("yesterday"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            normalize_creation_time("2024-09-10"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_add_image_without_original() {
        let dir = tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let id = catalog
            .add_image(&NewImage {
                filename: "mountain.png".to_string(),
                url: "http://example.com/mountain.png".to_string(),
                file_size: "2048000".to_string(),
                rating: 4.0,
                ranking: 2.0,
                tags: "mountain,nature".to_string(),
                location: "Alps".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(id, 1);

        let records = catalog.db().all_images().unwrap();
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.file_size, 2_048_000);
        assert!(rec.thumbnail_path.is_none());

        let parsed =
            NaiveDateTime::parse_from_str(&rec.creation_time, TIMESTAMP_FORMAT).unwrap();
        let drift = Local::now().naive_local() - parsed;
        assert!(drift.num_seconds().abs() < 5);
    }

    #[test]
    fn test_add_image_with_original_writes_thumbnail() {
        let dir = tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let original = dir.path().join("big.png");
        RgbImage::new(2000, 2000).save(&original).unwrap();

        catalog
            .add_image(&NewImage {
                filename: "big.png".to_string(),
                url: "http://example.com/big.png".to_string(),
                file_size: "1.5 MB".to_string(),
                rating: 5.0,
                ranking: 1.0,
                creation_time: "2024-09-10 16:02:00".to_string(),
                original_image_path: Some(original),
                ..Default::default()
            })
            .unwrap();

        let records = catalog.db().all_images().unwrap();
        assert_eq!(records[0].file_size, 1_572_864);

        let thumb_path = records[0].thumbnail_path.as_deref().unwrap();
        assert!(thumb_path.ends_with(".webp"));
        let thumb = image::open(thumb_path).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (150, 150));
    }

    #[test]
    fn test_thumbnail_failure_prevents_insert() {
        let dir = tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let bogus = dir.path().join("bogus.png");
        std::fs::write(&bogus, b"not an image").unwrap();

        let err = catalog
            .add_image(&NewImage {
                filename: "bogus.png".to_string(),
                file_size: "1 KB".to_string(),
                original_image_path: Some(bogus),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
        assert_eq!(catalog.db().count_images().unwrap(), 0);
    }

    #[test]
    fn test_bad_file_size_prevents_insert() {
        let dir = tempdir().unwrap();
        let catalog = test_catalog(dir.path());

        let err = catalog
            .add_image(&NewImage {
                filename: "x.png".to_string(),
                file_size: "huge".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert_eq!(catalog.db().count_images().unwrap(), 0);
    }

    #[test]
    fn test_display_sort_ranking_then_rating() {
        let mut records = vec![
            record("c", 3.0, 2.0),
            record("a", 2.0, 1.0),
            record("b", 5.0, 1.0),
            record("d", 4.0, 2.0),
        ];
        sort_for_display(&mut records);
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, ["b", "a", "d", "c"]);
    }

    #[test]
    fn test_thumbnail_display_name() {
        assert_eq!(
            thumbnail_display_name(Some("/var/thumbs/sunset.webp")),
            "sunset.webp"
        );
        assert_eq!(thumbnail_display_name(None), DEFAULT_THUMBNAIL);
    }
}
