pub const SCHEMA: &str = r#"
-- Images table: one row per cataloged image. Rows are append-only; the
-- catalog defines no update or delete operations.
CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    url TEXT NOT NULL,
    file_size INTEGER NOT NULL,        -- always bytes, normalized on insert
    rating REAL NOT NULL,
    ranking REAL NOT NULL,
    tags TEXT NOT NULL DEFAULT '',     -- comma-separated
    creation_time TEXT NOT NULL,       -- 'YYYY-MM-DD HH:MM:SS'
    person TEXT NOT NULL DEFAULT '',
    location TEXT NOT NULL DEFAULT '',
    type TEXT NOT NULL DEFAULT '',
    thumbnail_path TEXT                -- NULL when no original image was supplied
);

-- Indexes for the display sort and time-based lookups
CREATE INDEX IF NOT EXISTS idx_images_ranking ON images(ranking);
CREATE INDEX IF NOT EXISTS idx_images_creation_time ON images(creation_time);
"#;
