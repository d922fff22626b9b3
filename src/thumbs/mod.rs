//! Thumbnail generation.
//!
//! Thumbnails are re-encoded as lossy WebP and written to a single output
//! directory under the source file's base name. Two sources sharing a base
//! name overwrite each other's thumbnail; there is no uniqueness check.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::CatalogError;
use crate::config::ThumbnailConfig;

pub struct ThumbnailGenerator {
    output_dir: PathBuf,
    max_width: u32,
    max_height: u32,
    quality: u8,
}

impl ThumbnailGenerator {
    pub fn new(config: &ThumbnailConfig) -> Self {
        Self {
            output_dir: config.path.clone(),
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.quality,
        }
    }

    fn ensure_output_dir(&self) -> Result<(), CatalogError> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)?;
        }
        Ok(())
    }

    /// Output path derived from the source base name, with a .webp extension.
    fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "thumbnail".to_string());
        self.output_dir.join(format!("{stem}.webp"))
    }

    /// Generate a thumbnail that fits within the configured bounding box,
    /// preserving aspect ratio. Sources already inside the box keep their
    /// dimensions but are still re-encoded. Returns the written path.
    pub fn generate(&self, source: &Path) -> Result<PathBuf, CatalogError> {
        self.ensure_output_dir()?;

        let img = image::open(source)?;
        // thumbnail() scales up as well as down; sources already inside the
        // bounding box must keep their dimensions.
        let thumb = if img.width() <= self.max_width && img.height() <= self.max_height {
            img
        } else {
            img.thumbnail(self.max_width, self.max_height)
        };

        let out_path = self.output_path(source);
        write_webp(&thumb, &out_path, self.quality)?;

        tracing::debug!(
            source = %source.display(),
            thumbnail = %out_path.display(),
            "Generated thumbnail"
        );
        Ok(out_path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Encode an image as lossy WebP at the given quality (0-100) and write it
/// to `dest`.
pub fn write_webp(img: &image::DynamicImage, dest: &Path, quality: u8) -> Result<(), CatalogError> {
    let rgb = img.to_rgb8();
    let encoder = webp::Encoder::from_rgb(&rgb, rgb.width(), rgb.height());
    let encoded = encoder.encode(quality as f32);
    fs::write(dest, &*encoded)?;
    Ok(())
}

/// Convert a single image to WebP in `dest_dir` without resizing, keeping
/// the source base name. Returns the output path and the source and output
/// sizes in bytes.
pub fn convert_to_webp(
    source: &Path,
    dest_dir: &Path,
    quality: u8,
) -> Result<(PathBuf, u64, u64), CatalogError> {
    fs::create_dir_all(dest_dir)?;

    let img = image::open(source)?;
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string());
    let out_path = dest_dir.join(format!("{stem}.webp"));
    write_webp(&img, &out_path, quality)?;

    let original_size = fs::metadata(source)?.len();
    let converted_size = fs::metadata(&out_path)?.len();
    Ok((out_path, original_size, converted_size))
}
