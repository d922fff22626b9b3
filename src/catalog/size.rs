//! File-size normalization and display formatting.
//!
//! Sizes are entered either as a plain byte count ("2048000") or as a
//! human-readable string ("1.5 MB"). Binary units throughout: 1 KB = 1024 B.

use crate::catalog::CatalogError;

const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;
const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Parse a file-size string into a byte count.
///
/// Accepts a bare integer (taken as bytes) or `"<number> <unit>"` with a
/// unit of B, KB, MB or GB (case-insensitive).
pub fn parse_file_size(input: &str) -> Result<i64, CatalogError> {
    let trimmed = input.trim();

    if let Ok(bytes) = trimmed.parse::<i64>() {
        if bytes < 0 {
            return Err(CatalogError::Parse(format!(
                "file size cannot be negative: {trimmed:?}"
            )));
        }
        return Ok(bytes);
    }

    let mut parts = trimmed.split_whitespace();
    let (number, unit) = match (parts.next(), parts.next(), parts.next()) {
        (Some(number), Some(unit), None) => (number, unit),
        _ => {
            return Err(CatalogError::Parse(format!(
                "expected '<number> <unit>', got {input:?}"
            )))
        }
    };

    let value: f64 = number.parse().map_err(|_| {
        CatalogError::Parse(format!("invalid file size number: {number:?}"))
    })?;
    if value < 0.0 {
        return Err(CatalogError::Parse(format!(
            "file size cannot be negative: {trimmed:?}"
        )));
    }

    let multiplier = match unit.to_ascii_uppercase().as_str() {
        "B" => 1.0,
        "KB" => KB,
        "MB" => MB,
        "GB" => GB,
        _ => {
            return Err(CatalogError::Parse(format!(
                "unknown file size unit: {unit:?}"
            )))
        }
    };

    Ok((value * multiplier) as i64)
}

/// Format a byte count for display, choosing the largest binary unit that
/// keeps the value above one.
pub fn format_file_size(bytes: i64) -> String {
    let bytes_f = bytes as f64;
    if bytes_f < KB {
        format!("{bytes} B")
    } else if bytes_f < MB {
        format!("{:.2} KB", bytes_f / KB)
    } else if bytes_f < GB {
        format!("{:.2} MB", bytes_f / MB)
    } else {
        format!("{:.2} GB", bytes_f / GB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_units() {
        assert_eq!(parse_file_size("1.5 MB").unwrap(), 1_572_864);
        assert_eq!(parse_file_size("1 KB").unwrap(), 1024);
        assert_eq!(parse_file_size("512 B").unwrap(), 512);
        assert_eq!(parse_file_size("2 GB").unwrap(), 2_147_483_648);
    }

    #[test]
    fn test_parse_plain_byte_count() {
        assert_eq!(parse_file_size("2048000").unwrap(), 2_048_000);
        assert_eq!(parse_file_size("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_file_size("1.5 mb").unwrap(), 1_572_864);
        assert_eq!(parse_file_size("2 kb").unwrap(), 2048);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(parse_file_size("").is_err());
        assert!(parse_file_size("lots").is_err());
        assert!(parse_file_size("1.5").is_err());
        assert!(parse_file_size("1.5 MB extra").is_err());
        assert!(parse_file_size("1.5 parsecs").is_err());
        assert!(parse_file_size("-3 MB").is_err());
        assert!(parse_file_size("-100").is_err());
    }

    #[test]
    fn test_format_unit_boundaries() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1_572_864), "1.50 MB");
        assert_eq!(format_file_size(2_147_483_648), "2.00 GB");
    }

    #[test]
    fn test_parse_format_round_trip() {
        let bytes = parse_file_size("1.5 MB").unwrap();
        assert_eq!(format_file_size(bytes), "1.50 MB");
    }
}
