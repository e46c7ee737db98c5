use anyhow::{bail, Result};

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Split a human-readable size into its numeric part and the unit's
/// multiplier in bytes.
///
/// Units step by 1024: B, KB, MB, GB, TB (case-insensitive, optional space).
fn split_size(s: &str) -> Result<(f64, u64)> {
    let s = s.trim();

    if s.is_empty() {
        bail!("Empty size string");
    }

    // Find where the number ends and unit begins
    let mut num_end = s.len();
    for (i, c) in s.char_indices() {
        if !c.is_ascii_digit() && c != '.' {
            num_end = i;
            break;
        }
    }

    if num_end == 0 {
        bail!("Size string must start with a number: {}", s);
    }

    let num_str = &s[..num_end];
    let unit_str = s[num_end..].trim().to_uppercase();

    let num: f64 = num_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid number: {}", num_str))?;

    let multiplier = match unit_str.as_str() {
        "" | "B" => 1u64,
        "KB" => 1024u64,
        "MB" => 1024u64 * 1024,
        "GB" => 1024u64 * 1024 * 1024,
        "TB" => 1024u64 * 1024 * 1024 * 1024,
        _ => bail!("Unknown size unit: {}. Supported: B, KB, MB, GB, TB", unit_str),
    };

    Ok((num, multiplier))
}

/// Parse human-readable size strings to bytes
///
/// Examples:
/// - "100MB"  -> 104_857_600
/// - "2.5 MB" -> 2_621_440
/// - "500KB"  -> 512_000
pub fn parse_size(s: &str) -> Result<u64> {
    let (num, multiplier) = split_size(s)?;
    Ok((num * multiplier as f64) as u64)
}

/// Parse a size string straight to megabytes without rounding through bytes.
pub fn parse_size_mb(s: &str) -> Result<f64> {
    let (num, multiplier) = split_size(s)?;
    Ok(num * (multiplier as f64 / BYTES_PER_MB))
}

/// Size in megabytes for aggregation. Missing or unparsable sizes count as 0.
pub fn size_mb_or_zero(s: Option<&str>) -> f64 {
    let Some(s) = s else {
        return 0.0;
    };
    match parse_size_mb(s) {
        Ok(mb) => mb,
        Err(e) => {
            log::warn!("ignoring unparsable file size {:?}: {}", s, e);
            0.0
        }
    }
}

/// Format bytes with a 1024 base and one decimal: `1.2 MB`, `0 B`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100MB").unwrap(), 104_857_600);
        assert_eq!(parse_size("1GB").unwrap(), 1_073_741_824);
        assert_eq!(parse_size("500KB").unwrap(), 512_000);
        assert_eq!(parse_size("1024B").unwrap(), 1024);
        assert_eq!(parse_size("100").unwrap(), 100);
        assert_eq!(parse_size("2.5 MB").unwrap(), 2_621_440);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(parse_size("100mb").unwrap(), parse_size("100MB").unwrap());
        assert_eq!(parse_size("1 gb").unwrap(), parse_size("1GB").unwrap());
    }

    #[test]
    fn test_parse_size_errors() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("12 PB").is_err());
        assert!(parse_size("1.2.3 MB").is_err());
    }

    #[test]
    fn test_parse_size_mb_uses_1024_steps() {
        assert!(approx(parse_size_mb("2.5 MB").unwrap(), 2.5));
        assert!(approx(parse_size_mb("512 KB").unwrap(), 0.5));
        assert!(approx(parse_size_mb("1 GB").unwrap(), 1024.0));
        assert!(approx(parse_size_mb("1048576 B").unwrap(), 1.0));
    }

    #[test]
    fn test_unparsable_counts_as_zero() {
        assert_eq!(size_mb_or_zero(None), 0.0);
        assert_eq!(size_mb_or_zero(Some("unknown")), 0.0);
        assert!(approx(size_mb_or_zero(Some("1.2 MB")), 1.2));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_258_291), "1.2 MB");
        assert_eq!(format_file_size(1_073_741_824), "1 GB");
    }
}
