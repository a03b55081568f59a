/// Human-readable sizes and savings figures for the image cards

/// Unit labels, indexed by power of 1024
const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Default number of decimal places shown in size labels
pub const DEFAULT_DECIMALS: usize = 2;

/// Format a byte count with the default precision
pub fn format_size(bytes: u64) -> String {
    format_bytes(bytes, DEFAULT_DECIMALS)
}

/// Format a byte count as `"<value> <unit>"`
///
/// The unit is the largest power of 1024 not exceeding `bytes` (capped at GB).
/// The value is rounded to `decimals` places and trailing zeros are dropped,
/// so 1536 bytes is `"1.5 KB"` and 1024 bytes is `"1 KB"`.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut index = 0;
    let mut scale: u64 = 1;
    while index + 1 < UNITS.len() && bytes / scale >= 1024 {
        scale *= 1024;
        index += 1;
    }

    let value = bytes as f64 / scale as f64;
    // Ties round up; printing the f64 with `{}` drops trailing zeros
    let factor = 10f64.powi(decimals.min(15) as i32);
    let rounded = (value * factor).round() / factor;

    format!("{} {}", rounded, UNITS[index])
}

/// Percentage saved by compression: `round((1 - compressed / original) * 100)`
///
/// Negative when the output is larger than the input. Returns `None` for an
/// empty original, where the ratio is undefined.
pub fn savings_percent(original: u64, compressed: u64) -> Option<i64> {
    if original == 0 {
        return None;
    }

    let saved = (1.0 - compressed as f64 / original as f64) * 100.0;
    // Halves round toward +infinity
    Some((saved + 0.5).floor() as i64)
}
