//! Conversion between user-entered major units and on-chain minor units.

/// Parse decimal text (e.g. "0.01") into minor units.
///
/// Returns `None` for empty, non-numeric, non-finite or non-positive input,
/// and for amounts that round to zero minor units or overflow `u64`.
pub fn parse_minor_units(text: &str, units_per_major: u64) -> Option<u64> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let minor = (value * units_per_major as f64).round();
    if minor < 1.0 || minor >= u64::MAX as f64 {
        return None;
    }
    Some(minor as u64)
}

/// Major-unit value of `minor` for display.
pub fn to_major_units(minor: u64, units_per_major: u64) -> f64 {
    if units_per_major == 0 {
        return 0.0;
    }
    minor as f64 / units_per_major as f64
}

/// Format `minor` as major units with four decimals, e.g. "1.2500".
pub fn format_major_units(minor: u64, units_per_major: u64) -> String {
    format!("{:.4}", to_major_units(minor, units_per_major))
}
