//! Kubernetes quantity parsing for the metrics views

use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,
    #[error("invalid quantity: {0}")]
    Invalid(String),
}

const MIB: f64 = 1024.0 * 1024.0;

/// Parse a CPU quantity into cores.
///
/// Accepts nanocores (`n`), microcores (`u`), millicores (`m`) and bare core
/// counts: `"250m"` is 0.25, `"2000000n"` is 0.002.
pub fn parse_cpu(quantity: &str) -> Result<f64, QuantityError> {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return Err(QuantityError::Empty);
    }

    let (number, scale) = if let Some(n) = quantity.strip_suffix('n') {
        (n, 1e-9)
    } else if let Some(u) = quantity.strip_suffix('u') {
        (u, 1e-6)
    } else if let Some(m) = quantity.strip_suffix('m') {
        (m, 1e-3)
    } else {
        (quantity, 1.0)
    };

    parse_number(number, quantity).map(|n| n * scale)
}

/// Parse a memory quantity into mebibytes.
///
/// Binary suffixes (`Ki` through `Ei`) and decimal suffixes (`k` through
/// `E`) are supported; a bare number is a byte count.
pub fn parse_memory(quantity: &str) -> Result<f64, QuantityError> {
    let quantity = quantity.trim();
    if quantity.is_empty() {
        return Err(QuantityError::Empty);
    }

    // Binary suffixes first so "Mi" is never read as "M"
    const SUFFIXES: [(&str, f64); 12] = [
        ("Ki", 1024.0),
        ("Mi", MIB),
        ("Gi", MIB * 1024.0),
        ("Ti", MIB * 1024.0 * 1024.0),
        ("Pi", MIB * 1024.0 * 1024.0 * 1024.0),
        ("Ei", MIB * 1024.0 * 1024.0 * 1024.0 * 1024.0),
        ("k", 1e3),
        ("M", 1e6),
        ("G", 1e9),
        ("T", 1e12),
        ("P", 1e15),
        ("E", 1e18),
    ];

    for (suffix, bytes) in SUFFIXES {
        if let Some(number) = quantity.strip_suffix(suffix) {
            return parse_number(number, quantity).map(|n| n * bytes / MIB);
        }
    }

    parse_number(quantity, quantity).map(|n| n / MIB)
}

fn parse_number(number: &str, original: &str) -> Result<f64, QuantityError> {
    number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| QuantityError::Invalid(original.to_string()))
}

/// Human age ("45s", "12m", "3h", "9d") of a creation time; future
/// timestamps count as zero.
pub fn age_since(created: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = now.signed_duration_since(*created).num_seconds().max(0);

    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 60 * 60 => format!("{}m", s / 60),
        s if s < 24 * 60 * 60 => format!("{}h", s / 3600),
        s => format!("{}d", s / 86400),
    }
}
