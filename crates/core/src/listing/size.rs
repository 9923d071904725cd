//! Size normalization to kibibytes.

use tracing::warn;

/// Recognized size unit labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Bytes,
    KiB,
    MiB,
    GiB,
    TiB,
}

impl SizeUnit {
    /// Parse a unit label as displayed on listing pages.
    pub fn parse(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("b") || label.eq_ignore_ascii_case("bytes") {
            Some(SizeUnit::Bytes)
        } else if label.eq_ignore_ascii_case("kib") {
            Some(SizeUnit::KiB)
        } else if label.eq_ignore_ascii_case("mib") {
            Some(SizeUnit::MiB)
        } else if label.eq_ignore_ascii_case("gib") {
            Some(SizeUnit::GiB)
        } else if label.eq_ignore_ascii_case("tib") {
            Some(SizeUnit::TiB)
        } else {
            None
        }
    }

    /// Binary multiple relative to one KiB.
    fn kib_factor(&self) -> f64 {
        match self {
            SizeUnit::Bytes => 1.0 / 1024.0,
            SizeUnit::KiB => 1.0,
            SizeUnit::MiB => 1024.0,
            SizeUnit::GiB => 1024.0 * 1024.0,
            SizeUnit::TiB => 1024.0 * 1024.0 * 1024.0,
        }
    }
}

/// Convert a magnitude with a displayed unit label to kibibytes.
///
/// An unrecognized label is passed through unconverted, treated as
/// already KiB: partial data is still useful for cataloging, so this is
/// a lenient fallback rather than a hard failure.
pub fn to_kib(magnitude: f64, label: &str) -> f64 {
    match SizeUnit::parse(label) {
        Some(unit) => magnitude * unit.kib_factor(),
        None => {
            warn!(unit = label, "unrecognized size unit, keeping magnitude as KiB");
            magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_divide_down() {
        assert_eq!(to_kib(500.0, "Bytes"), 500.0 / 1024.0);
        assert_eq!(to_kib(2048.0, "B"), 2.0);
    }

    #[test]
    fn test_kib_is_identity() {
        assert_eq!(to_kib(123.5, "KiB"), 123.5);
    }

    #[test]
    fn test_binary_multiples() {
        assert_eq!(to_kib(1.0, "MiB"), 1024.0);
        assert_eq!(to_kib(2.5, "GiB"), 2.5 * 1024.0 * 1024.0);
        assert_eq!(to_kib(1.0, "TiB"), 1024.0 * 1024.0 * 1024.0);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        assert_eq!(to_kib(1.0, "gib"), 1024.0 * 1024.0);
        assert_eq!(to_kib(1.0, "BYTES"), 1.0 / 1024.0);
    }

    #[test]
    fn test_unrecognized_unit_passes_through() {
        assert_eq!(to_kib(42.0, "MB"), 42.0);
        assert_eq!(to_kib(42.0, ""), 42.0);
    }
}
