//! Formatting helpers for human-readable output.
//!
//! Functions that differ between compact and verbose output are
//! parameterized via [`FmtStyle`].

/// Controls compact vs verbose output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FmtStyle {
    /// Compact: no spaces, short suffixes ("1.5G", "3m5s")
    Compact,
    /// Detail: spaces, full suffixes ("1.5 GiB", "3m 5s")
    Detail,
}

/// Format byte count as human-readable size.
///
/// Compact: `"1.5G"`, `"100.3M"`, `"50.0K"`, `"512B"`
/// Detail:  `"1.5 GiB"`, `"100.3 MiB"`, `"50.0 KiB"`, `"512 B"`
pub fn format_bytes(bytes: u64, style: FmtStyle) -> String {
    let (g, m, k, b) = match style {
        FmtStyle::Compact => ("G", "M", "K", "B"),
        FmtStyle::Detail => (" GiB", " MiB", " KiB", " B"),
    };
    let f = bytes as f64;
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.1}{}", f / (1024.0 * 1024.0 * 1024.0), g)
    } else if bytes >= 1024 * 1024 {
        format!("{:.1}{}", f / (1024.0 * 1024.0), m)
    } else if bytes >= 1024 {
        format!("{:.1}{}", f / 1024.0, k)
    } else {
        format!("{}{}", bytes, b)
    }
}

/// Format duration in seconds as human-readable.
///
/// Negative durations (an unavailable clock) format as `"-"`.
pub fn format_duration(secs: f64, style: FmtStyle) -> String {
    if secs < 0.0 {
        return "-".to_string();
    }
    let secs = secs as u64;
    let sep = match style {
        FmtStyle::Compact => "",
        FmtStyle::Detail => " ",
    };
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m{sep}{}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h{sep}{}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d{sep}{}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Format a millisecond counter with the largest fitting unit.
pub fn format_ms(ms: u64) -> String {
    if ms >= 1000 {
        format_duration(ms as f64 / 1000.0, FmtStyle::Compact)
    } else {
        format!("{}ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512, FmtStyle::Compact), "512B");
        assert_eq!(format_bytes(1536, FmtStyle::Compact), "1.5K");
        assert_eq!(format_bytes(52_428_800, FmtStyle::Detail), "50.0 MiB");
        assert_eq!(format_bytes(1_610_612_736, FmtStyle::Detail), "1.5 GiB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.9, FmtStyle::Compact), "45s");
        assert_eq!(format_duration(185.0, FmtStyle::Compact), "3m5s");
        assert_eq!(format_duration(185.0, FmtStyle::Detail), "3m 5s");
        assert_eq!(format_duration(7_500.0, FmtStyle::Detail), "2h 5m");
        assert_eq!(format_duration(90_000.0, FmtStyle::Compact), "1d1h");
        assert_eq!(format_duration(-1.0, FmtStyle::Detail), "-");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(250), "250ms");
        assert_eq!(format_ms(61_000), "1m1s");
    }
}
