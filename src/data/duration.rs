use std::time::Duration;

use anyhow::{bail, Result};
use chrono::TimeDelta;

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
];

/// Parse duration strings like "10s", "1.5s", "500ms", "250us", "0ns"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.parse()?;
            if !val.is_finite() || val < 0.0 {
                bail!("Duration must be a non-negative number: {}", s);
            }
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

/// Format a status period as `"<H> jam <M> menit <S> detik"`.
///
/// Hours and minutes only appear when nonzero; seconds always appear, so a
/// zero span reads `"0 detik"` and two full hours read `"2 jam 0 detik"`.
/// Sub-second precision is truncated. Negative spans are clamped to zero.
pub fn format_duration(delta: TimeDelta) -> String {
    let total_seconds = delta.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{} jam", hours));
    }
    if minutes > 0 {
        parts.push(format!("{} menit", minutes));
    }
    parts.push(format!("{} detik", seconds));

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        let d = parse_duration("29.992671083s").unwrap();
        assert!((d.as_secs_f64() - 29.992671083).abs() < 0.0001);
    }

    #[test]
    fn test_parse_milliseconds() {
        let d = parse_duration("988.82775ms").unwrap();
        assert!((d.as_secs_f64() - 0.98882775).abs() < 0.0001);
    }

    #[test]
    fn test_parse_microseconds() {
        assert_eq!(parse_duration("16.958µs").unwrap().as_nanos(), 16958);
        assert_eq!(parse_duration("500us").unwrap().as_nanos(), 500_000);
    }

    #[test]
    fn test_parse_with_whitespace() {
        assert_eq!(parse_duration("  100ms  ").unwrap().as_millis(), 100);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_duration("100x").is_err());
        assert!(parse_duration("abcms").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn format_zero() {
        assert_eq!(format_duration(TimeDelta::zero()), "0 detik");
    }

    #[test]
    fn format_seconds_only() {
        assert_eq!(format_duration(TimeDelta::seconds(45)), "45 detik");
    }

    #[test]
    fn format_minutes_and_seconds() {
        assert_eq!(format_duration(TimeDelta::seconds(90)), "1 menit 30 detik");
    }

    #[test]
    fn format_all_components() {
        assert_eq!(
            format_duration(TimeDelta::seconds(3661)),
            "1 jam 1 menit 1 detik"
        );
    }

    #[test]
    fn format_whole_hours_keeps_seconds() {
        assert_eq!(format_duration(TimeDelta::seconds(7200)), "2 jam 0 detik");
    }

    #[test]
    fn format_skips_zero_minutes_between_hours_and_seconds() {
        assert_eq!(format_duration(TimeDelta::seconds(3605)), "1 jam 5 detik");
    }

    #[test]
    fn format_truncates_subsecond_precision() {
        assert_eq!(format_duration(TimeDelta::milliseconds(59_999)), "59 detik");
    }

    #[test]
    fn format_clamps_negative_spans() {
        assert_eq!(format_duration(TimeDelta::seconds(-30)), "0 detik");
    }
}
