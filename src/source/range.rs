//! Calendar date range for SISS queries.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::data::Timestamp;

/// Inclusive range of calendar days in a fixed offset.
///
/// The start is never after the end; constructors swap reversed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    offset: FixedOffset,
}

impl DateRange {
    pub fn new(a: NaiveDate, b: NaiveDate, offset: FixedOffset) -> Self {
        let (start, end) = if b < a { (b, a) } else { (a, b) };
        Self { start, end, offset }
    }

    /// The `days` days before `today` through `today`.
    pub fn last_days(today: NaiveDate, days: i64, offset: FixedOffset) -> Self {
        let start = today
            .checked_sub_signed(TimeDelta::days(days.max(0)))
            .unwrap_or(today);
        Self::new(start, today, offset)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// Midnight at the start of the first day.
    pub fn begin(&self) -> Timestamp {
        self.at(self.start, NaiveTime::MIN)
    }

    /// The last microsecond of the last day.
    pub fn end(&self) -> Timestamp {
        let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
        self.at(self.end, last)
    }

    pub fn begin_ms(&self) -> i64 {
        self.begin().timestamp_millis()
    }

    pub fn end_ms(&self) -> i64 {
        self.end().timestamp_millis()
    }

    /// Move the first day by `days` (negative moves earlier).
    pub fn shift_start(&self, days: i64) -> Self {
        Self::new(shift(self.start, days), self.end, self.offset)
    }

    /// Move the last day by `days` (negative moves earlier).
    pub fn shift_end(&self, days: i64) -> Self {
        Self::new(self.start, shift(self.end, days), self.offset)
    }

    /// `"YYYY-MM-DD s.d. YYYY-MM-DD"`.
    pub fn label(&self) -> String {
        format!(
            "{} s.d. {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    fn at(&self, date: NaiveDate, time: NaiveTime) -> Timestamp {
        let local = NaiveDateTime::new(date, time);
        DateTime::from_naive_utc_and_offset(local - self.offset, self.offset)
    }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(TimeDelta::days(days)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reversed_dates_are_swapped() {
        let range = DateRange::new(day(2025, 3, 10), day(2025, 3, 3), wib());
        assert_eq!(range.start_date(), day(2025, 3, 3));
        assert_eq!(range.end_date(), day(2025, 3, 10));
        assert_eq!(range.label(), "2025-03-03 s.d. 2025-03-10");
    }

    #[test]
    fn bounds_cover_whole_days_in_offset() {
        let range = DateRange::new(day(2025, 1, 1), day(2025, 1, 1), wib());
        // 2025-01-01 00:00:00 +07:00 == 2024-12-31 17:00:00 UTC
        assert_eq!(range.begin_ms(), 1_735_664_400_000);
        assert_eq!(range.end_ms(), 1_735_664_400_000 + 86_400_000 - 1);
        assert_eq!(range.begin().to_rfc3339(), "2025-01-01T00:00:00+07:00");
    }

    #[test]
    fn default_window_ends_today() {
        let range = DateRange::last_days(day(2025, 3, 10), 7, wib());
        assert_eq!(range.start_date(), day(2025, 3, 3));
        assert_eq!(range.end_date(), day(2025, 3, 10));
    }

    #[test]
    fn shifting_past_the_other_end_swaps() {
        let range = DateRange::new(day(2025, 3, 10), day(2025, 3, 11), wib());
        let shifted = range.shift_start(3);
        assert_eq!(shifted.start_date(), day(2025, 3, 11));
        assert_eq!(shifted.end_date(), day(2025, 3, 13));
    }
}
