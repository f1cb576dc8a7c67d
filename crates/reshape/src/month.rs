//! Date-to-month normalization.
//!
//! Source files carry their "ship" dates as free text, ISO strings, or raw
//! spreadsheet serial numbers, depending on which system exported them and
//! on which machine. Everything is funneled into a [`MonthBucket`] here;
//! rows that cannot be dated are excluded from aggregation by the caller.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use plmkit_sheet::CellValue;

/// Month abbreviations used by the upstream systems (JUNE/JULY spelled out).
pub const MONTH_LABELS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUNE", "JULY", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Granularity of the derived month label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthGranularity {
    /// Calendar month only: JAN..DEC
    Calendar,
    /// Month and year: "Nov-24"
    MonthYear,
}

/// A pivot column key derived from a date cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MonthBucket {
    /// Calendar month, 1..=12
    Month(u32),
    /// Month within a specific year
    MonthYear { year: i32, month: u32 },
}

impl MonthBucket {
    fn from_date(date: NaiveDate, granularity: MonthGranularity) -> Self {
        match granularity {
            MonthGranularity::Calendar => MonthBucket::Month(date.month()),
            MonthGranularity::MonthYear => MonthBucket::MonthYear {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    /// The column label for this bucket.
    #[must_use]
    pub fn label(&self) -> String {
        match *self {
            MonthBucket::Month(m) => MONTH_LABELS[(m as usize).saturating_sub(1) % 12].to_string(),
            MonthBucket::MonthYear { year, month } => {
                match NaiveDate::from_ymd_opt(year, month, 1) {
                    Some(d) => d.format("%b-%y").to_string(),
                    None => format!("{month}-{year}"),
                }
            }
        }
    }
}

/// Parse a single cell as a calendar date.
///
/// Only text cells participate; numbers are handled by the serial-number
/// fallback in [`derive_months`]. With `day_first`, an ambiguous `01/02`
/// reads as 1 February.
#[must_use]
pub fn parse_date_cell(cell: &CellValue, day_first: bool) -> Option<NaiveDate> {
    let CellValue::String(raw) = cell else {
        return None;
    };
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    const ISO_DATE: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    const ISO_DATETIME: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];
    const DAY_FIRST: [&str; 8] = [
        "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%y", "%d-%m-%y", "%d %b %Y", "%d-%b-%Y",
        "%d-%b-%y",
    ];
    const MONTH_FIRST: [&str; 7] = [
        "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%m-%d-%y", "%b %d %Y", "%b %d, %Y", "%b-%d-%Y",
    ];

    for fmt in ISO_DATE {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ISO_DATETIME {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    let regional: &[&str] = if day_first { &DAY_FIRST } else { &MONTH_FIRST };
    for fmt in regional {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Interpret a number as a day-count offset from 1899-12-30 (the legacy
/// spreadsheet serial-date convention).
#[must_use]
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.floor() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(days))
}

/// Derive a month bucket for every cell of a date column.
///
/// Text parsing is attempted first. Only when *every* cell fails text
/// parsing and the column's non-null cells are all numeric does the serial
/// number fallback apply.
#[must_use]
pub fn derive_months(
    cells: &[CellValue],
    day_first: bool,
    granularity: MonthGranularity,
) -> Vec<Option<MonthBucket>> {
    let mut dates: Vec<Option<NaiveDate>> = cells
        .iter()
        .map(|cell| parse_date_cell(cell, day_first))
        .collect();

    if dates.iter().all(Option::is_none) && is_numeric_column(cells) {
        dates = cells
            .iter()
            .map(|cell| match cell {
                CellValue::Int(i) => serial_to_date(*i as f64),
                CellValue::Float(f) => serial_to_date(*f),
                _ => None,
            })
            .collect();
    }

    dates
        .into_iter()
        .map(|d| d.map(|date| MonthBucket::from_date(date, granularity)))
        .collect()
}

/// A column is numeric when it has at least one non-null cell and every
/// non-null cell is Int or Float.
fn is_numeric_column(cells: &[CellValue]) -> bool {
    let mut seen = false;
    for cell in cells {
        match cell {
            CellValue::Null => {}
            CellValue::Int(_) | CellValue::Float(_) => seen = true,
            _ => return false,
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn test_iso_dates_parse() {
        let d = parse_date_cell(&s("2024-01-15"), true).unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 15));
    }

    #[test]
    fn test_day_first_ambiguity() {
        // 01/02 is 1 February, not January 2nd
        let d = parse_date_cell(&s("01/02/2024"), true).unwrap();
        assert_eq!(d.month(), 2);
        assert_eq!(d.day(), 1);

        let d = parse_date_cell(&s("01/02/2024"), false).unwrap();
        assert_eq!(d.month(), 1);
        assert_eq!(d.day(), 2);
    }

    #[test]
    fn test_numbers_fail_text_parse() {
        assert!(parse_date_cell(&CellValue::Float(45000.0), true).is_none());
        assert!(parse_date_cell(&CellValue::Int(45000), true).is_none());
    }

    #[test]
    fn test_serial_epoch() {
        // 1899-12-30 + 1 day = 1899-12-31
        let d = serial_to_date(1.0).unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1899, 12, 31));

        // 45000 days after the epoch lands in March 2023
        let d = serial_to_date(45000.0).unwrap();
        assert_eq!((d.year(), d.month()), (2023, 3));
    }

    #[test]
    fn test_serial_fallback_applies_only_when_all_text_fails() {
        // All-numeric column with no parseable text: fallback kicks in
        let cells = vec![CellValue::Float(45000.0), CellValue::Null];
        let buckets = derive_months(&cells, true, MonthGranularity::Calendar);
        assert_eq!(buckets[0], Some(MonthBucket::Month(3)));
        assert_eq!(buckets[1], None);

        // One parseable text date: numbers stay unparsed
        let cells = vec![s("2024-01-15"), s("45000")];
        let buckets = derive_months(&cells, true, MonthGranularity::Calendar);
        assert_eq!(buckets[0], Some(MonthBucket::Month(1)));
        assert_eq!(buckets[1], None);
    }

    #[test]
    fn test_mixed_text_column_never_uses_serial_fallback() {
        // Numeric cells mixed with unparseable text: not a numeric column
        let cells = vec![CellValue::Float(45000.0), s("no date here")];
        let buckets = derive_months(&cells, true, MonthGranularity::Calendar);
        assert!(buckets.iter().all(Option::is_none));
    }

    #[test]
    fn test_calendar_labels() {
        assert_eq!(MonthBucket::Month(1).label(), "JAN");
        assert_eq!(MonthBucket::Month(6).label(), "JUNE");
        assert_eq!(MonthBucket::Month(7).label(), "JULY");
        assert_eq!(MonthBucket::Month(12).label(), "DEC");
    }

    #[test]
    fn test_month_year_labels_and_order() {
        let nov24 = MonthBucket::MonthYear { year: 2024, month: 11 };
        let jan25 = MonthBucket::MonthYear { year: 2025, month: 1 };
        assert_eq!(nov24.label(), "Nov-24");
        assert_eq!(jan25.label(), "Jan-25");
        // Chronological, not alphabetical
        assert!(nov24 < jan25);
    }

    #[test]
    fn test_month_year_granularity() {
        let cells = vec![s("2024-11-05")];
        let buckets = derive_months(&cells, true, MonthGranularity::MonthYear);
        assert_eq!(
            buckets[0],
            Some(MonthBucket::MonthYear { year: 2024, month: 11 })
        );
    }
}
