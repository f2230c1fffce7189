use chrono::{DateTime, NaiveDate, NaiveDateTime};

// Two-digit years come first: `%Y` would also accept `25` as the year 25.
const DATE_FORMATS: [&str; 6] = [
    "%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%b %d %Y", "%B %d %Y",
];

const TIME_SUFFIXES: [&str; 3] = [" %H:%M:%S", " %H:%M", " %I:%M:%S %p"];

/// Parses the dates found in the `Date Paid` column of the filings.
///
/// Returns None for blank or unrecognized values; callers sort those last.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // Tolerate "Jan 5, 2024".
    let s = s.replace(',', "");
    for f in DATE_FORMATS.iter() {
        if let Ok(d) = NaiveDate::parse_from_str(&s, f) {
            return d.and_hms_opt(0, 0, 0);
        }
        for suffix in TIME_SUFFIXES.iter() {
            let fmt = format!("{}{}", f, suffix);
            if let Ok(dt) = NaiveDateTime::parse_from_str(&s, &fmt) {
                return Some(dt);
            }
        }
    }
    DateTime::parse_from_rfc3339(&s)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Converts an Excel serial day number (as stored in `.xlsx` date cells) into a date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDateTime> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86400.0).round() as i64;
    epoch.checked_add_signed(chrono::Duration::seconds(seconds))
}
