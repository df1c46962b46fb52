use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// All schedule timestamps are wall-clock values in Asia/Jakarta (UTC+7); no
/// offset is stored with them.
fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

/// Current wall-clock time in the reference timezone.
pub fn now_in_reference_tz() -> NaiveDateTime {
    Utc::now().with_timezone(&reference_offset()).naive_local()
}

/// Parses user input for a schedule time. Accepts minute precision, second
/// precision, the T-separated form and day-first input.
pub fn parse_schedule_input(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%d-%m-%Y %H:%M",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    // Last resort: full ISO-8601, converted into the reference timezone.
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&reference_offset()).naive_local())
}

pub fn format_wallclock(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_minute_precision() {
        let dt = parse_schedule_input("2025-08-26 15:30").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2025, 8, 26));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (15, 30, 0));
    }

    #[test]
    fn parses_second_precision_and_t_separator() {
        assert!(parse_schedule_input("2025-08-26 15:30:45").is_some());
        assert!(parse_schedule_input("2025-08-26T15:30").is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_schedule_input("besok sore").is_none());
        assert!(parse_schedule_input("").is_none());
    }

    #[test]
    fn formats_back_to_second_precision() {
        let dt = parse_schedule_input("2025-08-26 15:30").unwrap();
        assert_eq!(format_wallclock(dt), "2025-08-26 15:30:00");
    }
}
