use chrono::{DateTime, NaiveDate};

const DAY_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Parses the date strings the analysis service is known to emit.
///
/// Month-only dates (`2024-01`) resolve to the first day of the month.
/// Returns `None` for anything that is not a calendar date.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.date_naive());
    }

    // "YYYY-MM"
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_supported_formats() {
        assert_eq!(parse_report_date("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_report_date("2024/01/15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_report_date("01/15/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_report_date("15.01.2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(
            parse_report_date("2024-01-15T08:30:00+02:00"),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn test_month_only_resolves_to_first_day() {
        assert_eq!(parse_report_date("2024-02"), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("   "), None);
        assert_eq!(parse_report_date("last tuesday"), None);
        assert_eq!(parse_report_date("2024-13-01"), None);
    }
}
