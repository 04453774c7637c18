use super::utils::clean_str;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

// `%Y` also accepts one- or two-digit years, so `1/5/21` would otherwise
// come back as year 1 or 21. Anything below this is treated as a miss.
const MIN_FULL_YEAR: i32 = 1000;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

/// Best-effort invoice date. Slash dates are month-first (`1/2/2020` is
/// January 2nd) and two-digit years land in 1970-2069; a time-of-day, if
/// present, is dropped.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .filter_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .find(|d| d.year() >= MIN_FULL_YEAR)
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
                .find(|d| d.year() >= MIN_FULL_YEAR)
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_shapes() {
        assert_eq!(parse_invoice_date("2021-01-05"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_invoice_date("2021/01/05"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_invoice_date("1/5/2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_invoice_date("05.01.2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(
            parse_invoice_date("2021-01-05 13:45:00"),
            Some(ymd(2021, 1, 5))
        );
        assert_eq!(
            parse_invoice_date("2021-01-05T23:59:59+10:00"),
            Some(ymd(2021, 1, 5))
        );
        assert_eq!(parse_invoice_date("\"12/31/2020\""), Some(ymd(2020, 12, 31)));
    }

    #[test]
    fn short_years_are_not_read_as_year_one() {
        assert_eq!(parse_invoice_date("1/5/21"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_invoice_date("12/31/99"), Some(ymd(1999, 12, 31)));
        assert_eq!(parse_invoice_date("1/5/21 08:30"), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn long_form_and_compact_dates() {
        assert_eq!(parse_invoice_date("January 5, 2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_invoice_date("Jan 5, 2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_invoice_date("5 March 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_invoice_date("20210105"), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_invoice_date("not a date"), None);
        assert_eq!(parse_invoice_date(""), None);
        assert_eq!(parse_invoice_date("2021-02-30"), None);
    }
}
