//! Validation of decoded OHLCV responses.
//!
//! The data service is trusted for content (prices, indicators) but not
//! for shape: every response is checked here right after decoding, and a
//! violation is reported as [`NokeyError::InvalidResponse`] instead of
//! surfacing later as a rendering anomaly.

use time::Date;
use time::macros::format_description;

use super::ohlcv::OhlcvResponse;
use crate::{NokeyError, Result};

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
}

/// Checks a decoded response against the OHLCV data contract.
///
/// - every row date is a valid `YYYY-MM-DD` date
/// - dates are strictly ascending (ordered, no duplicates)
/// - `rows` is empty exactly when `date_range` is `None`
/// - `date_range` equals the first and last row dates
///
/// # Errors
///
/// Returns [`NokeyError::InvalidResponse`] describing the first violation.
pub fn validate_response(response: &OhlcvResponse) -> Result<()> {
    let mut previous: Option<Date> = None;
    for (index, row) in response.rows.iter().enumerate() {
        let date = parse_date(&row.date).ok_or_else(|| {
            invalid(format!("row {index} has malformed date {:?}", row.date))
        })?;
        if let Some(prev) = previous
            && date <= prev
        {
            return Err(invalid(format!(
                "row {index} date {} is not after {prev}",
                row.date
            )));
        }
        previous = Some(date);
    }

    let bounds = response.rows.first().zip(response.rows.last());
    match (&response.date_range, bounds) {
        (None, None) => Ok(()),
        (Some(_), None) => Err(invalid("dateRange present but rows are empty")),
        (None, Some(_)) => Err(invalid("rows present but dateRange is null")),
        (Some((first, last)), Some((head, tail))) => {
            if *first != head.date || *last != tail.date {
                Err(invalid(format!(
                    "dateRange [{first}, {last}] does not match rows [{}, {}]",
                    head.date, tail.date
                )))
            } else {
                Ok(())
            }
        }
    }
}

fn invalid(reason: impl Into<String>) -> NokeyError {
    NokeyError::InvalidResponse(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OhlcvRow;

    fn row(date: &str) -> OhlcvRow {
        OhlcvRow {
            date: date.to_string(),
            close: Some(1.0),
            ..Default::default()
        }
    }

    fn response(dates: &[&str], range: Option<(&str, &str)>) -> OhlcvResponse {
        OhlcvResponse {
            ticker: "AAPL".into(),
            source: "yahoo".into(),
            date_range: range.map(|(a, b)| (a.to_string(), b.to_string())),
            rows: dates.iter().map(|d| row(d)).collect(),
        }
    }

    #[test]
    fn accepts_well_formed_response() {
        let r = response(
            &["2024-01-02", "2024-01-03", "2024-01-04"],
            Some(("2024-01-02", "2024-01-04")),
        );
        assert!(validate_response(&r).is_ok());
    }

    #[test]
    fn accepts_empty_response_with_null_range() {
        assert!(validate_response(&response(&[], None)).is_ok());
    }

    #[test]
    fn rejects_range_without_rows() {
        let err = validate_response(&response(&[], Some(("2024-01-02", "2024-01-02"))))
            .unwrap_err();
        assert!(err.to_string().contains("rows are empty"));
    }

    #[test]
    fn rejects_rows_without_range() {
        let err = validate_response(&response(&["2024-01-02"], None)).unwrap_err();
        assert!(err.to_string().contains("dateRange is null"));
    }

    #[test]
    fn rejects_mismatched_range() {
        let r = response(
            &["2024-01-02", "2024-01-03"],
            Some(("2024-01-01", "2024-01-03")),
        );
        assert!(matches!(
            validate_response(&r),
            Err(NokeyError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_duplicate_and_descending_dates() {
        let dup = response(
            &["2024-01-02", "2024-01-02"],
            Some(("2024-01-02", "2024-01-02")),
        );
        assert!(validate_response(&dup).is_err());

        let desc = response(
            &["2024-01-03", "2024-01-02"],
            Some(("2024-01-03", "2024-01-02")),
        );
        assert!(validate_response(&desc).is_err());
    }

    #[test]
    fn rejects_malformed_dates() {
        let r = response(&["2024/01/02"], Some(("2024/01/02", "2024/01/02")));
        let err = validate_response(&r).unwrap_err();
        assert!(err.to_string().contains("malformed date"));
    }
}
