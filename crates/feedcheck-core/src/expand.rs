//! Range expansion.
//!
//! Turns a range-shaped filename into one synthetic single-date filename per
//! covered calendar day, in ascending order. Leading segments and the
//! extension are preserved; only the trailing two date segments are
//! replaced.
//!
//! ```rust
//! use feedcheck_core::expand::expand_date_range;
//!
//! let days = expand_date_range("FOO_20200103_20200105").unwrap();
//! assert_eq!(days, vec!["FOO_20200103", "FOO_20200104", "FOO_20200105"]);
//! ```

use chrono::{Datelike, Month, NaiveDate};

use crate::error::FilenameError;
use crate::filename::{parse_date_token, tail, with_single_date};

/// Expand `<prefix>_<YYYYMMDD start>_<YYYYMMDD end>`.
pub fn expand_date_range(filename: &str) -> Result<Vec<String>, FilenameError> {
    let tail = tail(filename);
    let penult = tail.penult.ok_or_else(|| FilenameError::DateRange {
        filename: filename.to_string(),
        reason: "expected two trailing date segments".to_string(),
    })?;

    let start = parse_date_token(filename, penult)?;
    let end = parse_date_token(filename, tail.last)?;
    if end < start {
        return Err(FilenameError::DateRange {
            filename: filename.to_string(),
            reason: format!("start {} is after end {}", start, end),
        });
    }

    Ok(start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|d| with_single_date(filename, d))
        .collect())
}

/// Expand `<prefix>_<MMM>_<YY>` to every day of that month of `2000 + YY`.
pub fn expand_month_range(filename: &str) -> Result<Vec<String>, FilenameError> {
    let tail = tail(filename);
    let first = tail
        .penult
        .and_then(|month| first_of_month(month, tail.last))
        .ok_or_else(|| FilenameError::DateRange {
            filename: filename.to_string(),
            reason: format!(
                "'{}' is not a month token like JAN_20",
                tail.joined.unwrap_or(tail.last)
            ),
        })?;

    Ok(first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .map(|d| with_single_date(filename, d))
        .collect())
}

/// First day of the month named by a 3-letter abbreviation and a 2-digit year.
fn first_of_month(month: &str, year: &str) -> Option<NaiveDate> {
    if month.len() != 3 || year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: Month = month.parse().ok()?;
    let year = 2000 + year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
}

/// One single-dated filename of the fold stream.
///
/// Days produced by expansion remember the range or month filename that
/// actually arrived, so anything reported about them can name it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFile {
    pub filename: String,
    pub expanded_from: Option<String>,
}

impl DayFile {
    /// A filename that arrived already single-dated.
    pub fn delivered(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            expanded_from: None,
        }
    }

    /// The filename present in the landing area.
    pub fn origin(&self) -> &str {
        self.expanded_from.as_deref().unwrap_or(&self.filename)
    }
}

/// Expand every filename with `expander`, collecting failures separately.
pub fn expand_all<F>(filenames: &[String], expander: F) -> (Vec<DayFile>, Vec<FilenameError>)
where
    F: Fn(&str) -> Result<Vec<String>, FilenameError>,
{
    let mut expanded = Vec::new();
    let mut errors = Vec::new();
    for filename in filenames {
        match expander(filename) {
            Ok(days) => expanded.extend(days.into_iter().map(|day| DayFile {
                filename: day,
                expanded_from: Some(filename.clone()),
            })),
            Err(e) => errors.push(e),
        }
    }
    (expanded, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_completeness() {
        assert_eq!(
            expand_date_range("FOO_20200103_20200105").unwrap(),
            vec!["FOO_20200103", "FOO_20200104", "FOO_20200105"]
        );
    }

    #[test]
    fn test_date_range_across_month_end() {
        let days = expand_date_range("SALES_WEEKLY_20201229_20210102.csv").unwrap();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], "SALES_WEEKLY_20201229.csv");
        assert_eq!(days[2], "SALES_WEEKLY_20201231.csv");
        assert_eq!(days[4], "SALES_WEEKLY_20210102.csv");
    }

    #[test]
    fn test_date_range_single_day() {
        assert_eq!(
            expand_date_range("FOO_20200103_20200103").unwrap(),
            vec!["FOO_20200103"]
        );
    }

    #[test]
    fn test_date_range_inverted() {
        let err = expand_date_range("FOO_20200105_20200103").unwrap_err();
        assert_eq!(err.kind(), "date_range");
        assert_eq!(err.filename(), "FOO_20200105_20200103");
    }

    #[test]
    fn test_date_range_bad_token() {
        let err = expand_date_range("FOO_20200199_20200203").unwrap_err();
        assert_eq!(
            err,
            FilenameError::DateParse {
                filename: "FOO_20200199_20200203".to_string(),
                token: "20200199".to_string(),
            }
        );
    }

    #[test]
    fn test_month_range_leap_year() {
        let days = expand_month_range("FOO_FEB_20").unwrap();
        assert_eq!(days.len(), 29);
        assert_eq!(days.first().unwrap(), "FOO_20200201");
        assert_eq!(days.last().unwrap(), "FOO_20200229");
    }

    #[test]
    fn test_month_range_non_leap_year() {
        let days = expand_month_range("FOO_FEB_21").unwrap();
        assert_eq!(days.len(), 28);
        assert_eq!(days.last().unwrap(), "FOO_20210228");
    }

    #[test]
    fn test_month_range_case_insensitive_and_december() {
        let days = expand_month_range("FOO_Dec_19").unwrap();
        assert_eq!(days.len(), 31);
        assert_eq!(days[0], "FOO_20191201");
        assert_eq!(days[30], "FOO_20191231");
    }

    #[test]
    fn test_month_range_unparseable() {
        for name in ["FOO_ABC_20", "FOO_JAN_2020", "FOO_JANUARY_20", "FOO_JAN_X1"] {
            let err = expand_month_range(name).unwrap_err();
            assert_eq!(err.kind(), "date_range", "{}", name);
        }
    }

    #[test]
    fn test_expand_all_isolates_failures() {
        let files = vec![
            "FOO_20200103_20200104".to_string(),
            "FOO_20200105_20200101".to_string(),
            "BAR_20200101_20200101".to_string(),
        ];
        let (expanded, errors) = expand_all(&files, expand_date_range);
        let days: Vec<_> = expanded.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(days, vec!["FOO_20200103", "FOO_20200104", "BAR_20200101"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].filename(), "FOO_20200105_20200101");
    }

    #[test]
    fn test_expanded_days_keep_origin() {
        let files = vec!["FOO_JAN_21".to_string()];
        let (expanded, _) = expand_all(&files, expand_month_range);
        assert_eq!(expanded.len(), 31);
        assert!(expanded.iter().all(|d| d.origin() == "FOO_JAN_21"));
        assert_eq!(expanded[4].filename, "FOO_20210105");

        let single = DayFile::delivered("FOO_20210105");
        assert_eq!(single.origin(), "FOO_20210105");
    }
}
