//! Filename parsing.
//!
//! Feed filenames follow `<table or store prefix>_<...>_<date token(s)>`,
//! optionally followed by an extension. Every operation here looks at the
//! *stem* (everything before the first `.`) split on `_`, and is a pure
//! string transform.
//!
//! ```rust
//! use feedcheck_core::filename::{date_for, store_id_for};
//!
//! assert_eq!(store_id_for("STORE_INV_A_01_20210101.csv").unwrap(), "A_01");
//! assert_eq!(date_for("SALES_20210101").unwrap().to_string(), "2021-01-01");
//! ```

use chrono::NaiveDate;

use crate::error::FilenameError;

/// `strftime` format of every single-date token.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// The part of a filename before its first `.`.
pub fn stem(filename: &str) -> &str {
    match filename.find('.') {
        Some(pos) => &filename[..pos],
        None => filename,
    }
}

/// The extension including its leading `.`, if any.
pub fn extension(filename: &str) -> Option<&str> {
    filename.find('.').map(|pos| &filename[pos..])
}

/// The trailing `_`-delimited segments of a filename stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tail<'a> {
    /// Final segment.
    pub last: &'a str,
    /// Second-to-last segment, absent for single-segment stems.
    pub penult: Option<&'a str>,
    /// `penult + "_" + last`, borrowed from the stem.
    pub joined: Option<&'a str>,
    /// Segments before `penult`, still joined by `_`.
    pub leading: Option<&'a str>,
}

/// Split a filename into its trailing segments.
pub fn tail(filename: &str) -> Tail<'_> {
    let stem = stem(filename);
    let mut parts = stem.rsplitn(3, '_');
    let last = parts.next().unwrap_or(stem);
    let penult = parts.next();
    let leading = parts.next();
    let joined = penult.map(|p| &stem[stem.len() - (p.len() + 1 + last.len())..]);

    Tail {
        last,
        penult,
        joined,
        leading,
    }
}

/// Parse an exact 8-digit `YYYYMMDD` token.
///
/// `filename` is only used to label the error.
pub fn parse_date_token(filename: &str, token: &str) -> Result<NaiveDate, FilenameError> {
    let well_formed = token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit());
    well_formed
        .then(|| NaiveDate::parse_from_str(token, DATE_FORMAT).ok())
        .flatten()
        .ok_or_else(|| FilenameError::DateParse {
            filename: filename.to_string(),
            token: token.to_string(),
        })
}

/// The date encoded in the last `_` segment of the stem.
pub fn date_for(filename: &str) -> Result<NaiveDate, FilenameError> {
    parse_date_token(filename, tail(filename).last)
}

/// The composite store identifier: the second- and third-from-last
/// segments of the stem, joined by `_`.
///
/// Requires at least three segments.
pub fn store_id_for(filename: &str) -> Result<String, FilenameError> {
    let mut parts = stem(filename).rsplitn(4, '_');
    let _date = parts.next();
    match (parts.next(), parts.next()) {
        (Some(number), Some(prefix)) => Ok(format!("{}_{}", prefix, number)),
        _ => Err(FilenameError::MalformedFilename {
            filename: filename.to_string(),
            reason: "expected at least three '_'-delimited segments for a store id".to_string(),
        }),
    }
}

/// Render a date as an 8-digit token.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Replace the two trailing date segments of `filename` with `date`,
/// keeping leading segments and the extension.
pub fn with_single_date(filename: &str, date: NaiveDate) -> String {
    let tail = tail(filename);
    let ext = extension(filename).unwrap_or("");
    match tail.leading {
        Some(leading) => format!("{}_{}{}", leading, format_date(date), ext),
        None => format!("{}{}", format_date(date), ext),
    }
}

/// Reduce a listed object key or path to the logical feed filename.
///
/// Keeps the final `/` component, then the part before its first `-`
/// (upstream writers shard one logical file into `NAME-000000000000.csv`,
/// `NAME-000000000001.csv`, ...).
pub fn normalize_listed_name(raw: &str) -> &str {
    let base = raw.rsplit('/').next().unwrap_or(raw);
    base.split('-').next().unwrap_or(base)
}
