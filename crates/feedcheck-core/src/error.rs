//! Error taxonomy for the reconciliation engine.
//!
//! Two families exist:
//!
//! - [`FilenameError`] is raised for a single filename. It is collected
//!   alongside the duplicate log and never aborts the rest of the batch.
//! - [`ConfigError`] is a precondition violation of the whole run
//!   (vocabulary, window, date patterns). It is returned before any
//!   classification begins.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::classify::DateShape;

/// A problem with one filename. Carries the offending filename.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilenameError {
    #[error("{filename}: '{token}' is not a YYYYMMDD date")]
    DateParse { filename: String, token: String },

    #[error("{filename}: invalid date range: {reason}")]
    DateRange { filename: String, reason: String },

    #[error("{filename}: date {date} is outside the window {start}..={end}")]
    OutOfWindow {
        filename: String,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("{filename}: matches more than one date shape ({shapes:?})")]
    AmbiguousClassification {
        filename: String,
        shapes: Vec<DateShape>,
    },

    #[error("{filename}: {reason}")]
    MalformedFilename { filename: String, reason: String },
}

impl FilenameError {
    /// The filename this error was raised for.
    pub fn filename(&self) -> &str {
        match self {
            Self::DateParse { filename, .. }
            | Self::DateRange { filename, .. }
            | Self::OutOfWindow { filename, .. }
            | Self::AmbiguousClassification { filename, .. }
            | Self::MalformedFilename { filename, .. } => filename,
        }
    }

    /// Short, stable label used by report sinks.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DateParse { .. } => "date_parse",
            Self::DateRange { .. } => "date_range",
            Self::OutOfWindow { .. } => "out_of_window",
            Self::AmbiguousClassification { .. } => "ambiguous_classification",
            Self::MalformedFilename { .. } => "malformed_filename",
        }
    }
}

/// Fatal setup error. Nothing is classified when one of these is returned.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("window start {start} is after window end {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },

    #[error("invalid date pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("no date patterns configured")]
    NoPatterns,

    #[error("table vocabulary is empty")]
    EmptyVocabulary,

    #[error("table names must be non-empty")]
    BlankTableName,

    #[error("failed to build classification worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
