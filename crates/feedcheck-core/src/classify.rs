//! Date-shape classification.
//!
//! Each filename is tested against every configured date pattern. For a
//! single pattern, with `last`, `penult` and `joined` taken from the
//! filename's trailing segments (see [`crate::filename::tail`]):
//!
//! | `last` | `penult` | `joined` | shape |
//! |--------|----------|----------|-------|
//! | match  | match    | -        | [`DateShape::DateRange`] |
//! | match  | no match | -        | [`DateShape::SingleDate`] |
//! | no     | -        | match    | [`DateShape::MonthRange`] |
//! | no     | -        | no       | nothing from this pattern |
//!
//! Every pattern is evaluated. Patterns that agree collapse into one shape;
//! patterns that disagree produce [`FilenameError::AmbiguousClassification`]
//! instead of routing the filename into several buckets.
//!
//! Classification is independent per filename, so [`classify_batch`] fans
//! the work out over a rayon pool and merges the per-task results in input
//! order once every task has finished.

use rayon::prelude::*;
use rayon::ThreadPool;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{ConfigError, FilenameError};
use crate::filename::tail;
use crate::vocabulary::TableVocabulary;

/// Structural encoding of the date inside a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateShape {
    /// `..._20210101`
    SingleDate,
    /// `..._20210101_20210107`
    DateRange,
    /// `..._JAN_21`
    MonthRange,
    Unmatched,
}

/// Compiled list of date-token patterns.
#[derive(Debug, Clone)]
pub struct DatePatterns {
    patterns: Vec<Regex>,
}

impl DatePatterns {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::NoPatterns);
        }
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Shapes produced by each pattern, deduplicated, in first-seen order.
    pub fn shapes_for(&self, filename: &str) -> Vec<DateShape> {
        let tail = tail(filename);
        let mut shapes = Vec::new();

        for pattern in &self.patterns {
            let last = pattern.is_match(tail.last);
            let penult = tail.penult.is_some_and(|p| pattern.is_match(p));
            let joined = tail.joined.is_some_and(|j| pattern.is_match(j));

            let shape = if last && penult {
                DateShape::DateRange
            } else if last {
                DateShape::SingleDate
            } else if joined {
                DateShape::MonthRange
            } else {
                continue;
            };

            if !shapes.contains(&shape) {
                shapes.push(shape);
            }
        }

        shapes
    }
}

/// Outcome of classifying one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub filename: String,
    /// Contains the inventory table name, independent of the date shape.
    pub inventory: bool,
    pub shape: Result<DateShape, FilenameError>,
}

/// Classify one filename.
pub fn classify(
    filename: &str,
    patterns: &DatePatterns,
    vocabulary: &TableVocabulary,
) -> Classification {
    let shapes = patterns.shapes_for(filename);
    let shape = match shapes.as_slice() {
        [] => Ok(DateShape::Unmatched),
        [one] => Ok(*one),
        _ => Err(FilenameError::AmbiguousClassification {
            filename: filename.to_string(),
            shapes,
        }),
    };

    Classification {
        filename: filename.to_string(),
        inventory: vocabulary.is_inventory(filename),
        shape,
    }
}

/// Filenames grouped by classification, in input order within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedBatch {
    pub inventory: Vec<String>,
    pub singles: Vec<String>,
    pub ranges: Vec<String>,
    pub months: Vec<String>,
    /// Non-inventory filenames whose date matched no pattern.
    pub undated: Vec<String>,
    pub errors: Vec<FilenameError>,
}

impl ClassifiedBatch {
    fn absorb(&mut self, classification: Classification) {
        let Classification {
            filename,
            inventory,
            shape,
        } = classification;

        if inventory {
            self.inventory.push(filename.clone());
        }

        match shape {
            Ok(DateShape::SingleDate) => self.singles.push(filename),
            Ok(DateShape::DateRange) => self.ranges.push(filename),
            Ok(DateShape::MonthRange) => self.months.push(filename),
            Ok(DateShape::Unmatched) if !inventory => self.undated.push(filename),
            Ok(DateShape::Unmatched) => {}
            Err(e) => self.errors.push(e),
        }
    }
}

/// Classification workers to use: one fewer than the available cores,
/// at least one.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Classify every filename on `pool` and merge the results.
///
/// Workers share only the read-only patterns and vocabulary. Each returns
/// its own [`Classification`]; merging happens here after the barrier.
pub fn classify_batch(
    names: &[String],
    patterns: &DatePatterns,
    vocabulary: &TableVocabulary,
    pool: &ThreadPool,
) -> ClassifiedBatch {
    let results: Vec<Classification> = pool.install(|| {
        names
            .par_iter()
            .map(|name| classify(name, patterns, vocabulary))
            .collect()
    });

    let mut batch = ClassifiedBatch::default();
    for classification in results {
        debug!(
            filename = %classification.filename,
            shape = ?classification.shape,
            inventory = classification.inventory,
            "classified"
        );
        batch.absorb(classification);
    }
    batch
}
