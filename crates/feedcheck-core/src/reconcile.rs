//! End-to-end reconciliation of a flat filename list.
//!
//! ```text
//! names ──▶ classify (rayon pool) ──▶ inventory ─┬─▶ StoreIdList
//!                                                └─▶ fold_inventory ──▶ inventory matrix
//!                                ──▶ months ─▶ expand ─┐
//!                                ──▶ ranges ─▶ expand ─┼─▶ fold_tables ──▶ table matrix
//!                                ──▶ singles ──────────┘
//! ```
//!
//! Per-filename problems never abort the run. They are gathered into
//! [`Reconciliation::errors`] next to the duplicate log.

use chrono::NaiveDate;
use rayon::ThreadPool;
use serde::Serialize;
use tracing::info;

use crate::aggregate::{fold_inventory, fold_tables, Duplicate, FoldLog};
use crate::classify::{classify_batch, default_workers, ClassifiedBatch, DatePatterns};
use crate::error::{ConfigError, FilenameError};
use crate::expand::{expand_all, expand_date_range, expand_month_range, DayFile};
use crate::matrix::PresenceMatrix;
use crate::store_index::StoreIdList;
use crate::vocabulary::TableVocabulary;
use crate::window::CalendarWindow;

/// Shared configuration of a run, decoupled from any file format.
#[derive(Debug, Clone)]
pub struct Settings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub tables: Vec<String>,
    pub inventory: String,
    pub date_patterns: Vec<String>,
}

/// Validated, ready-to-run reconciliation engine.
pub struct Reconciler {
    window: CalendarWindow,
    vocabulary: TableVocabulary,
    patterns: DatePatterns,
    pool: ThreadPool,
}

impl Reconciler {
    /// Validate `settings` and build a classification pool of
    /// [`default_workers`] threads.
    pub fn new(settings: &Settings) -> Result<Self, ConfigError> {
        Self::with_workers(settings, default_workers())
    }

    pub fn with_workers(settings: &Settings, workers: usize) -> Result<Self, ConfigError> {
        let window = CalendarWindow::new(settings.start_date, settings.end_date)?;
        let vocabulary =
            TableVocabulary::new(settings.tables.clone(), settings.inventory.clone())?;
        let patterns = DatePatterns::new(&settings.date_patterns)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("feedcheck-classify-{}", i))
            .build()?;

        Ok(Self {
            window,
            vocabulary,
            patterns,
            pool,
        })
    }

    pub fn vocabulary(&self) -> &TableVocabulary {
        &self.vocabulary
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Classify `names` without aggregating.
    pub fn classify(&self, names: &[String]) -> ClassifiedBatch {
        classify_batch(names, &self.patterns, &self.vocabulary, &self.pool)
    }

    /// Run the whole pipeline over `names`.
    pub fn reconcile(&self, names: &[String]) -> Reconciliation {
        info!(files = names.len(), workers = self.workers(), "classifying");
        let batch = self.classify(names);
        info!(
            inventory = batch.inventory.len(),
            singles = batch.singles.len(),
            ranges = batch.ranges.len(),
            months = batch.months.len(),
            undated = batch.undated.len(),
            errors = batch.errors.len(),
            "classified"
        );

        let ClassifiedBatch {
            inventory,
            singles,
            ranges,
            months,
            undated,
            mut errors,
        } = batch;

        let (store_ids, index_errors) = StoreIdList::from_inventory(&inventory);
        errors.extend(index_errors);

        let (mut stream, month_errors) = expand_all(&months, expand_month_range);
        let (range_days, range_errors) = expand_all(&ranges, expand_date_range);
        errors.extend(month_errors);
        errors.extend(range_errors);
        stream.extend(range_days);
        stream.extend(singles.into_iter().map(DayFile::delivered));

        let mut log = FoldLog::default();
        let mut tables = PresenceMatrix::new(self.window, self.vocabulary.tables().to_vec());
        fold_tables(&stream, &self.vocabulary, &mut tables, &mut log);

        let mut inventory_matrix = PresenceMatrix::new(self.window, store_ids.ids().to_vec());
        fold_inventory(&inventory, &mut inventory_matrix, &mut log);

        errors.extend(log.errors);

        info!(
            days = self.window.num_days(),
            tables_filled = tables.filled_count(),
            tables_slots = tables.slot_count(),
            stores = store_ids.len(),
            inventory_filled = inventory_matrix.filled_count(),
            duplicates = log.duplicates.len(),
            errors = errors.len(),
            "reconciled"
        );

        Reconciliation {
            window: self.window,
            tables,
            inventory: inventory_matrix,
            store_ids,
            duplicates: log.duplicates,
            errors,
            undated,
            untabled: log.untabled,
        }
    }
}

/// Result of a run: both presence matrices plus everything that did not fit.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub window: CalendarWindow,
    pub tables: PresenceMatrix,
    pub inventory: PresenceMatrix,
    pub store_ids: StoreIdList,
    pub duplicates: Vec<Duplicate>,
    pub errors: Vec<FilenameError>,
    /// Non-inventory filenames whose trailing segments match no date pattern.
    pub undated: Vec<String>,
    /// Dated filenames that contain no configured table or inventory name.
    pub untabled: Vec<String>,
}
