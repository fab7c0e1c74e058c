//! Folding filename streams into presence matrices.
//!
//! Two folds exist. [`fold_tables`] places every single-date filename
//! (natural or expanded) under its table, first writer wins, and logs any
//! later arrival for a filled slot. [`fold_inventory`] places inventory
//! filenames under their store id and detects re-deliveries by looking
//! ahead at the next filename in the (store, date)-sorted list.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::FilenameError;
use crate::expand::DayFile;
use crate::filename::{date_for, store_id_for};
use crate::matrix::{PresenceMatrix, SlotOutcome};
use crate::vocabulary::TableVocabulary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// The identical filename arrived again for the slot.
    Redelivery,
    /// A different filename arrived for an already filled slot.
    Conflict,
}

/// Which presence matrix a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixKind {
    /// Keyed by table name.
    Tables,
    /// Keyed by store id.
    Inventory,
}

/// A filename that lost its slot to an earlier arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub filename: String,
    /// Range or month filename the losing day was expanded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded_from: Option<String>,
    pub kind: DuplicateKind,
    pub matrix: MatrixKind,
    pub date: NaiveDate,
    /// Table name or store id of the slot.
    pub key: String,
    /// The filename that keeps the slot.
    pub kept: String,
}

/// Everything a fold reports besides the matrix itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldLog {
    pub duplicates: Vec<Duplicate>,
    pub errors: Vec<FilenameError>,
    /// Single-date filenames that contain no configured table name.
    pub untabled: Vec<String>,
}

impl FoldLog {
    fn record(
        &mut self,
        matrix: MatrixKind,
        outcome: SlotOutcome,
        file: &DayFile,
        date: NaiveDate,
        key: &str,
    ) {
        let filename = file.filename.as_str();
        let (kind, kept) = match outcome {
            SlotOutcome::Filled => {
                debug!(filename, %date, key, "slot filled");
                return;
            }
            SlotOutcome::Redelivery => (DuplicateKind::Redelivery, filename.to_string()),
            SlotOutcome::Conflict { existing } => (DuplicateKind::Conflict, existing),
        };
        debug!(filename, origin = file.origin(), %date, key, ?kind, kept = %kept, "slot already filled");
        self.duplicates.push(Duplicate {
            filename: filename.to_string(),
            expanded_from: file.expanded_from.clone(),
            kind,
            matrix,
            date,
            key: key.to_string(),
            kept,
        });
    }
}

/// Resolve the date of `file` inside the matrix window.
///
/// An out-of-window day of an expanded file is reported against the file
/// that arrived, not the synthetic day name.
fn dated(file: &DayFile, matrix: &PresenceMatrix) -> Result<NaiveDate, FilenameError> {
    let date = date_for(&file.filename)?;
    let window = matrix.window();
    if !window.contains(date) {
        return Err(FilenameError::OutOfWindow {
            filename: file.origin().to_string(),
            date,
            start: window.start(),
            end: window.end(),
        });
    }
    Ok(date)
}

/// Fold the non-inventory stream into the table matrix, in stream order.
///
/// Inventory filenames that name no table are skipped here; they are
/// placed by [`fold_inventory`].
pub fn fold_tables(
    stream: &[DayFile],
    vocabulary: &TableVocabulary,
    matrix: &mut PresenceMatrix,
    log: &mut FoldLog,
) {
    for file in stream {
        let table = vocabulary.table_for(&file.filename);
        if table.is_none() && vocabulary.is_inventory(&file.filename) {
            continue;
        }

        let date = match dated(file, matrix) {
            Ok(date) => date,
            Err(e) => {
                log.errors.push(e);
                continue;
            }
        };

        let Some(table) = table else {
            log.untabled.push(file.origin().to_string());
            continue;
        };

        if let Some(outcome) = matrix.occupy(date, table, &file.filename) {
            log.record(MatrixKind::Tables, outcome, file, date, table);
        }
    }
}

/// Fold inventory filenames into the store matrix.
///
/// `files` is expected in (store, date) order. The first file is placed,
/// then for every adjacent pair `(f_k, f_k+1)`: if the slot of `f_k` holds
/// exactly `f_k+1`, the look-ahead file is a re-delivery; otherwise
/// `f_k+1` is offered to its own slot, where a different occupant makes it
/// a conflict. An identical name that is not adjacent to its twin is
/// absorbed without being logged.
///
/// Filenames without a store id are skipped silently;
/// [`StoreIdList::from_inventory`](crate::store_index::StoreIdList::from_inventory)
/// reports them.
pub fn fold_inventory(files: &[String], matrix: &mut PresenceMatrix, log: &mut FoldLog) {
    let files: Vec<DayFile> = files.iter().map(DayFile::delivered).collect();
    let slots: Vec<Option<(NaiveDate, String)>> = files
        .iter()
        .map(|f| {
            let store = store_id_for(&f.filename).ok()?;
            dated(f, matrix)
                .map(|date| (date, store))
                .map_err(|e| log.errors.push(e))
                .ok()
        })
        .collect();

    let place = |k: usize, matrix: &mut PresenceMatrix, log: &mut FoldLog| {
        let Some((date, store)) = &slots[k] else {
            return;
        };
        match matrix.occupy(*date, store, &files[k].filename) {
            Some(SlotOutcome::Redelivery) | None => {}
            Some(outcome) => log.record(MatrixKind::Inventory, outcome, &files[k], *date, store),
        }
    };

    if files.is_empty() {
        return;
    }
    place(0, matrix, log);

    for k in 0..files.len() - 1 {
        let next = &files[k + 1];
        let occupant = slots[k]
            .as_ref()
            .and_then(|(date, store)| matrix.get(*date, store));

        if occupant == Some(next.filename.as_str()) {
            if let Some((date, store)) = &slots[k] {
                log.record(MatrixKind::Inventory, SlotOutcome::Redelivery, next, *date, store);
            }
        } else {
            place(k + 1, matrix, log);
        }
    }
}
