//! Dense calendar x key presence matrix.
//!
//! A row exists for every day of the window from construction on, and
//! every cell starts empty, so a missing file is an empty cell rather than
//! an absent key. The first filename to claim a cell keeps it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::window::CalendarWindow;

/// One day of a [`PresenceMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixRow {
    pub date: NaiveDate,
    /// One cell per column, `None` when nothing arrived.
    pub cells: Vec<Option<String>>,
}

/// Result of offering a filename to a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The cell was empty and now holds the filename.
    Filled,
    /// The cell already held this exact filename.
    Redelivery,
    /// The cell already held a different filename, which is kept.
    Conflict { existing: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceMatrix {
    #[serde(skip)]
    window: CalendarWindow,
    columns: Vec<String>,
    rows: Vec<MatrixRow>,
}

impl PresenceMatrix {
    /// An empty matrix with one row per window day.
    pub fn new(window: CalendarWindow, columns: Vec<String>) -> Self {
        let rows = window
            .days()
            .map(|date| MatrixRow {
                date,
                cells: vec![None; columns.len()],
            })
            .collect();
        Self {
            window,
            columns,
            rows,
        }
    }

    pub fn window(&self) -> CalendarWindow {
        self.window
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in ascending date order.
    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    fn position(&self, date: NaiveDate, key: &str) -> Option<(usize, usize)> {
        let row = self.window.offset_of(date)?;
        let col = self.columns.iter().position(|c| c == key)?;
        Some((row, col))
    }

    /// The filename occupying `(date, key)`, if any.
    pub fn get(&self, date: NaiveDate, key: &str) -> Option<&str> {
        let (row, col) = self.position(date, key)?;
        self.rows[row].cells[col].as_deref()
    }

    /// Offer `filename` to `(date, key)`. First writer wins.
    ///
    /// Returns `None` when the date is outside the window or `key` is not
    /// a column.
    pub fn occupy(&mut self, date: NaiveDate, key: &str, filename: &str) -> Option<SlotOutcome> {
        let (row, col) = self.position(date, key)?;
        let cell = &mut self.rows[row].cells[col];
        if let Some(existing) = cell.as_deref() {
            return Some(if existing == filename {
                SlotOutcome::Redelivery
            } else {
                SlotOutcome::Conflict {
                    existing: existing.to_string(),
                }
            });
        }
        *cell = Some(filename.to_string());
        Some(SlotOutcome::Filled)
    }

    pub fn filled_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.iter().filter(|c| c.is_some()).count())
            .sum()
    }

    pub fn slot_count(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    /// Every empty `(date, key)` slot, in row-major order.
    pub fn missing(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.rows.iter().flat_map(move |row| {
            row.cells
                .iter()
                .zip(&self.columns)
                .filter(|(cell, _)| cell.is_none())
                .map(move |(_, key)| (row.date, key.as_str()))
        })
    }
}
