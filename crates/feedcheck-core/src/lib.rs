//! # feedcheck core
//!
//! Storage-agnostic reconciliation engine: given a flat list of feed
//! filenames, decide for every day of a window and every expected table
//! (and every inventory store) whether a file arrived, and report
//! duplicate or conflicting arrivals.
//!
//! This crate performs no I/O. Listing filenames, loading configuration,
//! and rendering reports live in the `feedcheck` application crate.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use feedcheck_core::reconcile::{Reconciler, Settings};
//!
//! let settings = Settings {
//!     start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2021, 1, 3).unwrap(),
//!     tables: vec!["SALES".to_string()],
//!     inventory: "STORE_INV".to_string(),
//!     date_patterns: vec![r"^\d{8}$".to_string()],
//! };
//! let run = Reconciler::with_workers(&settings, 1)
//!     .unwrap()
//!     .reconcile(&["SALES_20210101".to_string(), "SALES_20210103".to_string()]);
//! assert_eq!(run.tables.filled_count(), 2);
//! assert!(run.duplicates.is_empty());
//! ```

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod expand;
pub mod filename;
pub mod matrix;
pub mod reconcile;
pub mod store_index;
pub mod vocabulary;
pub mod window;
