//! Store-ID index of the inventory feed.

use serde::Serialize;

use crate::error::FilenameError;
use crate::filename::store_id_for;

/// Sorted, deduplicated store identifiers seen in inventory filenames.
///
/// Defines the columns of the inventory presence matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StoreIdList {
    ids: Vec<String>,
}

impl StoreIdList {
    /// Derive the index from inventory filenames.
    ///
    /// Adjacent pairs are compared; both ids are taken when they differ and
    /// the second one always is, so the first and last id of every run are
    /// captured. Filenames without a store id are returned as errors and
    /// skipped.
    pub fn from_inventory(files: &[String]) -> (Self, Vec<FilenameError>) {
        let mut errors = Vec::new();
        let parsed: Vec<String> = files
            .iter()
            .filter_map(|f| store_id_for(f).map_err(|e| errors.push(e)).ok())
            .collect();

        let mut ids = Vec::new();
        if let [only] = parsed.as_slice() {
            ids.push(only.clone());
        }
        for pair in parsed.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            if first != second {
                ids.push(first.clone());
            }
            ids.push(second.clone());
        }

        ids.sort();
        ids.dedup();
        (Self { ids }, errors)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 1-based column of `store_id` in a rendered sheet (column 0 is the date).
    pub fn column_index(&self, store_id: &str) -> Option<usize> {
        self.ids.binary_search_by(|id| id.as_str().cmp(store_id)).ok().map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let (index, errors) =
            StoreIdList::from_inventory(&names(&["A_01_20210101", "A_01_20210102", "B_02_20210101"]));
        assert_eq!(index.ids(), &["A_01", "B_02"]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_repetition_and_order_do_not_matter() {
        let (index, _) = StoreIdList::from_inventory(&names(&[
            "INV_C_03_20210101",
            "INV_A_01_20210101",
            "INV_A_01_20210101",
            "INV_C_03_20210102",
            "INV_B_02_20210101",
            "INV_A_01_20210103",
        ]));
        assert_eq!(index.ids(), &["A_01", "B_02", "C_03"]);
    }

    #[test]
    fn test_single_file() {
        let (index, _) = StoreIdList::from_inventory(&names(&["STORE_INV_Z_09_20210101"]));
        assert_eq!(index.ids(), &["Z_09"]);
    }

    #[test]
    fn test_empty() {
        let (index, errors) = StoreIdList::from_inventory(&[]);
        assert!(index.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_malformed_reported() {
        let (index, errors) =
            StoreIdList::from_inventory(&names(&["A_01_20210101", "INV20210101", "B_02_20210101"]));
        assert_eq!(index.ids(), &["A_01", "B_02"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].filename(), "INV20210101");
    }

    #[test]
    fn test_column_index() {
        let (index, _) = StoreIdList::from_inventory(&names(&["B_02_20210101", "A_01_20210101"]));
        assert_eq!(index.column_index("A_01"), Some(1));
        assert_eq!(index.column_index("B_02"), Some(2));
        assert_eq!(index.column_index("C_03"), None);
    }
}
