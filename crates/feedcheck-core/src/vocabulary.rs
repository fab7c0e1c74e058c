//! The configured vocabulary of table names.

use serde::Serialize;

use crate::error::ConfigError;

/// Ordered table names plus the distinguished inventory table.
///
/// Names are matched by substring containment. When a filename contains
/// several table names, the one appearing last in `tables` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableVocabulary {
    tables: Vec<String>,
    inventory: String,
}

impl TableVocabulary {
    /// Build a vocabulary. Fails if there is nothing to reconcile or a
    /// name is blank (a blank name would be a substring of every file).
    pub fn new(tables: Vec<String>, inventory: impl Into<String>) -> Result<Self, ConfigError> {
        let inventory = inventory.into();
        if tables.is_empty() && inventory.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        if tables.iter().any(|t| t.is_empty()) {
            return Err(ConfigError::BlankTableName);
        }
        Ok(Self { tables, inventory })
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn inventory(&self) -> &str {
        &self.inventory
    }

    /// The last table (in vocabulary order) contained in `filename`.
    pub fn table_for(&self, filename: &str) -> Option<&str> {
        self.tables
            .iter()
            .rev()
            .find(|t| filename.contains(t.as_str()))
            .map(String::as_str)
    }

    /// Whether `filename` belongs to the inventory feed.
    pub fn is_inventory(&self, filename: &str) -> bool {
        !self.inventory.is_empty() && filename.contains(&self.inventory)
    }

    /// Whether a listed name concerns this reconciliation at all.
    pub fn is_relevant(&self, filename: &str) -> bool {
        self.table_for(filename).is_some() || self.is_inventory(filename)
    }

    /// 1-based column of `table` in a rendered sheet (column 0 is the date).
    pub fn column_index(&self, table: &str) -> Option<usize> {
        self.tables.iter().position(|t| t == table).map(|i| i + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> TableVocabulary {
        TableVocabulary::new(
            vec!["SALES".to_string(), "SALES_RETURNS".to_string(), "ITEMS".to_string()],
            "STORE_INV",
        )
        .unwrap()
    }

    #[test]
    fn test_table_for_last_match_wins() {
        let v = vocab();
        assert_eq!(v.table_for("SALES_20210101"), Some("SALES"));
        assert_eq!(v.table_for("SALES_RETURNS_20210101"), Some("SALES_RETURNS"));
    }

    #[test]
    fn test_table_for_none() {
        assert_eq!(vocab().table_for("STORE_INV_A_01_20210101"), None);
    }

    #[test]
    fn test_is_inventory_and_relevant() {
        let v = vocab();
        assert!(v.is_inventory("STORE_INV_A_01_20210101"));
        assert!(!v.is_inventory("SALES_20210101"));
        assert!(v.is_relevant("ITEMS_20210101"));
        assert!(!v.is_relevant("README"));
    }

    #[test]
    fn test_column_index_is_one_based() {
        let v = vocab();
        assert_eq!(v.column_index("SALES"), Some(1));
        assert_eq!(v.column_index("ITEMS"), Some(3));
        assert_eq!(v.column_index("NOPE"), None);
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert!(matches!(
            TableVocabulary::new(vec![], ""),
            Err(ConfigError::EmptyVocabulary)
        ));
        assert!(matches!(
            TableVocabulary::new(vec![String::new()], "INV"),
            Err(ConfigError::BlankTableName)
        ));
    }
}
