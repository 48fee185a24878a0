//! Column-to-field mapping for ingested rows

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::*;

/// Which caller-defined column feeds each record field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub date: String,
    pub amount: String,
    /// Optional; an empty column name yields empty descriptions
    #[serde(default)]
    pub description: String,
}

impl FieldMapping {
    /// Create a new field mapping
    pub fn new(date: String, amount: String, description: String) -> Self {
        Self {
            date,
            amount,
            description,
        }
    }

    /// Date and amount columns must be chosen before a run
    pub fn validate(&self) -> ReconciliationResult<()> {
        if self.date.trim().is_empty() {
            return Err(ReconciliationError::InvalidMapping(
                "Date column must be mapped".to_string(),
            ));
        }

        if self.amount.trim().is_empty() {
            return Err(ReconciliationError::InvalidMapping(
                "Amount column must be mapped".to_string(),
            ));
        }

        Ok(())
    }
}

/// Build a record from one row, reading cells through the mapping
///
/// Missing cells become empty strings and surface later as parse failures.
pub fn map_row(row: &HashMap<String, String>, mapping: &FieldMapping) -> Record {
    let cell = |column: &str| row.get(column).cloned().unwrap_or_default();
    Record::new(
        cell(&mapping.date),
        cell(&mapping.amount),
        cell(&mapping.description),
    )
}

/// Validate the mapping, then map every row in order
pub fn map_rows(
    rows: &[HashMap<String, String>],
    mapping: &FieldMapping,
) -> ReconciliationResult<Vec<Record>> {
    mapping.validate()?;
    Ok(rows.iter().map(|row| map_row(row, mapping)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bank_mapping() -> FieldMapping {
        FieldMapping::new(
            "Posting Date".to_string(),
            "Amount".to_string(),
            "Memo".to_string(),
        )
    }

    #[test]
    fn test_map_row_reads_mapped_columns() {
        let r = row(&[
            ("Posting Date", "2024-03-01"),
            ("Amount", "-19.99"),
            ("Memo", "Streaming subscription"),
            ("Balance", "1000.00"),
        ]);

        let record = map_row(&r, &bank_mapping());

        assert_eq!(record.date, "2024-03-01");
        assert_eq!(record.amount, "-19.99");
        assert_eq!(record.description, "Streaming subscription");
        assert!(record.is_matchable());
    }

    #[test]
    fn test_map_row_missing_cells_become_empty() {
        let r = row(&[("Amount", "5.00")]);

        let record = map_row(&r, &bank_mapping());

        assert_eq!(record.date, "");
        assert_eq!(record.description, "");
        assert_eq!(record.normalized_date, None);
    }

    #[test]
    fn test_map_rows_requires_date_and_amount() {
        let rows = vec![row(&[("Amount", "5.00")])];

        let missing_date = FieldMapping::new(String::new(), "Amount".to_string(), String::new());
        assert!(matches!(
            map_rows(&rows, &missing_date),
            Err(ReconciliationError::InvalidMapping(_))
        ));

        let missing_amount = FieldMapping::new("Date".to_string(), " ".to_string(), String::new());
        assert!(missing_amount.validate().is_err());

        let no_description = FieldMapping::new("Date".to_string(), "Amount".to_string(), String::new());
        assert_eq!(map_rows(&rows, &no_description).unwrap().len(), 1);
    }
}
