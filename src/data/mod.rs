pub mod classify;
pub mod loader;
pub mod partition;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the gene identifier column
pub const ID_COLUMN: &str = "id";

/// Name of the gene symbol column
pub const GENE_COLUMN: &str = "Gene";

/// Number of leading identifier columns (`id`, `Gene`)
pub const NUM_ID_COLUMNS: usize = 2;

/// TCGA sample-type codes for healthy tissue
/// (10: blood derived normal, 11: solid tissue normal,
/// 12: buccal cell normal, 14: bone marrow normal)
pub const HEALTHY_CODES: &[&str] = &["10", "11", "12", "14"];

/// TCGA sample-type codes for metastatic tissue
/// (06: metastatic, 07: additional metastatic)
pub const METASTATIC_CODES: &[&str] = &["06", "07"];

/// Errors surfaced by table and sample-id operations
#[derive(Debug, Error)]
pub enum TableError {
    /// Sample id has fewer than the 4 dash-separated fields needed to
    /// extract the participant and type code
    #[error("malformed sample id {id:?}: expected at least 4 dash-separated fields")]
    MalformedSampleId { id: String },

    /// A requested sample id is not a column of the table
    #[error("column {name:?} is not present in the table header")]
    UnknownColumn { name: String },

    /// The table lacks one of the identifier columns it is required to have
    #[error("table has no {name:?} column")]
    MissingIdColumn { name: String },
}

/// A TCGA sample barcode with its embedded metadata fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Full sample id, e.g. `TCGA-OR-A5J1-11A`
    pub id: String,
    /// Participant field (third dash-separated field)
    pub participant: String,
    /// Sample-type field (fourth dash-separated field), may carry a vial
    /// letter, e.g. `11A`
    pub type_code: String,
}

impl Sample {
    /// Parse a sample id of the form `A-B-C-D[-...]`
    pub fn parse(id: &str) -> Result<Self, TableError> {
        let fields: Vec<&str> = id.split('-').collect();
        if fields.len() < 4 {
            return Err(TableError::MalformedSampleId { id: id.to_string() });
        }
        Ok(Self {
            id: id.to_string(),
            participant: fields[2].to_string(),
            type_code: fields[3].to_string(),
        })
    }

    /// Two-digit sample-type code, without the vial letter
    pub fn code(&self) -> &str {
        self.type_code.get(..2).unwrap_or(&self.type_code)
    }

    /// Whether the sample-type code marks healthy tissue
    pub fn is_healthy(&self) -> bool {
        HEALTHY_CODES.contains(&self.code())
    }

    /// Whether the sample-type code marks metastatic tissue
    pub fn is_metastatic(&self) -> bool {
        METASTATIC_CODES.contains(&self.code())
    }
}

/// A gene-expression table: two identifier columns (`id`, `Gene`) followed
/// by one column per sample, one row per gene. Cells are kept as text so
/// the source's numeric formatting survives a write/read round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionTable {
    /// Header row
    pub columns: Vec<String>,
    /// Data rows, each aligned with `columns`
    pub rows: Vec<Vec<String>>,
}

impl ExpressionTable {
    /// Create a table from a header and data rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, identifier columns included
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// (rows, columns) shape, for logging
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }

    /// Sample id columns (everything after the identifier columns)
    pub fn sample_ids(&self) -> &[String] {
        if self.columns.len() > NUM_ID_COLUMNS {
            &self.columns[NUM_ID_COLUMNS..]
        } else {
            &[]
        }
    }

    /// Position of a named column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of a named column, in row order
    pub fn column_values(&self, name: &str) -> Result<Vec<String>, TableError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingIdColumn {
                name: name.to_string(),
            })?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_fields() {
        let sample = Sample::parse("TCGA-OR-A5J1-11A").unwrap();
        assert_eq!(sample.id, "TCGA-OR-A5J1-11A");
        assert_eq!(sample.participant, "A5J1");
        assert_eq!(sample.type_code, "11A");
        assert_eq!(sample.code(), "11");
        assert!(sample.is_healthy());
        assert!(!sample.is_metastatic());
    }

    #[test]
    fn test_parse_sample_extra_fields() {
        let sample = Sample::parse("TCGA-OR-A5J1-01A-11R-A29S-07").unwrap();
        assert_eq!(sample.participant, "A5J1");
        assert_eq!(sample.type_code, "01A");
        assert!(!sample.is_healthy());
    }

    #[test]
    fn test_parse_sample_too_few_fields() {
        let err = Sample::parse("TCGA-OR-A5J1").unwrap_err();
        assert!(matches!(err, TableError::MalformedSampleId { .. }));
    }

    #[test]
    fn test_metastatic_code() {
        let sample = Sample::parse("TCGA-D3-A2JP-06A").unwrap();
        assert!(sample.is_metastatic());
        assert!(!sample.is_healthy());
    }

    #[test]
    fn test_table_accessors() {
        let table = ExpressionTable::new(
            vec![
                "id".to_string(),
                "Gene".to_string(),
                "TCGA-A-B-11A".to_string(),
            ],
            vec![
                vec!["ENSG1".to_string(), "TP53".to_string(), "3.14".to_string()],
                vec!["ENSG2".to_string(), "EGFR".to_string(), "0.0".to_string()],
            ],
        );
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.sample_ids(), &["TCGA-A-B-11A".to_string()]);
        assert_eq!(table.column_index("Gene"), Some(1));
        assert_eq!(
            table.column_values("id").unwrap(),
            vec!["ENSG1".to_string(), "ENSG2".to_string()]
        );
        assert!(matches!(
            table.column_values("absent").unwrap_err(),
            TableError::MissingIdColumn { .. }
        ));
    }
}
