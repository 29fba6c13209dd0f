//! # expset: TCGA Expression Subset Preparation
//!
//! expset prepares TCGA Pan-Cancer gene-expression tables for exploratory
//! analysis of normal (non-cancerous) tissue.
//!
//! ## Features
//!
//! - Raw tab-delimited dump to CSV conversion (plain or gzipped input)
//! - Usable-normal sample classification from TCGA barcode type codes
//! - Set-of-interest / all-controls partitioning of a normal table
//! - Mirroring of a numbered tumor control-set series into normal sets
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use expset::data::classify::{classify_normal_samples, parse_samples};
//! use expset::data::partition::select_columns;
//! use expset::TableLoader;
//!
//! // Load the full expression table
//! let loader = TableLoader::new();
//! let table = loader.load("TCGA_mRNA_TPM_Full.csv").unwrap();
//!
//! // Classify the sample columns and keep the usable normal ones
//! let samples = parse_samples(table.sample_ids()).unwrap();
//! let kept = classify_normal_samples(&samples);
//! let normal = select_columns(&table, &kept).unwrap();
//! ```

pub mod cli;
pub mod data;
pub mod store;
pub mod utils;

/// Re-export commonly used types
pub use data::classify::ClassificationSummary;
pub use data::loader::TableLoader;
pub use data::{ExpressionTable, Sample, TableError};
pub use store::TableStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!(
        "{} v{} - TCGA gene-expression subset preparation",
        NAME, VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_info() {
        let info_str = info();
        assert!(info_str.contains("expset"));
        assert!(info_str.contains(VERSION));
    }
}
