use crate::data::loader::TableLoader;
use crate::data::{ExpressionTable, TableError, GENE_COLUMN, ID_COLUMN, NUM_ID_COLUMNS};
use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Project a table onto its identifier columns plus exactly the requested
/// sample columns, preserving the original column order.
///
/// Every requested id must be a column of the table; a missing one is a
/// fatal input mismatch, reported before any projection work is done.
pub fn select_columns(
    table: &ExpressionTable,
    keep: &HashSet<String>,
) -> Result<ExpressionTable, TableError> {
    if table.columns.len() < NUM_ID_COLUMNS {
        return Err(TableError::MissingIdColumn {
            name: ID_COLUMN.to_string(),
        });
    }
    for id in keep {
        if table.column_index(id).is_none() {
            return Err(TableError::UnknownColumn { name: id.clone() });
        }
    }

    let kept_indices: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(i, name)| *i < NUM_ID_COLUMNS || keep.contains(*name))
        .map(|(i, _)| i)
        .collect();

    let columns = kept_indices
        .iter()
        .map(|&i| table.columns[i].clone())
        .collect();
    let rows = table
        .rows
        .iter()
        .map(|row| {
            kept_indices
                .iter()
                .map(|&i| row.get(i).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(ExpressionTable::new(columns, rows))
}

/// Extract the `id` and `Gene` value sets of a reference table
pub fn reference_sets(
    table: &ExpressionTable,
) -> Result<(HashSet<String>, HashSet<String>), TableError> {
    let ids = table.column_values(ID_COLUMN)?.into_iter().collect();
    let genes = table.column_values(GENE_COLUMN)?.into_iter().collect();
    Ok((ids, genes))
}

/// Keep rows by membership of either gene key in the reference sets.
///
/// With `include` set, a row survives when its `id` is in `ref_ids` or its
/// `Gene` is in `ref_genes`. With `include` unset the complement survives:
/// rows where neither key matches, so that a match on either key
/// disqualifies a row from the control subset. Row order is preserved.
pub fn subset_by_gene_membership(
    table: &ExpressionTable,
    ref_ids: &HashSet<String>,
    ref_genes: &HashSet<String>,
    include: bool,
) -> Result<ExpressionTable, TableError> {
    let id_idx = table
        .column_index(ID_COLUMN)
        .ok_or_else(|| TableError::MissingIdColumn {
            name: ID_COLUMN.to_string(),
        })?;
    let gene_idx = table
        .column_index(GENE_COLUMN)
        .ok_or_else(|| TableError::MissingIdColumn {
            name: GENE_COLUMN.to_string(),
        })?;

    let rows = table
        .rows
        .iter()
        .filter(|row| {
            let id_match = row.get(id_idx).is_some_and(|v| ref_ids.contains(v));
            let gene_match = row.get(gene_idx).is_some_and(|v| ref_genes.contains(v));
            (id_match || gene_match) == include
        })
        .cloned()
        .collect();

    Ok(ExpressionTable::new(table.columns.clone(), rows))
}

/// Keep rows whose `id` value is in the reference set, in source order
pub fn filter_by_ids(
    table: &ExpressionTable,
    ids: &HashSet<String>,
) -> Result<ExpressionTable, TableError> {
    let id_idx = table
        .column_index(ID_COLUMN)
        .ok_or_else(|| TableError::MissingIdColumn {
            name: ID_COLUMN.to_string(),
        })?;

    let rows = table
        .rows
        .iter()
        .filter(|row| row.get(id_idx).is_some_and(|v| ids.contains(v)))
        .cloned()
        .collect();

    Ok(ExpressionTable::new(table.columns.clone(), rows))
}

/// Mirror a series of tumor-derived control sets: for each control table,
/// filter `all_controls` to the rows whose `id` appears in that table.
/// Outputs come back in the same order as the inputs.
pub fn partition_control_sets(
    all_controls: &ExpressionTable,
    control_tables: &[ExpressionTable],
) -> Result<Vec<ExpressionTable>, TableError> {
    control_tables
        .iter()
        .map(|control| {
            let ids: HashSet<String> = control.column_values(ID_COLUMN)?.into_iter().collect();
            filter_by_ids(all_controls, &ids)
        })
        .collect()
}

/// Finite iterator over a numbered tumor control-set series.
///
/// Probes `<prefix>_df1.csv`, `<prefix>_df2.csv`, ... and ends at the first
/// index with no file. A missing index is the expected end-of-series
/// signal; a file that exists but cannot be read is a real error.
pub struct ControlSeries {
    prefix: String,
    next_index: usize,
    loader: TableLoader,
}

impl ControlSeries {
    /// Start a series scan at index 1
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
            next_index: 1,
            loader: TableLoader::new(),
        }
    }

    /// Path of the tumor control set at the given index
    pub fn path_for(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("{}_df{}.csv", self.prefix, index))
    }
}

impl Iterator for ControlSeries {
    type Item = Result<(usize, ExpressionTable)>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next_index;
        let path = self.path_for(index);
        if !crate::utils::file_exists(&path) {
            debug!("No control set at {:?}; series ends", path);
            return None;
        }
        self.next_index += 1;
        Some(self.loader.load(&path).map(|table| (index, table)))
    }
}

/// Path of the mirrored normal control set at the given index
pub fn normal_set_path(prefix: &str, index: usize) -> PathBuf {
    PathBuf::from(format!("{}_Set{}.csv", prefix, index))
}
