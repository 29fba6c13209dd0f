use crate::data::loader::{write_table, TableLoader};
use crate::data::ExpressionTable;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Path-addressed cache for derived tables.
///
/// `get_or_build` makes the reuse policy explicit: an output that already
/// exists on disk is read back instead of recomputed, otherwise the builder
/// runs and its result is written before being returned. Rerunning a
/// command therefore skips every step whose output file survived.
pub struct TableStore {
    loader: TableLoader,
}

impl TableStore {
    /// Create a store with a default loader
    pub fn new() -> Self {
        Self {
            loader: TableLoader::new(),
        }
    }

    /// Return the table at `path`, building and saving it if absent
    pub fn get_or_build<P, F>(&self, path: P, build: F) -> Result<ExpressionTable>
    where
        P: AsRef<Path>,
        F: FnOnce() -> Result<ExpressionTable>,
    {
        let path = path.as_ref();
        if crate::utils::file_exists(path) {
            info!("Reusing existing table at {:?}", path);
            return self.loader.load(path);
        }

        let table = build()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                crate::utils::ensure_dir(parent)?;
            }
        }
        write_table(&table, path)?;
        info!("Built table with shape {:?}, saved to {:?}", table.shape(), path);
        Ok(table)
    }
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new()
    }
}
