use crate::data::ExpressionTable;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    GzippedCsv,
    GzippedTsv,
}

impl FileFormat {
    /// Detect file format from path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str());
        let stem = path.file_stem().and_then(|s| s.to_str());

        match (ext, stem) {
            (Some("gz"), Some(stem)) => {
                if stem.ends_with(".csv") {
                    Ok(FileFormat::GzippedCsv)
                } else if stem.ends_with(".tsv") || stem.ends_with(".txt") {
                    Ok(FileFormat::GzippedTsv)
                } else {
                    Err(anyhow::anyhow!(
                        "Cannot determine format of gzipped file: {:?}",
                        path
                    ))
                }
            }
            (Some("csv"), _) => Ok(FileFormat::Csv),
            (Some("tsv"), _) | (Some("txt"), _) => Ok(FileFormat::Tsv),
            _ => Err(anyhow::anyhow!("Unsupported file format: {:?}", path)),
        }
    }

    /// Get delimiter character
    pub fn delimiter(&self) -> u8 {
        match self {
            FileFormat::Csv | FileFormat::GzippedCsv => b',',
            FileFormat::Tsv | FileFormat::GzippedTsv => b'\t',
        }
    }

    /// Check if format is gzipped
    pub fn is_gzipped(&self) -> bool {
        matches!(self, FileFormat::GzippedCsv | FileFormat::GzippedTsv)
    }
}

/// Table loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum number of data rows to load (0 = unlimited)
    pub max_rows: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { max_rows: 0 }
    }
}

/// Whole-table reader for expression tables and raw dumps
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    /// Create new table loader with default config
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create new table loader with custom config
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a table from file, detecting the format from the path
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<ExpressionTable> {
        let path = path.as_ref();
        info!("Loading table from {:?}", path);

        let format = FileFormat::from_path(path)?;
        debug!("Detected file format: {:?}", format);

        let table = self.load_with_format(path, format)?;
        info!("Loaded table with shape {:?}", table.shape());
        Ok(table)
    }

    /// Load a raw expression dump. Dumps often ship without an extension;
    /// anything not ending in `.gz` is read as plain tab-delimited text.
    pub fn load_dump<P: AsRef<Path>>(&self, path: P) -> Result<ExpressionTable> {
        let path = path.as_ref();
        info!("Loading raw dump from {:?}", path);

        let format = match FileFormat::from_path(path) {
            Ok(f) => f,
            Err(_) => {
                let gzipped = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == "gz");
                if gzipped {
                    FileFormat::GzippedTsv
                } else {
                    FileFormat::Tsv
                }
            }
        };

        let table = self.load_with_format(path, format)?;
        info!("Loaded dump with shape {:?}", table.shape());
        Ok(table)
    }

    fn load_with_format(&self, path: &Path, format: FileFormat) -> Result<ExpressionTable> {
        if format.is_gzipped() {
            self.load_gzipped(path, format)
        } else {
            self.load_plain(path, format)
        }
    }

    /// Load from plain file
    fn load_plain<P: AsRef<Path>>(&self, path: P, format: FileFormat) -> Result<ExpressionTable> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file {:?}", path.as_ref()))?;
        let reader = BufReader::new(file);
        self.parse_table(reader, format)
    }

    /// Load from gzipped file
    fn load_gzipped<P: AsRef<Path>>(&self, path: P, format: FileFormat) -> Result<ExpressionTable> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open gzipped file {:?}", path.as_ref()))?;
        let gz = GzDecoder::new(file);
        let reader = BufReader::new(gz);
        self.parse_table(reader, format)
    }

    /// Parse a table from a reader
    fn parse_table<R: Read>(&self, reader: R, format: FileFormat) -> Result<ExpressionTable> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(format.delimiter())
            .has_headers(true)
            .from_reader(reader);

        let columns = csv_reader
            .headers()
            .context("Failed to read table header")?
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        debug!("Header has {} columns", columns.len());

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result.context("Failed to parse record")?;
            rows.push(record.iter().map(|s| s.to_string()).collect());

            if self.config.max_rows > 0 && rows.len() >= self.config.max_rows {
                warn!("Reached maximum row limit: {}", self.config.max_rows);
                break;
            }
        }

        Ok(ExpressionTable::new(columns, rows))
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a table as CSV with a single header row
pub fn write_table<P: AsRef<Path>>(table: &ExpressionTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create output file {:?}", path))?;

    writer
        .write_record(&table.columns)
        .context("Failed to write header")?;
    for row in &table.rows {
        writer.write_record(row).context("Failed to write row")?;
    }
    writer.flush().context("Failed to flush output")?;

    debug!("Wrote table with shape {:?} to {:?}", table.shape(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_file_format_detection() {
        assert_eq!(FileFormat::from_path("data.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path("data.tsv").unwrap(), FileFormat::Tsv);
        assert_eq!(FileFormat::from_path("data.txt").unwrap(), FileFormat::Tsv);
        assert_eq!(
            FileFormat::from_path("data.csv.gz").unwrap(),
            FileFormat::GzippedCsv
        );
        assert_eq!(
            FileFormat::from_path("data.tsv.gz").unwrap(),
            FileFormat::GzippedTsv
        );
        assert!(FileFormat::from_path("data.bin").is_err());
    }

    #[test]
    fn test_parse_simple_csv() {
        let csv_data = "id,Gene,TCGA-A-B-11A\nENSG1,TP53,2.5\nENSG2,EGFR,1.0";
        let cursor = Cursor::new(csv_data);

        let loader = TableLoader::new();
        let table = loader.parse_table(cursor, FileFormat::Csv).unwrap();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.columns[2], "TCGA-A-B-11A");
        assert_eq!(table.rows[0], vec!["ENSG1", "TP53", "2.5"]);
    }

    #[test]
    fn test_parse_tab_delimited_dump() {
        let tsv_data = "sample\tTCGA-A-B-11A\tTCGA-A-C-01A\nENSG1\t2.5\t0.1\nENSG2\t1.0\t0.2";
        let cursor = Cursor::new(tsv_data);

        let loader = TableLoader::new();
        let table = loader.parse_table(cursor, FileFormat::Tsv).unwrap();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.columns[0], "sample");
        assert_eq!(table.rows[1], vec!["ENSG2", "1.0", "0.2"]);
    }

    #[test]
    fn test_max_rows_limit() {
        let csv_data = "id,Gene\nENSG1,TP53\nENSG2,EGFR\nENSG3,MYC";
        let loader = TableLoader::with_config(LoaderConfig { max_rows: 2 });
        let table = loader
            .parse_table(Cursor::new(csv_data), FileFormat::Csv)
            .unwrap();

        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let table = ExpressionTable::new(
            vec![
                "id".to_string(),
                "Gene".to_string(),
                "TCGA-A-B-11A".to_string(),
            ],
            vec![
                vec!["ENSG1".to_string(), "TP53".to_string(), "2.50".to_string()],
                vec!["ENSG2".to_string(), "EGFR".to_string(), "0.001".to_string()],
            ],
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        write_table(&table, &path).unwrap();

        let loader = TableLoader::new();
        let read_back = loader.load(&path).unwrap();
        assert_eq!(read_back, table);
    }
}
