use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// expset: TCGA gene-expression subset preparation
#[derive(Parser, Debug)]
#[command(name = "expset")]
#[command(about = "TCGA gene-expression subset preparation")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a raw tab-delimited expression dump to CSV
    Convert(ConvertArgs),

    /// Extract the usable normal samples from a full expression table
    Normal(NormalArgs),

    /// Split a normal table into set-of-interest and all-controls subsets
    Subset(SubsetArgs),

    /// Mirror a tumor control-set series into normal control sets
    Controls(ControlsArgs),
}

/// Conversion arguments
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Raw expression dump, tab-delimited, optionally gzipped
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Output CSV file
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Maximum number of gene rows to convert (0 = all)
    #[arg(short, long, default_value = "0")]
    pub limit: usize,
}

/// Normal-subset arguments
#[derive(Parser, Debug)]
pub struct NormalArgs {
    /// Full expression table (CSV with id, Gene and sample columns)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Output CSV file for the normal subset
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Optional JSON file for the classification summary
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// SOI / all-controls split arguments
#[derive(Parser, Debug)]
pub struct SubsetArgs {
    /// Normal expression table (CSV)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Set-of-interest reference table (CSV with id and Gene columns)
    #[arg(long, required = true)]
    pub soi: PathBuf,

    /// Output CSV file for the set-of-interest subset
    #[arg(long, required = true)]
    pub soi_output: PathBuf,

    /// Output CSV file for the all-controls subset
    #[arg(long, required = true)]
    pub ctrl_output: PathBuf,
}

/// Control-set mirroring arguments
#[derive(Parser, Debug)]
pub struct ControlsArgs {
    /// All-controls normal expression table (CSV)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Path prefix of the tumor control sets (<prefix>_df1.csv, ...)
    #[arg(long, required = true)]
    pub tumor_prefix: String,

    /// Path prefix of the mirrored normal sets (<prefix>_Set1.csv, ...)
    #[arg(long, required = true)]
    pub output_prefix: String,
}

/// Parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Setup logging based on verbosity
pub fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_args() {
        let cli = Cli::parse_from(["expset", "convert", "-i", "dump.txt", "-o", "full.csv"]);

        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("dump.txt"));
                assert_eq!(args.output, PathBuf::from("full.csv"));
                assert_eq!(args.limit, 0);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_normal_args() {
        let cli = Cli::parse_from([
            "expset",
            "normal",
            "-i",
            "TCGA_mRNA_TPM_Full.csv",
            "-o",
            "TCGA_Normal_mRNA_TPM_Full.csv",
        ]);

        match cli.command {
            Commands::Normal(args) => {
                assert_eq!(args.input, PathBuf::from("TCGA_mRNA_TPM_Full.csv"));
                assert!(args.summary.is_none());
            }
            _ => panic!("Expected Normal command"),
        }
    }

    #[test]
    fn test_subset_args() {
        let cli = Cli::parse_from([
            "expset",
            "subset",
            "-i",
            "normal.csv",
            "--soi",
            "soi.csv",
            "--soi-output",
            "normal_soi.csv",
            "--ctrl-output",
            "normal_ctrl.csv",
        ]);

        match cli.command {
            Commands::Subset(args) => {
                assert_eq!(args.soi, PathBuf::from("soi.csv"));
                assert_eq!(args.ctrl_output, PathBuf::from("normal_ctrl.csv"));
            }
            _ => panic!("Expected Subset command"),
        }
    }

    #[test]
    fn test_controls_args_with_verbose() {
        let cli = Cli::parse_from([
            "expset",
            "controls",
            "-i",
            "normal_ctrl.csv",
            "--tumor-prefix",
            "TCGA_TPM_RNA_Control",
            "--output-prefix",
            "TCGA_Normal_mRNA_TPM_CTRL",
            "--verbose",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Controls(args) => {
                assert_eq!(args.tumor_prefix, "TCGA_TPM_RNA_Control");
                assert_eq!(args.output_prefix, "TCGA_Normal_mRNA_TPM_CTRL");
            }
            _ => panic!("Expected Controls command"),
        }
    }
}
