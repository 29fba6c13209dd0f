use anyhow::{Context, Result};
use expset::cli::{
    parse_args, setup_logging, Commands, ControlsArgs, ConvertArgs, NormalArgs, SubsetArgs,
};
use expset::data::classify::{classify_normal_samples, parse_samples, ClassificationSummary};
use expset::data::loader::{write_table, LoaderConfig, TableLoader};
use expset::data::partition::{
    self, normal_set_path, reference_sets, subset_by_gene_membership, ControlSeries,
};
use expset::data::ID_COLUMN;
use expset::store::TableStore;
use expset::utils::format_number;
use std::collections::HashSet;
use tracing::{error, info};

fn main() {
    let cli = parse_args();

    setup_logging(cli.verbose);

    info!("{}", expset::info());

    let result = match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Normal(args) => run_normal(args),
        Commands::Subset(args) => run_subset(args),
        Commands::Controls(args) => run_controls(args),
    };

    if let Err(e) = result {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    info!("Converting raw expression dump...");
    info!("Input file: {:?}", args.input);
    info!("Output file: {:?}", args.output);

    let loader = TableLoader::with_config(LoaderConfig {
        max_rows: args.limit,
    });
    let table = loader
        .load_dump(&args.input)
        .with_context(|| format!("Failed to load dump from {:?}", args.input))?;

    info!("Converted {} gene rows", format_number(table.n_rows()));

    write_table(&table, &args.output)?;
    info!("Converted table saved to: {:?}", args.output);

    Ok(())
}

fn run_normal(args: NormalArgs) -> Result<()> {
    info!("Extracting usable normal samples...");
    info!("Input file: {:?}", args.input);
    info!("Output file: {:?}", args.output);

    let loader = TableLoader::new();
    let store = TableStore::new();

    let mut summary: Option<ClassificationSummary> = None;
    let normal = store.get_or_build(&args.output, || {
        let table = loader
            .load(&args.input)
            .with_context(|| format!("Failed to load full table from {:?}", args.input))?;

        let samples =
            parse_samples(table.sample_ids()).context("Failed to parse sample id columns")?;
        let kept = classify_normal_samples(&samples);

        let s = ClassificationSummary::from_samples(&samples, &kept);
        s.log();
        summary = Some(s);

        partition::select_columns(&table, &kept)
            .context("Failed to project the normal sample columns")
    })?;

    info!("Normal table shape: {:?}", normal.shape());

    if let Some(path) = args.summary {
        match summary {
            Some(s) => {
                let report = serde_json::to_string_pretty(&s)?;
                std::fs::write(&path, report)?;
                info!("Classification summary saved to: {:?}", path);
            }
            None => {
                info!("Output was reused from disk; no classification summary to write");
            }
        }
    }

    Ok(())
}

fn run_subset(args: SubsetArgs) -> Result<()> {
    info!("Splitting normal table into SOI and all-controls subsets...");
    info!("Input file: {:?}", args.input);
    info!("SOI reference: {:?}", args.soi);

    let loader = TableLoader::new();
    let store = TableStore::new();

    let normal = loader
        .load(&args.input)
        .with_context(|| format!("Failed to load normal table from {:?}", args.input))?;
    let soi_table = loader
        .load(&args.soi)
        .with_context(|| format!("Failed to load SOI reference from {:?}", args.soi))?;

    let (ref_ids, ref_genes) =
        reference_sets(&soi_table).context("SOI reference table is missing identifier columns")?;
    info!(
        "SOI reference: {} gene ids, {} gene symbols",
        format_number(ref_ids.len()),
        format_number(ref_genes.len())
    );

    let soi = store.get_or_build(&args.soi_output, || {
        subset_by_gene_membership(&normal, &ref_ids, &ref_genes, true)
            .context("Failed to build the SOI subset")
    })?;
    info!("SOI subset shape: {:?}", soi.shape());

    let ctrl = store.get_or_build(&args.ctrl_output, || {
        subset_by_gene_membership(&normal, &ref_ids, &ref_genes, false)
            .context("Failed to build the all-controls subset")
    })?;
    info!("All-controls subset shape: {:?}", ctrl.shape());

    Ok(())
}

fn run_controls(args: ControlsArgs) -> Result<()> {
    info!("Mirroring tumor control sets...");
    info!("Input file: {:?}", args.input);
    info!("Tumor series prefix: {}", args.tumor_prefix);
    info!("Output series prefix: {}", args.output_prefix);

    let loader = TableLoader::new();
    let all_controls = loader
        .load(&args.input)
        .with_context(|| format!("Failed to load all-controls table from {:?}", args.input))?;

    let mut n_sets = 0usize;
    for item in ControlSeries::new(args.tumor_prefix.as_str()) {
        let (index, tumor) = item?;
        let ids: HashSet<String> = tumor
            .column_values(ID_COLUMN)
            .with_context(|| format!("Tumor control set {} is missing its id column", index))?
            .into_iter()
            .collect();

        let set = partition::filter_by_ids(&all_controls, &ids)?;
        let out_path = normal_set_path(&args.output_prefix, index);
        write_table(&set, &out_path)?;
        info!(
            "Control set {}: {} rows saved to {:?}",
            index,
            format_number(set.n_rows()),
            out_path
        );
        n_sets += 1;
    }

    info!("Mirrored {} control sets", n_sets);

    Ok(())
}
