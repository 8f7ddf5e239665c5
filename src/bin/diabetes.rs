//! CLI entry point for the diabetes outcome classification.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tabular_eda::DiabetesConfig;
use tabular_eda::cli::{self, CommonArgs};
use tabular_eda::workflows::diabetes;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Train and tune a decision tree that predicts diabetes outcome"
)]
struct Args {
    /// Path to the patient measurements CSV
    #[arg(short, long, default_value = "diabetes BY Dr.NG.csv")]
    input: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    cli::init_logging(&args.common.log_level, args.common.json);

    let df = cli::load_input(&args.input)?;
    let config: DiabetesConfig = cli::load_config(args.common.config.as_deref())?;

    if !args.common.json {
        println!("{}", diabetes::explore(&df)?);
    }

    let report = diabetes::run(&df, &config)?;
    cli::print_report(&report, args.common.json)
}
