//! CLI entry point for the used-car price regression.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tabular_eda::CarPriceConfig;
use tabular_eda::cli::{self, CommonArgs};
use tabular_eda::workflows::car_price;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Fit OLS, Ridge and Lasso models to used-car listings and compare them"
)]
struct Args {
    /// Path to the car listings CSV
    #[arg(short, long, default_value = "Craigslist Car Dataset.csv")]
    input: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    cli::init_logging(&args.common.log_level, args.common.json);

    let df = cli::load_input(&args.input)?;
    let config: CarPriceConfig = cli::load_config(args.common.config.as_deref())?;

    if !args.common.json {
        println!("{}", car_price::explore(&df, config.head_rows)?);
    }

    let report = car_price::run(&df, &config)?;
    cli::print_report(&report, args.common.json)
}
