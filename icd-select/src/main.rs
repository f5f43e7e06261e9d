mod retrieve;
mod split_data;

use clap::{Parser, Subcommand};
use retrieve::*;
use split_data::*;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ICD-SELECT",
    long_about = "Build in-context demonstration selection data.\n\
		  Feature matrices are parquet files produced by the\n\
		  feature cache; sequence files are JSON lines\n\
		  (gzipped or not) whose terminal id is the query id."
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Shortlist similar candidates for every query",
        long_about = "Exact inner-product retrieval in two stages:\n\
		      (1) Build a similarity index over the candidate features\n\
		      (2) Rank the top-k candidate ids for every query vector.\n"
    )]
    Retrieve(RetrieveArgs),

    #[command(
        about = "Split generated sequences into train and validation",
        long_about = "Partition generated demonstration sequences by their\n\
		      query ids so that no query id leaks across the two\n\
		      sides. The split is deterministic for a fixed input\n\
		      and ratio.\n"
    )]
    Split(SplitArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Retrieve(args) => {
            run_retrieve(args)?;
        }
        Commands::Split(args) => {
            run_split(args)?;
        }
    }

    Ok(())
}
