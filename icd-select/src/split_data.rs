use clap::Args;
use icd_data::partition::split_records;
use icd_data::records::{read_records, write_records};
use log::info;

#[derive(Args, Debug)]
pub struct SplitArgs {
    #[arg(
        short = 'd',
        long = "data",
        required = true,
        help = "Generated sequence file (.jsonl or .jsonl.gz)",
        long_help = "Generated demonstration sequences, one JSON id list\n\
		     per line; the terminal id of each list is the\n\
		     query id."
    )]
    data_file: Box<str>,

    #[arg(
        long,
        short = 'r',
        default_value_t = 0.9,
        help = "Fraction of distinct query ids for training",
        long_help = "Fraction of distinct query ids routed to the training\n\
		     side; the remaining ids supervise the validation\n\
		     loss. Must lie strictly between 0 and 1."
    )]
    train_ratio: f64,

    #[arg(
        long,
        short,
        required = true,
        help = "Output header",
        long_help = "Output header for the two partition files:\n\
		     \n\
		     `{out}.train.jsonl.gz` and `{out}.val.jsonl.gz`"
    )]
    out: Box<str>,

    #[arg(long, short, help = "Verbosity")]
    verbose: bool,
}

pub fn run_split(args: &SplitArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let records = read_records(&args.data_file)?;
    let split = split_records(&records, args.train_ratio)?;

    let train_file = format!("{}.train.jsonl.gz", args.out);
    let val_file = format!("{}.val.jsonl.gz", args.out);

    write_records(&split.train, &train_file)?;
    write_records(&split.validation, &val_file)?;

    info!(
        "train size {}, validation size {}",
        split.train.len(),
        split.validation.len()
    );

    Ok(())
}
