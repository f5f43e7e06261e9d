use clap::Args;
use log::info;
use serde::Serialize;
use vector_util::common_io::write_lines;
use vector_util::normalize::NormalizeRows;
use vector_util::parquet_io::read_feature_matrix;
use vector_util::similarity::SimilarityIndex;

#[derive(Args, Debug)]
pub struct RetrieveArgs {
    #[arg(
        short = 'c',
        long = "candidate-features",
        required = true,
        help = "Candidate feature matrix (parquet)",
        long_help = "Feature matrix of the candidate pool, one row\n\
		     vector per item, as written by the feature cache.\n\
		     Row order defines the candidate ids."
    )]
    candidate_features: Box<str>,

    #[arg(
        short = 'q',
        long = "query-features",
        required = true,
        help = "Query feature matrix (parquet)",
        long_help = "Feature matrix of the query items, one row vector\n\
		     per query, with the same dimension as the\n\
		     candidate features."
    )]
    query_features: Box<str>,

    #[arg(
        long,
        short = 'k',
        default_value_t = 200,
        help = "Number of candidates to keep per query"
    )]
    top_k: usize,

    #[arg(
        long,
        help = "L2-normalize rows before the search",
        long_help = "L2-normalize the loaded rows before searching.\n\
		     Features written by the feature cache are already\n\
		     unit norm; use this for matrices produced elsewhere."
    )]
    normalize: bool,

    #[arg(
        long,
        short,
        required = true,
        help = "Output shortlist file (.jsonl or .jsonl.gz)"
    )]
    out: Box<str>,

    #[arg(long, short, help = "Verbosity")]
    verbose: bool,
}

#[derive(Serialize)]
struct ShortlistRow {
    query_id: usize,
    ids: Vec<usize>,
    scores: Vec<f32>,
}

pub fn run_retrieve(args: &RetrieveArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let (mut candidates, _) = read_feature_matrix(&args.candidate_features)?;
    let (mut queries, _) = read_feature_matrix(&args.query_features)?;

    if args.normalize {
        candidates.normalize_rows_inplace();
        queries.normalize_rows_inplace();
    }

    info!(
        "retrieving top {} of {} candidates for {} queries",
        args.top_k,
        candidates.nrows(),
        queries.nrows()
    );

    let index = SimilarityIndex::build(candidates);
    let hits = index.search(queries.view(), args.top_k)?;

    let lines = hits
        .iter()
        .enumerate()
        .map(|(query_id, neighbours)| {
            let row = ShortlistRow {
                query_id,
                ids: neighbours.iter().map(|h| h.id).collect(),
                scores: neighbours.iter().map(|h| h.score).collect(),
            };
            Ok(serde_json::to_string(&row)?.into_boxed_str())
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    write_lines(&lines, &args.out)?;
    info!("wrote shortlists: {}", args.out);

    Ok(())
}
