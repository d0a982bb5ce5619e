use clap::Parser;

/// Cross-references the winning constituency candidates with the top
/// party-list rankings, one JSON file per electoral area on each side.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (directory path) The directory holding the per-area constituency results,
    /// one `<area>.json` file per area.
    #[clap(long, value_parser, default_value = "data/mp")]
    pub mp_dir: String,

    /// (directory path) The directory holding the per-area party-list results.
    /// Areas without a file here are skipped.
    #[clap(long, value_parser, default_value = "data/pl")]
    pub pl_dir: String,

    /// If passed as an argument, writes the full results and a history snapshot
    /// in JSON format under docs/data.
    #[clap(short, long, takes_value = false)]
    pub export: bool,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
