use clap::Parser;
use log::info;
use snafu::ErrorCompat;

mod args;
mod comparer;

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    println!("--- MP winning number vs top 7 party-list comparison ---");
    println!("Logic: party numbers 06 and 09 are ignored");

    info!(
        "comparing {:?} (constituency) against {:?} (party list)",
        args.mp_dir, args.pl_dir
    );
    let res = comparer::run_comparison(&args.mp_dir, &args.pl_dir, args.export);
    if let Err(e) = res {
        eprintln!("An error occurred: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
