use clap::Parser;
use fontpatch_cli::{init_logging, run, Args};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
