mod args;
mod tally;

use clap::Parser;
use env_logger::Env;
use snafu::ErrorCompat;
use std::error::Error;

fn main() {
    let args = args::Args::parse();

    let level = if args.verbose || args.debug {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    log::debug!("args: {:?}", args);

    if let Err(e) = tally::run(&args) {
        eprintln!("An error occured: {}", e);
        let mut source = e.source();
        while let Some(s) = source {
            eprintln!("  caused by: {}", s);
            source = s.source();
        }
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
