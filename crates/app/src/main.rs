//! hecodec: compress or restore one file.
//!
//! `hecodec FILE` encodes FILE into FILE.he; `hecodec FILE.he` decodes it back
//! after verifying the embedded digest. Either way the MD5 digest of the raw
//! data is printed.

mod config;
mod input_gen;
mod runner;

use config::{print_help, Config};
use runner::Outcome;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("run with --help for usage");
            process::exit(runner::EXIT_FAILURE);
        }
    };

    if config.help {
        print_help();
        return;
    }

    init_logging(config.verbose);
    if config.verbose {
        config.print();
    }

    match runner::run(&config) {
        Ok(outcome) => report(&outcome, config.print_stats),
        Err(err) => {
            if err.is_integrity_failure() {
                eprintln!("error: invalid file: {err}");
            } else {
                eprintln!("error: {err}");
            }
            process::exit(runner::exit_code(&err));
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn report(outcome: &Outcome, print_stats: bool) {
    match outcome {
        Outcome::Encoded {
            output,
            digest,
            stats,
        }
        | Outcome::Decoded {
            output,
            digest,
            stats,
        } => {
            log::info!("wrote {}", output.display());
            println!("md5: {digest}");
            if print_stats {
                stats.print_summary();
            }
        }
        Outcome::Generated { output, bytes } => {
            println!("generated {} bytes at {}", bytes, output.display());
        }
    }
}
