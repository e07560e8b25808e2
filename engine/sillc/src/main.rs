//! Sill CLI
//!
//! Incremental statement evaluation for ML-like sources.

use sillc::commands::{highlight_file, run_file, run_repl};
use sillc::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let result = match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: sill run <file.sml>");
                std::process::exit(1);
            }
            run_file(&args[2])
        }
        "repl" => run_repl(),
        "highlight" => {
            if args.len() < 3 {
                eprintln!("Usage: sill highlight <file.sml>");
                std::process::exit(1);
            }
            highlight_file(&args[2])
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        _ => {
            eprintln!("error: unknown command '{command}'");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: sill <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file.sml>        Evaluate a file statement by statement");
    eprintln!("  repl                  Line-oriented live session");
    eprintln!("  highlight <file.sml>  Print the classified token table");
    eprintln!();
    eprintln!("Set RUST_LOG for engine traces (e.g. RUST_LOG=sill_engine=debug).");
}
