use std::process::ExitCode;

use clap::Parser;

mod catalog;
mod cli;
mod config;
mod error;
mod library;
mod runtime;
mod tagger;

fn main() -> ExitCode {
    runtime::logging::init();

    match runtime::run(cli::Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bpm-tagger: {e}");
            ExitCode::FAILURE
        }
    }
}
