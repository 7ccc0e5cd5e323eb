use clap::Parser;
use pricesweep::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
