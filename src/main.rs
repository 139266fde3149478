use std::process::ExitCode;

use clap::Parser;
use tutorhub_lib::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("tutorhub: {err:#}");
            ExitCode::from(2)
        }
    }
}
