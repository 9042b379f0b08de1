mod cli;

use crate::cli::CliCommand;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI, load config, init logging, and dispatch.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("skufetch error: {:#}", err);
        std::process::exit(1);
    }
}
