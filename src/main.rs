// Entrypoint for the ban tool.
// - Parses arguments, sets up logging, runs first-run setup, then hands a
//   configured workflow the operator's console.
// - Every fatal error, including a bad --api-base, goes through `fail`: it
//   is printed to stdout like every other message and the run exits with
//   status 1. A finished or cancelled run exits with 0.

use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vkban_cli::api::{ApiClient, HttpTransport};
use vkban_cli::cli::Cli;
use vkban_cli::config::ConfigStore;
use vkban_cli::setup::ensure_initialized;
use vkban_cli::ui::{report_fatal, Console, Prompter};
use vkban_cli::workflow::{BanWorkflow, Outcome};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = ConfigStore::new(cli.pointer_file.clone());
    let mut console = Console;

    match ensure_initialized(&store, &mut console) {
        Ok(true) => {}
        Ok(false) => {
            console.say("> Quit...");
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(&e),
    }

    let document = match store.load() {
        Ok(document) => document,
        Err(e) => return fail(&e),
    };
    let transport = match HttpTransport::new(&cli.api_base) {
        Ok(transport) => transport,
        Err(e) => return fail(&e),
    };
    let client = ApiClient::new(transport);
    let mut workflow =
        BanWorkflow::new(client, &store, document, console).with_retry(cli.retry_policy());

    match workflow.run() {
        Ok(Outcome::Banned { display_name }) => {
            info!("done: {display_name}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Cancelled) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &dyn std::error::Error) -> ExitCode {
    // Nothing left to tell the operator if stdout itself is gone.
    let _ = report_fatal(&mut std::io::stdout(), e);
    ExitCode::FAILURE
}
