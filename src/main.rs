// ABOUTME: Entry point for the ghdtool CLI application.
// ABOUTME: Parses arguments, wires the client, and maps outcomes to exit codes.

mod cli;

use clap::Parser;
use cli::Cli;
use ghdtool::config::Request;
use ghdtool::error::Result;
use ghdtool::github::GithubClient;
use ghdtool::output;
use ghdtool::resilience::ResilientTransport;
use ghdtool::workflow::Worker;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let request = cli.command.into_request();

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let code = match run(request, cancel).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };
    std::process::exit(code);
}

async fn run(request: Request, cancel: CancellationToken) -> Result<i32> {
    let transport = ResilientTransport::new(request.token())?;
    let worker = Worker::new(GithubClient::new(transport));

    let code = match &request {
        Request::List(query) => {
            let outcome = worker.list_deployments(query, &cancel).await;
            output::render_list(&outcome)
        }
        Request::Create(create) => {
            let outcome = worker.create_deployment(create, &cancel).await;
            output::render_create(&outcome)
        }
    };
    Ok(code)
}
