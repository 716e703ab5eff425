//! Describes one server and prints the result as JSON.
//!
//! ```text
//! cargo run --example get_server -- <instance-id> [--project <id>] [--save <path>]
//! ```
//!
//! Connection settings come from the `OS_*` variables (a `.env` file is read
//! when present). Set `RUST_LOG=openstack_inspector=debug` for request logs.

use openstack_inspector::{GetServerRequest, OpenStackClientBuilder};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let mut request = GetServerRequest::default();
    let mut save_to = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--project" => request.project_id = args.next(),
            "--region" => request.region = args.next(),
            "--save" => save_to = args.next(),
            _ => request.instance_id = arg,
        }
    }

    let client = match OpenStackClientBuilder::from_env().and_then(|builder| builder.build()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = client.invoke(&request).await;
    let json = match serde_json::to_string_pretty(&outcome.to_json()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("failed to render result: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", json);

    if let Some(path) = save_to {
        if let Err(e) = std::fs::write(&path, &json) {
            eprintln!("failed to write {}: {}", path, e);
            return ExitCode::FAILURE;
        }
        eprintln!("saved to {}", path);
    }

    if outcome.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
