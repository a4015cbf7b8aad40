use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use state_batch_signer::abi::load_abi;
use state_batch_signer::cli::{Cli, Command};
use state_batch_signer::decoder::build_decoded;
use state_batch_signer::types::ErrorOut;
use state_batch_signer::write_signed_transactions_to_file::write_signed_transaction_to_dir;
use state_batch_signer::{process_request, FileKeyStore, SignerError, SigningRequest};

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_request(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading request from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading request {source}"))
    }
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    let config = cli.cmd.signer_config();

    match cli.cmd {
        Command::Sign { request, keystore, timeout_secs, out_dir, compact, .. } => {
            let config = config.unwrap_or_default();
            let text = read_request(&request)?;
            let store = FileKeyStore::new(keystore);

            let outcome = match SigningRequest::from_json(&text) {
                Ok(req) => tokio::time::timeout(
                    Duration::from_secs(timeout_secs),
                    process_request(&store, &config, &req),
                )
                .await
                .unwrap_or_else(|_| Err(SignerError::collaborator("request timed out"))),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(resp) => {
                    if let Some(dir) = out_dir {
                        let path = write_signed_transaction_to_dir(&dir, &resp, !compact)?;
                        tracing::info!(path = %path.display(), "wrote signed transaction");
                    }
                    print_json(&resp, compact)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    print_json(&ErrorOut::from(&e), compact)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Command::Decode { raw } => {
            let abi = load_abi()?;
            let decoded = build_decoded(&abi, &raw).context("decoding signed transaction")?;
            print_json(&decoded, false)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
