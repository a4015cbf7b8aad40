use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SignerConfig;
use crate::defaults::Defaults;

/// State batch signer: validates a request, signs an appendStateBatch call, prints it
#[derive(Parser, Debug)]
#[command(version, about = "Offline signer for state commitment batches")]
pub struct Cli {
    /// Emit logs as JSON (logs always go to stderr)
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign one request JSON and print the signed transaction record
    Sign {
        /// Path to the request JSON, or "-" for stdin
        #[arg(long)]
        request: String,

        /// Key store JSON file
        #[arg(long, env = "STATE_SIGNER_KEYSTORE", default_value = Defaults::KEYSTORE_PATH)]
        keystore: PathBuf,

        /// Chain id the transaction is bound to (decimal or 0x-hex)
        #[arg(long, env = "STATE_SIGNER_CHAIN_ID", default_value = Defaults::CHAIN_ID)]
        chain_id: String,

        /// Gas limit used when the request carries none
        #[arg(long, default_value_t = Defaults::GAS_LIMIT)]
        gas_limit: u64,

        /// Largest gas limit the signer will accept
        #[arg(long, default_value_t = Defaults::MAX_GAS_LIMIT)]
        max_gas_limit: u64,

        /// Largest signed transaction, in bytes
        #[arg(long, default_value_t = Defaults::MAX_TX_SIZE)]
        max_tx_size: usize,

        /// Abort the request after this many seconds
        #[arg(long, env = "STATE_SIGNER_TIMEOUT_SECS", default_value_t = Defaults::TIMEOUT_SECS)]
        timeout_secs: u64,

        /// Also write the record into this directory (never overwrites)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Decode a raw signed transaction and recover its sender
    Decode {
        /// 0x-prefixed raw transaction hex
        #[arg(long)]
        raw: String,
    },
}

impl Command {
    pub fn signer_config(&self) -> Option<SignerConfig> {
        match self {
            Command::Sign { chain_id, gas_limit, max_gas_limit, max_tx_size, .. } => Some(SignerConfig {
                chain_id: chain_id.clone(),
                default_gas_limit: *gas_limit,
                max_gas_limit: *max_gas_limit,
                max_tx_size: *max_tx_size,
            }),
            Command::Decode { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_defaults() {
        let cli = Cli::try_parse_from(["state-batch-signer", "sign", "--request", "req.json"]).unwrap();
        let cfg = cli.cmd.signer_config().unwrap();
        assert_eq!(cfg.default_gas_limit, Defaults::GAS_LIMIT);
        assert_eq!(cfg.max_tx_size, Defaults::MAX_TX_SIZE);
        assert!(!cli.log_json);
    }

    #[test]
    fn overrides_and_decode() {
        let cli = Cli::try_parse_from([
            "state-batch-signer", "--log-json", "sign", "--request", "-", "--chain-id", "0xa", "--gas-limit", "500000",
        ])
        .unwrap();
        assert!(cli.log_json);
        let cfg = cli.cmd.signer_config().unwrap();
        assert_eq!(cfg.chain_id, "0xa");
        assert_eq!(cfg.default_gas_limit, 500_000);

        let cli = Cli::try_parse_from(["state-batch-signer", "decode", "--raw", "0xf8"]).unwrap();
        assert!(cli.cmd.signer_config().is_none());
    }
}
