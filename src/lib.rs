//! Validates a state batch request, resolves the sequencer key, and produces
//! a signed `appendStateBatch` transaction without touching the network.

pub mod abi;
pub mod cli;
pub mod config;
pub mod decoder;
pub mod defaults;
pub mod encoding;
pub mod error;
pub mod hashing;
pub mod key;
pub mod keystore;
pub mod process;
pub mod signing;
pub mod types;
pub mod util;
pub mod write_signed_transactions_to_file;

pub use config::SignerConfig;
pub use error::{Result, SignerError};
pub use keystore::{AccountRecord, FileKeyStore, KeyStore, MemoryKeyStore, WalletRecord};
pub use process::process_request;
pub use types::{SigningRequest, SigningResponse};
