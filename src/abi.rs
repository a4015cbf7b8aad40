use anyhow::{Context, Result};
use ethers_core::abi::{Abi, Function};

/// State commitment chain method that appends a batch of roots.
pub const APPEND_STATE_BATCH: &str = "appendStateBatch";

const STATE_COMMITMENT_CHAIN_ABI: &str = r#"[
  {
    "inputs": [
      { "internalType": "bytes32[]", "name": "_batch", "type": "bytes32[]" },
      { "internalType": "uint256", "name": "_shouldStartAtElement", "type": "uint256" }
    ],
    "name": "appendStateBatch",
    "outputs": [],
    "stateMutability": "nonpayable",
    "type": "function"
  }
]"#;

pub fn load_abi() -> Result<Abi> {
    serde_json::from_str(STATE_COMMITMENT_CHAIN_ABI).context("parsing embedded state commitment chain ABI")
}

pub fn append_state_batch(abi: &Abi) -> Result<&Function> {
    abi.function(APPEND_STATE_BATCH)
        .with_context(|| format!("function '{APPEND_STATE_BATCH}' not in embedded ABI"))
}
