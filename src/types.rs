use serde::{Deserialize, Serialize};

use crate::error::{Result, SignerError};

/// One signing request, exactly as the caller sends it.
/// Numbers stay strings here; they are validated before any stage runs.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SigningRequest {
    pub wallet_name: String,
    pub account_address: String,
    pub contract: String,
    pub gas_price: String,
    pub nonce: String,
    #[serde(alias = "shouldStartAtElement")]
    pub start_index: String,
    pub batch: Vec<String>,
    #[serde(default)]
    pub gas_limit: Option<String>,
}

impl SigningRequest {
    /// Parse a JSON body; unknown or missing fields are rejected here.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| SignerError::validation(format!("invalid request: {e}")))
    }
}

/// The only output of a successful request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningResponse {
    pub contract: String,
    pub transaction_hash: String,
    pub signed_transaction: String,
    pub from: String,
    pub nonce: u64,
    /// Decimal; may exceed 64 bits.
    pub gas_price: String,
    pub gas_limit: u64,
}

/// Body printed by the CLI when a request fails.
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: &'static str,
    pub message: String,
}

impl From<&SignerError> for ErrorOut {
    fn from(e: &SignerError) -> Self {
        Self { error: e.kind(), message: e.reason().to_string() }
    }
}

/// Output shape of `decode`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTxOut {
    pub transaction_hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas_limit: String,
    pub gas_price: String,
    pub nonce: String,
    pub chain_id: u64,
    pub encoded_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded_data: Option<AppendStateBatchOut>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppendStateBatchOut {
    pub func_name: String,
    pub should_start_at_element: String,
    pub batch: Vec<String>,
}
