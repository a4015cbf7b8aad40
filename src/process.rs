//! The signing pipeline.
//!
//! Validate → resolve key → hash batch → build call → sign → encode.
//! Each stage runs only if the previous one succeeded, and nothing is
//! submitted to a network: the output is a signed transaction the caller
//! may broadcast.
//!
//! Nonce and gas price are taken from the request as-is. Two concurrent
//! requests for the same account with the same nonce will both be signed;
//! keeping nonces unique is the caller's job.

use std::fmt;

use ethers_core::types::{Address, U256};
use ethers_core::utils::to_checksum;
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::abi::load_abi;
use crate::config::SignerConfig;
use crate::encoding::{build_append_state_batch, TxParams};
use crate::error::{Result, SignerError};
use crate::hashing::hash_batch;
use crate::key::resolve;
use crate::keystore::KeyStore;
use crate::signing::{sign_legacy, SignedTransaction};
use crate::types::{SigningRequest, SigningResponse};
use crate::util::{bytes_to_0x, parse_addr, valid_number, valid_u64};

/// Largest chain id whose EIP-155 `v = recid + 35 + 2 * chainId` fits in a u64 (EIP-2294).
pub const MAX_CHAIN_ID: u64 = (u64::MAX - 36) / 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Resolving,
    Hashing,
    Building,
    Signing,
    Encoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Validating => "validating",
            Stage::Resolving => "resolving",
            Stage::Hashing => "hashing",
            Stage::Building => "building",
            Stage::Signing => "signing",
            Stage::Encoding => "encoding",
        };
        f.write_str(s)
    }
}

/// Request after every field has been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub wallet_name: String,
    pub account: Address,
    pub contract: Address,
    pub start_index: U256,
    pub params: TxParams,
}

/// Check every field of `req` plus the configured chain id.
/// The batch is only checked for emptiness; its elements are decoded while hashing.
pub fn validate(req: &SigningRequest, config: &SignerConfig) -> Result<ValidatedRequest> {
    let invalid = |field: &str| SignerError::validation(format!("invalid {field}"));

    if req.wallet_name.trim().is_empty() {
        return Err(invalid("walletName"));
    }
    let account = parse_addr(&req.account_address).ok_or_else(|| invalid("accountAddress"))?;
    let contract = parse_addr(&req.contract).ok_or_else(|| invalid("contract"))?;

    let chain_id = valid_u64(&config.chain_id)
        .filter(|id| (1..=MAX_CHAIN_ID).contains(id))
        .ok_or_else(|| SignerError::validation("invalid chain ID"))?;
    let gas_price = valid_number(&req.gas_price).ok_or_else(|| invalid("gasPrice"))?;
    let nonce = valid_u64(&req.nonce).ok_or_else(|| invalid("nonce"))?;
    let start_index = valid_number(&req.start_index).ok_or_else(|| invalid("startIndex"))?;
    let gas_limit = match req.gas_limit.as_deref() {
        Some(raw) => valid_u64(raw).ok_or_else(|| invalid("gasLimit"))?,
        None => config.default_gas_limit,
    };

    if req.batch.is_empty() {
        return Err(SignerError::validation("invalid batch - empty"));
    }

    Ok(ValidatedRequest {
        wallet_name: req.wallet_name.clone(),
        account,
        contract,
        start_index,
        params: TxParams { gas_price, gas_limit, nonce, chain_id },
    })
}

/// Compose the result record from the signed transaction.
pub fn encode_response(signed: &SignedTransaction) -> SigningResponse {
    let tx = signed.transaction();
    SigningResponse {
        contract: to_checksum(&tx.to, None),
        transaction_hash: format!("{:#x}", signed.hash()),
        signed_transaction: bytes_to_0x(signed.raw()),
        from: to_checksum(&signed.from(), None),
        nonce: tx.params.nonce,
        gas_price: tx.params.gas_price.to_string(),
        gas_limit: tx.params.gas_limit,
    }
}

/// Run one request through every stage.
pub async fn process_request(
    store: &dyn KeyStore,
    config: &SignerConfig,
    req: &SigningRequest,
) -> Result<SigningResponse> {
    let span = tracing::info_span!(
        "sign_request",
        request_id = %Uuid::new_v4(),
        wallet = %req.wallet_name,
        batch_len = req.batch.len(),
    );

    async {
        let mut stage = Stage::Validating;
        let res = run_stages(store, config, req, &mut stage).await;
        match &res {
            Ok(resp) => info!(
                tx_hash = %resp.transaction_hash,
                nonce = resp.nonce,
                "signed state batch"
            ),
            Err(e) => warn!(%stage, kind = e.kind(), reason = e.reason(), "signing request aborted"),
        }
        res
    }
    .instrument(span)
    .await
}

async fn run_stages(
    store: &dyn KeyStore,
    config: &SignerConfig,
    req: &SigningRequest,
    stage: &mut Stage,
) -> Result<SigningResponse> {
    debug!(stage = %stage);
    let valid = validate(req, config)?;

    *stage = Stage::Resolving;
    debug!(stage = %stage, account = %to_checksum(&valid.account, None));
    let account = resolve(store, &valid.wallet_name, &valid.account).await?;

    *stage = Stage::Hashing;
    debug!(stage = %stage);
    let digests = hash_batch(&req.batch)?;

    *stage = Stage::Building;
    debug!(stage = %stage, contract = %to_checksum(&valid.contract, None));
    let abi = load_abi().map_err(|e| SignerError::signing(format!("{e:#}")))?;
    let tx = build_append_state_batch(&abi, valid.contract, &digests, valid.start_index, valid.params)
        .map_err(|e| SignerError::signing(format!("building call: {e:#}")))?;

    *stage = Stage::Signing;
    debug!(stage = %stage, index = account.index);
    let signed = sign_legacy(&account.wallet, &tx, &config.limits()).await?;
    drop(account);

    *stage = Stage::Encoding;
    debug!(stage = %stage);
    Ok(encode_response(&signed))
}
