use anyhow::{anyhow, Result};
use ethers_core::abi::{Abi, Token};
use ethers_core::types::U256;
use ethers_core::utils::to_checksum;

use crate::abi::{append_state_batch, APPEND_STATE_BATCH};
use crate::signing::decode_signed_tx_and_recover;
use crate::types::{AppendStateBatchOut, DecodedTxOut};
use crate::util::bytes_to_0x;

fn as_fixed_bytes_hex(tok: &Token) -> Result<String> {
    match tok {
        Token::FixedBytes(b) if b.len() == 32 => Ok(bytes_to_0x(b)),
        _ => Err(anyhow!("expected bytes32")),
    }
}

fn as_uint(tok: &Token) -> Result<U256> {
    match tok {
        Token::Uint(u) => Ok(*u),
        _ => Err(anyhow!("expected uint")),
    }
}

/// Decode `appendStateBatch` calldata. `Ok(None)` when the selector is some other method.
pub fn decode_append_state_batch(abi: &Abi, data: &[u8]) -> Result<Option<AppendStateBatchOut>> {
    let func = append_state_batch(abi)?;
    if data.len() < 4 || data[..4] != func.short_signature() {
        return Ok(None);
    }
    let tokens = func.decode_input(&data[4..])?;
    let (batch, start) = match tokens.as_slice() {
        [Token::Array(items), start] => (items, start),
        _ => return Err(anyhow!("unexpected arguments for {APPEND_STATE_BATCH}")),
    };

    Ok(Some(AppendStateBatchOut {
        func_name: APPEND_STATE_BATCH.to_string(),
        should_start_at_element: as_uint(start)?.to_string(),
        batch: batch.iter().map(as_fixed_bytes_hex).collect::<Result<_>>()?,
    }))
}

/// Full human-readable view of a raw signed transaction.
pub fn build_decoded(abi: &Abi, raw_hex: &str) -> Result<DecodedTxOut> {
    let tx = decode_signed_tx_and_recover(raw_hex)?;
    let decoded_data = decode_append_state_batch(abi, &tx.data)?;

    Ok(DecodedTxOut {
        transaction_hash: format!("{:#x}", tx.hash),
        from: to_checksum(&tx.from, None),
        to: to_checksum(&tx.to, None),
        value: tx.value.to_string(),
        gas_limit: tx.gas.to_string(),
        gas_price: tx.gas_price.to_string(),
        nonce: tx.nonce.to_string(),
        chain_id: tx.chain_id,
        encoded_data: bytes_to_0x(&tx.data),
        decoded_data,
    })
}
