use anyhow::{anyhow, Result};
use ethers_core::types::{Address, Bytes, Signature, H256, U256};
use ethers_core::utils::{keccak256, rlp};
use ethers_signers::{LocalWallet, Signer};

use crate::config::SigningLimits;
use crate::encoding::UnsignedTransaction;
use crate::error::SignerError;
use crate::util::hex_to_bytes;

/// A signed transaction in its final wire form.
/// `hash` is taken over `raw`, never over the unsigned payload.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    raw: Bytes,
    hash: H256,
    from: Address,
    signature: Signature,
    tx: UnsignedTransaction,
}

impl SignedTransaction {
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    pub fn hash(&self) -> H256 {
        self.hash
    }

    pub fn from(&self) -> Address {
        self.from
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn transaction(&self) -> &UnsignedTransaction {
        &self.tx
    }
}

/// Sign once with RFC 6979 deterministic ECDSA.
/// Identical (transaction, key) input gives an identical signature.
pub async fn sign_legacy(
    wallet: &LocalWallet,
    tx: &UnsignedTransaction,
    limits: &SigningLimits,
) -> Result<SignedTransaction, SignerError> {
    let gas = tx.params.gas_limit;
    if gas == 0 || gas > limits.max_gas_limit {
        return Err(SignerError::signing(format!(
            "gas limit {gas} outside 1..={}",
            limits.max_gas_limit
        )));
    }

    let wallet = wallet.clone().with_chain_id(tx.params.chain_id);
    let typed = tx.to_typed(wallet.address());
    let signature = wallet
        .sign_transaction(&typed)
        .await
        .map_err(|e| SignerError::signing(e.to_string()))?;

    let raw = typed.rlp_signed(&signature);
    if raw.len() > limits.max_tx_size {
        return Err(SignerError::signing(format!(
            "signed transaction is {} bytes, limit is {}",
            raw.len(),
            limits.max_tx_size
        )));
    }

    Ok(SignedTransaction {
        hash: H256::from(keccak256(&raw)),
        raw,
        from: wallet.address(),
        signature,
        tx: tx.clone(),
    })
}

/// Fields of a raw signed legacy transaction plus the recovered sender.
#[derive(Clone, Debug)]
pub struct DecodedSignedTx {
    pub chain_id: u64,
    pub nonce: U256,
    pub gas_price: U256,
    pub gas: U256,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub from: Address,
    pub hash: H256,
}

/// Decode a raw signed EIP-155 legacy tx and recover sender
pub fn decode_signed_tx_and_recover(raw_hex: &str) -> Result<DecodedSignedTx> {
    let raw = hex_to_bytes(raw_hex)?;
    if raw.first().map_or(true, |b| *b < 0xc0) {
        return Err(anyhow!("Not a legacy (RLP list) tx"));
    }
    let r = rlp::Rlp::new(&raw);
    if r.item_count()? != 9 {
        return Err(anyhow!("legacy tx must have 9 fields"));
    }

    // Fields: [nonce, gasPrice, gasLimit, to, value, data, v, r, s]
    let nonce: U256 = r.at(0)?.as_val()?;
    let gas_price: U256 = r.at(1)?.as_val()?;
    let gas: U256 = r.at(2)?.as_val()?;
    let to_bytes: Vec<u8> = r.at(3)?.as_val()?;
    if to_bytes.len() != 20 {
        return Err(anyhow!("contract creation tx has no target"));
    }
    let to = Address::from_slice(&to_bytes);
    let value: U256 = r.at(4)?.as_val()?;
    let data: Vec<u8> = r.at(5)?.as_val()?;
    let v: u64 = r.at(6)?.as_val()?;
    let r_val: U256 = r.at(7)?.as_val()?;
    let s_val: U256 = r.at(8)?.as_val()?;

    // EIP-155: v = recid + 35 + 2 * chainId
    if v < 35 {
        return Err(anyhow!("signature has no EIP-155 chain id (v = {v})"));
    }
    let chain_id = (v - 35) / 2;

    // sighash = keccak256( rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0]) )
    let mut s = rlp::RlpStream::new_list(9);
    s.append(&nonce);
    s.append(&gas_price);
    s.append(&gas);
    s.append(&to);
    s.append(&value);
    s.append(&data);
    s.append(&U256::from(chain_id));
    s.append(&U256::zero());
    s.append(&U256::zero());

    let sighash = H256::from(keccak256(s.out()));
    let sig = Signature { r: r_val, s: s_val, v };
    let from = sig.recover(sighash)?;

    Ok(DecodedSignedTx {
        chain_id,
        nonce,
        gas_price,
        gas,
        to,
        value,
        data,
        from,
        hash: H256::from(keccak256(&raw)),
    })
}
