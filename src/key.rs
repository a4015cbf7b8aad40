use ethers_core::types::{Address, PathOrString};
use ethers_signers::coins_bip39::English;
use ethers_signers::{LocalWallet, MnemonicBuilder, Signer, WalletError};

use crate::error::{Result, SignerError};
use crate::keystore::{KeyStore, WalletRecord};

/// Signing key for one account, borrowed from the key store for a single request.
/// The wrapped secp256k1 key is wiped when this is dropped.
#[derive(Debug)]
pub struct ResolvedAccount {
    pub wallet: LocalWallet,
    pub index: u32,
}

impl ResolvedAccount {
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

/// Look up `wallet_name`, find `account` inside it, and derive its key.
///
/// Every miss is `NotFound`, including a stored account whose index does
/// not derive to its stored address. Backend failures pass through as-is.
pub async fn resolve(store: &dyn KeyStore, wallet_name: &str, account: &Address) -> Result<ResolvedAccount> {
    let wallet = store
        .read_wallet(wallet_name)
        .await?
        .ok_or_else(|| SignerError::not_found(format!("wallet '{wallet_name}' not found")))?;

    let record = store
        .read_account(wallet_name, account)
        .await?
        .ok_or_else(|| SignerError::not_found("error reading address"))?;

    // the account must already be part of the wallet's own account set
    if wallet.account(account) != Some(&record) {
        return Err(SignerError::not_found("error reading address"));
    }

    let signer = derive(&wallet, record.index)?;
    if signer.address() != *account {
        return Err(SignerError::not_found("account record does not match wallet key"));
    }

    Ok(ResolvedAccount { wallet: signer, index: record.index })
}

/// BIP-44 Ethereum key at `m/44'/60'/0'/0/{index}`.
fn derive(wallet: &WalletRecord, index: u32) -> Result<LocalWallet> {
    let malformed = |_: WalletError| SignerError::not_found("wallet record is malformed");

    // always a phrase, never a path to read one from
    let phrase = PathOrString::String(wallet.mnemonic.clone());
    let mut builder = MnemonicBuilder::<English>::default().phrase(phrase);
    if let Some(pass) = wallet.passphrase.as_deref() {
        builder = builder.password(pass);
    }
    builder.index(index).map_err(malformed)?.build().map_err(malformed)
}
