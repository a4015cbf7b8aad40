//! Key storage collaborator.
//!
//! The signer never persists wallets; it reads them through `KeyStore` for
//! the duration of one request. Backends are swappable behind the trait.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ethers_core::types::Address;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Result, SignerError};
use crate::util::parse_addr;

/// A wallet: one mnemonic and the accounts already derived from it.
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    pub name: String,
    pub mnemonic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

impl Drop for WalletRecord {
    fn drop(&mut self) {
        self.mnemonic.zeroize();
        self.passphrase.zeroize();
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("name", &self.name)
            .field("mnemonic", &"<redacted>")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("accounts", &self.accounts)
            .finish()
    }
}

impl WalletRecord {
    /// Account entry whose stored address equals `address`.
    /// Entries with an unparseable address never match.
    pub fn account(&self, address: &Address) -> Option<&AccountRecord> {
        self.accounts
            .iter()
            .find(|a| parse_addr(&a.address).as_ref() == Some(address))
    }
}

/// BIP-44 account index plus the address it is expected to derive to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub index: u32,
    pub address: String,
}

#[async_trait::async_trait]
pub trait KeyStore: Send + Sync {
    /// `Ok(None)` when no wallet has that name.
    async fn read_wallet(&self, name: &str) -> Result<Option<WalletRecord>>;

    /// `Ok(None)` when the wallet is missing or holds no such account.
    async fn read_account(&self, name: &str, address: &Address) -> Result<Option<AccountRecord>>;
}

/// In-process store.
#[derive(Default)]
pub struct MemoryKeyStore {
    wallets: HashMap<String, WalletRecord>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, wallet: WalletRecord) {
        self.wallets.insert(wallet.name.clone(), wallet);
    }

    pub fn with_wallet(mut self, wallet: WalletRecord) -> Self {
        self.insert(wallet);
        self
    }
}

#[async_trait::async_trait]
impl KeyStore for MemoryKeyStore {
    async fn read_wallet(&self, name: &str) -> Result<Option<WalletRecord>> {
        Ok(self.wallets.get(name).cloned())
    }

    async fn read_account(&self, name: &str, address: &Address) -> Result<Option<AccountRecord>> {
        Ok(self
            .wallets
            .get(name)
            .and_then(|w| w.account(address))
            .cloned())
    }
}

#[derive(Default, Serialize, Deserialize)]
pub struct KeyStoreFile {
    #[serde(default)]
    pub wallets: Vec<WalletRecord>,
}

/// JSON file store, `{ "wallets": [ ... ] }`.
/// Re-read on every lookup so nothing outlives the request.
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<KeyStoreFile> {
        let text = read_secret_text(&self.path).await?;
        serde_json::from_str(&text).map_err(|e| {
            SignerError::collaborator(format!("parsing key store {}: {e}", self.path.display()))
        })
    }

    async fn find(&self, name: &str) -> Result<Option<WalletRecord>> {
        let mut file = self.load().await?;
        Ok(file
            .wallets
            .iter()
            .position(|w| w.name == name)
            .map(|i| file.wallets.swap_remove(i)))
    }
}

/// Raw key store contents; wiped when dropped since it holds every mnemonic.
async fn read_secret_text(path: &Path) -> Result<Zeroizing<String>> {
    tokio::fs::read_to_string(path)
        .await
        .map(Zeroizing::new)
        .map_err(|e| SignerError::collaborator(format!("reading key store {}: {e}", path.display())))
}

#[async_trait::async_trait]
impl KeyStore for FileKeyStore {
    async fn read_wallet(&self, name: &str) -> Result<Option<WalletRecord>> {
        self.find(name).await
    }

    async fn read_account(&self, name: &str, address: &Address) -> Result<Option<AccountRecord>> {
        Ok(self
            .find(name)
            .await?
            .and_then(|w| w.account(address).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PHRASE: &str = "test test test test test test test test test test test junk";
    const ADDR0: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn wallet() -> WalletRecord {
        WalletRecord {
            name: "sequencer".into(),
            mnemonic: PHRASE.into(),
            passphrase: None,
            accounts: vec![AccountRecord { index: 0, address: ADDR0.into() }],
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut w = wallet();
        w.passphrase = Some("hunter2".into());
        let shown = format!("{w:?}");
        assert!(!shown.contains("junk"));
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("sequencer"));
    }

    #[test]
    fn account_lookup_ignores_case() {
        let w = wallet();
        let lower = parse_addr(&ADDR0.to_ascii_lowercase()).unwrap();
        assert_eq!(w.account(&lower).map(|a| a.index), Some(0));
        let other = parse_addr("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        assert!(w.account(&other).is_none());
    }

    #[tokio::test]
    async fn memory_store_lookups() {
        let store = MemoryKeyStore::new().with_wallet(wallet());
        let addr = parse_addr(ADDR0).unwrap();

        assert!(store.read_wallet("sequencer").await.unwrap().is_some());
        assert!(store.read_wallet("nobody").await.unwrap().is_none());
        assert!(store.read_account("sequencer", &addr).await.unwrap().is_some());
        assert!(store.read_account("nobody", &addr).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");
        let body = KeyStoreFile { wallets: vec![wallet()] };
        std::fs::File::create(&path)
            .unwrap()
            .write_all(serde_json::to_string(&body).unwrap().as_bytes())
            .unwrap();

        let store = FileKeyStore::new(&path);
        let addr = parse_addr(ADDR0).unwrap();
        let w = store.read_wallet("sequencer").await.unwrap().unwrap();
        assert_eq!(w.mnemonic, PHRASE);
        assert_eq!(
            store.read_account("sequencer", &addr).await.unwrap(),
            Some(AccountRecord { index: 0, address: ADDR0.into() })
        );
        assert!(store.read_wallet("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn raw_file_text_is_wipeable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keystore.json");
        std::fs::write(&path, PHRASE).unwrap();

        let mut text = read_secret_text(&path).await.unwrap();
        assert_eq!(text.as_str(), PHRASE);
        text.zeroize();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn file_store_backend_failures_are_collaborator_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileKeyStore::new(dir.path().join("absent.json"));
        assert_eq!(missing.read_wallet("x").await.unwrap_err().kind(), "collaborator");

        let garbled = dir.path().join("garbled.json");
        std::fs::write(&garbled, "{ not json").unwrap();
        let store = FileKeyStore::new(&garbled);
        assert_eq!(store.read_wallet("x").await.unwrap_err().kind(), "collaborator");
    }
}
