use crate::defaults::Defaults;

/// Settings that apply to one signing request.
///
/// `chain_id` is kept as the raw configured string and goes through the
/// same numeric validation as request fields every time it is used.
#[derive(Clone, Debug)]
pub struct SignerConfig {
    pub chain_id: String,
    pub default_gas_limit: u64,
    pub max_gas_limit: u64,
    pub max_tx_size: usize,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            chain_id: Defaults::CHAIN_ID.to_string(),
            default_gas_limit: Defaults::GAS_LIMIT,
            max_gas_limit: Defaults::MAX_GAS_LIMIT,
            max_tx_size: Defaults::MAX_TX_SIZE,
        }
    }
}

impl SignerConfig {
    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    /// Bounds the signer checks before releasing a signed transaction.
    pub fn limits(&self) -> SigningLimits {
        SigningLimits {
            max_gas_limit: self.max_gas_limit,
            max_tx_size: self.max_tx_size,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SigningLimits {
    pub max_gas_limit: u64,
    pub max_tx_size: usize,
}
