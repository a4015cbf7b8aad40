//! Central place for all default values.
//! Update these and the whole tool picks them up.

pub struct Defaults;

impl Defaults {
    /* Chain */
    pub const CHAIN_ID: &'static str = "31337";

    /* Gas */
    pub const GAS_LIMIT: u64 = 8_000_000;
    pub const MAX_GAS_LIMIT: u64 = 30_000_000; // mainnet block gas limit

    /* Transaction size bound enforced by node mempools */
    pub const MAX_TX_SIZE: usize = 4 * 32 * 1024;

    /* Request */
    pub const TIMEOUT_SECS: u64 = 30;
    pub const KEYSTORE_PATH: &'static str = "./keystore.json";
}
