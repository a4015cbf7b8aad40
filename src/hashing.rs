//! Batch element digests.
//!
//! Each element arrives base64-encoded and is committed on chain as the
//! legacy Keccak-256 of its raw bytes. NIST SHA3-256 produces different
//! output and must not be substituted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{Result, SignerError};

pub const DIGEST_LEN: usize = 32;

pub type Digest = [u8; DIGEST_LEN];

/// Legacy (pre-NIST) Keccak-256.
pub fn keccak256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = vec![0u8; DIGEST_LEN];
    hasher.finalize(&mut out);
    out
}

/// Decode and hash every element, keeping input order and length.
pub fn hash_batch(batch: &[String]) -> Result<Vec<Digest>> {
    hash_batch_with(batch, keccak256)
}

pub(crate) fn hash_batch_with<F>(batch: &[String], hash: F) -> Result<Vec<Digest>>
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    // decode everything first so a bad element anywhere hashes nothing
    let raw = batch
        .iter()
        .map(|s| {
            STANDARD
                .decode(s)
                .map_err(|_| SignerError::validation("invalid batch element - not base64"))
        })
        .collect::<Result<Vec<_>>>()?;

    raw.iter()
        .map(|element| {
            let buf = hash(element);
            let digest: Digest = buf
                .as_slice()
                .try_into()
                .map_err(|_| SignerError::validation("invalid batch element - not the right size"))?;
            Ok(digest)
        })
        .collect()
}
