use anyhow::Result;
use ethers_core::abi::{Abi, Function, Token};
use ethers_core::types::{
    transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, U256,
};

use crate::abi::append_state_batch;
use crate::hashing::Digest;

/// Gas, nonce and chain binding, all supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxParams {
    pub gas_price: U256,
    pub gas_limit: u64,
    pub nonce: u64,
    pub chain_id: u64,
}

/// Contract call ready for signing. Built fresh for every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub to: Address,
    pub data: Bytes,
    pub params: TxParams,
}

impl UnsignedTransaction {
    /// Legacy (type 0) transaction; the chain id gives it EIP-155 replay protection.
    pub fn to_typed(&self, from: Address) -> TypedTransaction {
        let req = TransactionRequest::new()
            .from(from)
            .to(self.to)
            .value(U256::zero())
            .data(self.data.clone())
            .gas(self.params.gas_limit)
            .gas_price(self.params.gas_price)
            .nonce(self.params.nonce)
            .chain_id(self.params.chain_id);
        TypedTransaction::Legacy(req)
    }
}

pub fn t_digests(digests: &[Digest]) -> Token {
    Token::Array(digests.iter().map(|d| Token::FixedBytes(d.to_vec())).collect())
}

pub fn t_uint(v: U256) -> Token {
    Token::Uint(v)
}

pub fn encode_calldata(func: &Function, args: Vec<Token>) -> Result<Vec<u8>> {
    Ok(func.encode_input(&args)?)
}

/// `appendStateBatch(bytes32[] _batch, uint256 _shouldStartAtElement)` calldata.
pub fn append_state_batch_calldata(abi: &Abi, digests: &[Digest], start_index: U256) -> Result<Vec<u8>> {
    let func = append_state_batch(abi)?;
    encode_calldata(func, vec![t_digests(digests), t_uint(start_index)])
}

pub fn build_append_state_batch(
    abi: &Abi,
    contract: Address,
    digests: &[Digest],
    start_index: U256,
    params: TxParams,
) -> Result<UnsignedTransaction> {
    let data = append_state_batch_calldata(abi, digests, start_index)?;
    Ok(UnsignedTransaction { to: contract, data: data.into(), params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::load_abi;
    use crate::hashing::keccak256;
    use crate::util::parse_addr;

    fn digest(seed: &[u8]) -> Digest {
        keccak256(seed).try_into().unwrap()
    }

    fn params() -> TxParams {
        TxParams { gas_price: U256::from(1_000_000_000u64), gas_limit: 8_000_000, nonce: 3, chain_id: 10 }
    }

    #[test]
    fn calldata_layout() {
        let abi = load_abi().unwrap();
        let d = [digest(b"a"), digest(b"b")];
        let data = append_state_batch_calldata(&abi, &d, U256::from(42u64)).unwrap();

        assert_eq!(&data[..4], &keccak256(b"appendStateBatch(bytes32[],uint256)")[..4]);
        let body = &data[4..];
        // head: offset to the dynamic array, then the start index
        assert_eq!(U256::from_big_endian(&body[0..32]), U256::from(64u64));
        assert_eq!(U256::from_big_endian(&body[32..64]), U256::from(42u64));
        // tail: length, then elements in order
        assert_eq!(U256::from_big_endian(&body[64..96]), U256::from(2u64));
        assert_eq!(&body[96..128], &d[0]);
        assert_eq!(&body[128..160], &d[1]);
        assert_eq!(body.len(), 160);
    }

    #[test]
    fn build_is_deterministic() {
        let abi = load_abi().unwrap();
        let to = parse_addr("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        let d = [digest(b"root")];
        let a = build_append_state_batch(&abi, to, &d, U256::zero(), params()).unwrap();
        let b = build_append_state_batch(&abi, to, &d, U256::zero(), params()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to, to);
    }

    #[test]
    fn typed_legacy_carries_caller_values() {
        let abi = load_abi().unwrap();
        let to = parse_addr("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        let from = parse_addr("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let tx = build_append_state_batch(&abi, to, &[digest(b"x")], U256::one(), params()).unwrap();
        let typed = tx.to_typed(from);

        assert!(matches!(typed, TypedTransaction::Legacy(_)));
        assert_eq!(typed.nonce(), Some(&U256::from(3u64)));
        assert_eq!(typed.gas(), Some(&U256::from(8_000_000u64)));
        assert_eq!(typed.gas_price(), Some(U256::from(1_000_000_000u64)));
        assert_eq!(typed.chain_id().map(|c| c.as_u64()), Some(10));
        assert_eq!(typed.to_addr(), Some(&to));
    }
}
