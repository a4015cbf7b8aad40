// src/util.rs
use anyhow::Result;
use ethers_core::types::{Address, U256};

/// Parse an untrusted decimal or `0x`-prefixed hex string into a U256.
///
/// Returns `None` for an empty string, a sign, whitespace, any non-digit
/// character, or a value that does not fit in 256 bits. Never returns a
/// zero stand-in for bad input.
pub fn valid_number(s: &str) -> Option<U256> {
    if let Some(x) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if x.is_empty() || !x.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        U256::from_str_radix(strip_leading_zeros(x), 16).ok()
    } else {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        U256::from_dec_str(strip_leading_zeros(s)).ok()
    }
}

// keeps one digit so "000" still parses as zero
fn strip_leading_zeros(digits: &str) -> &str {
    let t = digits.trim_start_matches('0');
    if t.is_empty() {
        &digits[digits.len() - 1..]
    } else {
        t
    }
}

/// `valid_number` narrowed to a u64, for fields Ethereum caps at 64 bits.
pub fn valid_u64(s: &str) -> Option<u64> {
    let v = valid_number(s)?;
    if v > U256::from(u64::MAX) {
        return None;
    }
    Some(v.as_u64())
}

/// Strict 20-byte hex address (with or without `0x`).
pub fn parse_addr(s: &str) -> Option<Address> {
    let t = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    if t.len() != 40 {
        return None;
    }
    let bytes = hex::decode(t).ok()?;
    Some(Address::from_slice(&bytes))
}

pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>> {
    let t = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(t)?)
}

pub fn bytes_to_0x(v: &[u8]) -> String {
    format!("0x{}", hex::encode(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_decimal_and_hex() {
        assert_eq!(valid_number("0"), Some(U256::zero()));
        assert_eq!(valid_number("1000000000"), Some(U256::from(1_000_000_000u64)));
        assert_eq!(valid_number("0x10"), Some(U256::from(16u64)));
        assert_eq!(valid_number("0XfF"), Some(U256::from(255u64)));
        assert_eq!(valid_number("007"), Some(U256::from(7u64)));
    }

    #[test]
    fn rejects_malformed_without_zero_fallback() {
        for bad in ["", "0x", "-5", "+5", "abc", "12a", " 1", "1 ", "1.5", "0xzz", "1e9"] {
            assert_eq!(valid_number(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn bounds_at_256_bits() {
        let max = format!("{}", U256::MAX);
        assert_eq!(valid_number(&max), Some(U256::MAX));
        // 2^256
        let over = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert_eq!(valid_number(over), None);
        assert_eq!(valid_number(&format!("0x1{}", "0".repeat(64))), None);
    }

    #[test]
    fn leading_zeros_do_not_count_toward_width() {
        let hex_one = format!("0x{}1", "0".repeat(64));
        assert_eq!(valid_number(&hex_one), Some(U256::one()));
        let dec_one = format!("{}1", "0".repeat(100));
        assert_eq!(valid_number(&dec_one), Some(U256::one()));
        assert_eq!(valid_number(&format!("0x{}", "0".repeat(80))), Some(U256::zero()));
        assert_eq!(valid_number(&format!("0x{}{}", "0".repeat(10), "f".repeat(65))), None);
    }

    #[test]
    fn reserialized_values_parse_back_identically() {
        let samples = ["0", "1", "255", "0xdeadbeef", "18446744073709551616", "0x0001"];
        for s in samples {
            let v = valid_number(s).unwrap();
            assert_eq!(valid_number(&v.to_string()), Some(v));
            assert_eq!(valid_number(&format!("{v:#x}")), Some(v));
        }
    }

    #[test]
    fn u64_narrowing() {
        assert_eq!(valid_u64("18446744073709551615"), Some(u64::MAX));
        assert_eq!(valid_u64("18446744073709551616"), None);
        assert_eq!(valid_u64("x"), None);
    }

    #[test]
    fn addresses_must_be_twenty_bytes() {
        assert!(parse_addr("0x5FbDB2315678afecb367f032d93F642f64180aa3").is_some());
        assert!(parse_addr("5FbDB2315678afecb367f032d93F642f64180aa3").is_some());
        assert!(parse_addr("0x5FbDB2315678afecb367f032d93F642f64180a").is_none());
        assert!(parse_addr("0xZZbDB2315678afecb367f032d93F642f64180aa3").is_none());
        assert!(parse_addr("").is_none());
    }
}
