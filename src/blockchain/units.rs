//! Unit conversion and syntactic checks.
//!
//! All token amounts are carried as `U256` base units. Human-readable strings
//! are produced by integer division and remainder, so values above 2^53 keep
//! every digit.

use alloy::primitives::U256;
use serde_json::Value;

use crate::blockchain::types::{ConnectorError, ConnectorResult};

/// Decimals of the native token (wei per ETH = 10^18).
pub const ETH_DECIMALS: usize = 18;

/// Decimals of gwei (wei per gwei = 10^9).
pub const GWEI_DECIMALS: usize = 9;

/// Parse a base-unit amount from a decimal or `0x` hex string.
pub fn parse_wei(value: &str) -> ConnectorResult<U256> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16),
        Some(_) => return Err(ConnectorError::validation(format!("invalid amount '{}'", value))),
        None => {
            if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConnectorError::validation(format!("invalid amount '{}'", value)));
            }
            U256::from_str_radix(trimmed, 10)
        }
    };
    parsed.map_err(|e| ConnectorError::validation(format!("invalid amount '{}': {}", value, e)))
}

/// Exact fixed-point rendering with exactly `decimals` fraction digits.
pub fn format_units(amount: U256, decimals: usize) -> String {
    let unit = U256::from(10u64).pow(U256::from(decimals as u64));
    let whole = amount / unit;
    let frac = amount % unit;
    if decimals == 0 {
        return whole.to_string();
    }
    format!("{}.{:0>width$}", whole, frac.to_string(), width = decimals)
}

/// Convert a wei string to an ETH string with 18 fraction digits.
pub fn wei_to_eth(value: &str) -> ConnectorResult<String> {
    Ok(format_units(parse_wei(value)?, ETH_DECIMALS))
}

pub fn wei_to_gwei(amount: U256) -> String {
    format_units(amount, GWEI_DECIMALS)
}

/// Convert a decimal ETH string to wei. Fraction digits past 18 are truncated.
pub fn eth_to_wei(value: &str) -> ConnectorResult<U256> {
    parse_units(value, ETH_DECIMALS)
}

fn parse_units(value: &str, decimals: usize) -> ConnectorResult<U256> {
    let invalid = || ConnectorError::validation(format!("invalid decimal amount '{}'", value));
    let trimmed = value.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    let kept = &frac[..frac.len().min(decimals)];
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(decimals - kept.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| invalid())
}

/// `0x` followed by exactly 40 hex digits. No checksum verification.
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Translate a user-supplied block number into the RPC block parameter.
pub fn block_tag(block: &str) -> ConnectorResult<String> {
    let block = block.trim();
    if block == "latest" {
        return Ok(block.to_string());
    }
    let number = match block.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => block.parse::<u64>(),
    }
    .map_err(|_| ConnectorError::validation(format!("invalid block number '{}'", block)))?;
    Ok(format!("{:#x}", number))
}

/// Decode an RPC hex quantity such as `"0x1bc16d674ec80000"`.
pub fn parse_quantity(value: &Value) -> ConnectorResult<U256> {
    let raw = value
        .as_str()
        .ok_or_else(|| ConnectorError::upstream(format!("expected hex quantity, got {}", value)))?;
    let hex = raw
        .strip_prefix("0x")
        .ok_or_else(|| ConnectorError::upstream(format!("expected hex quantity, got '{}'", raw)))?;
    if hex.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(hex, 16)
        .map_err(|e| ConnectorError::upstream(format!("invalid hex quantity '{}': {}", raw, e)))
}

pub fn parse_block_number(value: &Value) -> ConnectorResult<u64> {
    let quantity = parse_quantity(value)?;
    u64::try_from(quantity)
        .map_err(|_| ConnectorError::upstream(format!("block number out of range: {}", quantity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wei_to_eth_exact() {
        assert_eq!(wei_to_eth("1000000000000000000").unwrap(), "1.000000000000000000");
        assert_eq!(wei_to_eth("1500000000000000000").unwrap(), "1.500000000000000000");
        assert_eq!(wei_to_eth("1").unwrap(), "0.000000000000000001");
        assert_eq!(wei_to_eth("0").unwrap(), "0.000000000000000000");
        assert_eq!(wei_to_eth("0xde0b6b3a7640000").unwrap(), "1.000000000000000000");
    }

    #[test]
    fn test_large_values_keep_precision() {
        // 1000 ETH and a value well past 2^53
        assert_eq!(
            wei_to_eth("1000000000000000000000").unwrap(),
            "1000.000000000000000000"
        );
        assert_eq!(
            wei_to_eth("123456789012345678901234567").unwrap(),
            "123456789.012345678901234567"
        );
    }

    #[test]
    fn test_eth_to_wei() {
        assert_eq!(eth_to_wei("1").unwrap(), U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(eth_to_wei("1.5").unwrap(), U256::from(1_500_000_000_000_000_000u64));
        assert_eq!(eth_to_wei("0.000000000000000001").unwrap(), U256::from(1u64));
        assert_eq!(eth_to_wei(".5").unwrap(), U256::from(500_000_000_000_000_000u64));
        // truncated past 18 digits
        assert_eq!(eth_to_wei("0.0000000000000000019").unwrap(), U256::from(1u64));
        assert_eq!(eth_to_wei("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_eth_to_wei_rejects_garbage() {
        for bad in ["", ".", "-1", "1e18", "abc", "1.2.3"] {
            assert!(eth_to_wei(bad).is_err(), "expected '{}' to be rejected", bad);
        }
    }

    #[test]
    fn test_round_trip() {
        for wei in [
            "0",
            "1",
            "999999999999999999",
            "1000000000000000000000",
            "42424242424242424242",
        ] {
            let eth = wei_to_eth(wei).unwrap();
            assert_eq!(eth_to_wei(&eth).unwrap().to_string(), wei);
        }
    }

    #[test]
    fn test_parse_wei_rejects_garbage() {
        assert!(parse_wei("").is_err());
        assert!(parse_wei("0x").is_err());
        assert!(parse_wei("1.5").is_err());
        assert!(parse_wei("-5").is_err());
        // 2^256 overflows
        assert!(parse_wei(
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
        )
        .is_err());
    }

    #[test]
    fn test_gwei() {
        assert_eq!(wei_to_gwei(U256::from(1_000_000_000u64)), "1.000000000");
        assert_eq!(wei_to_gwei(U256::from(10_000_000_123u64)), "10.000000123");
    }

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address("0xABCDEF0123456789abcdef0123456789ABCDEF01"));
        // 39 hex digits
        assert!(!is_valid_address("0xABCDEF0123456789abcdef0123456789ABCDEF0"));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address("not-an-address"));
        assert!(!is_valid_address("ABCDEF0123456789abcdef0123456789ABCDEF0012"));
        assert!(!is_valid_address("0xZZCDEF0123456789abcdef0123456789ABCDEF01"));
    }

    #[test]
    fn test_block_tag() {
        assert_eq!(block_tag("255").unwrap(), "0xff");
        assert_eq!(block_tag("latest").unwrap(), "latest");
        assert_eq!(block_tag("0").unwrap(), "0x0");
        assert_eq!(block_tag("0xFF").unwrap(), "0xff");
        assert!(block_tag("pending-ish").is_err());
        assert!(block_tag("-1").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!("0xff")).unwrap(), U256::from(255u64));
        assert_eq!(parse_quantity(&json!("0x")).unwrap(), U256::ZERO);
        assert!(parse_quantity(&json!(255)).is_err());
        assert!(parse_quantity(&json!("255")).is_err());
        assert_eq!(parse_block_number(&json!("0x10")).unwrap(), 16);
    }
}
