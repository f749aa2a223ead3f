//! Exact conversions between integer base units and decimal strings.

use anyhow::Context;

/// Decimals of the native asset (wei per ETH = 10^18).
pub const ETH_DECIMALS: u32 = 18;

/// Render an integer amount with `decimals` implied places, trimming trailing
/// zeros: `1500000000000000000` with 18 decimals becomes `"1.5"`.
#[must_use]
pub fn format_units(amount: u128, decimals: u32) -> String {
    let digits = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{digits}", "0".repeat(decimals - digits.len() + 1))
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    }
}

/// Parse a base-10 wei string (as returned by indexers) into ETH.
pub fn wei_to_eth(wei: &str) -> anyhow::Result<String> {
    let wei = wei.trim();
    let amount = if wei.is_empty() {
        0
    } else {
        wei.parse::<u128>()
            .with_context(|| format!("Invalid wei amount: {wei}"))?
    };
    Ok(format_units(amount, ETH_DECIMALS))
}

/// Parse a `0x`-prefixed hex quantity (JSON-RPC encoding).
pub fn parse_hex_quantity(hex: &str) -> anyhow::Result<u128> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| anyhow::anyhow!("Hex quantity missing 0x prefix: {hex}"))?;
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).with_context(|| format!("Invalid hex quantity: {hex}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_whole_and_fractional_amounts() {
        assert_eq!(format_units(1_000_000_000_000_000_000, 18), "1");
        assert_eq!(format_units(1_500_000_000_000_000_000, 18), "1.5");
        assert_eq!(format_units(1, 18), "0.000000000000000001");
        assert_eq!(format_units(0, 18), "0");
        assert_eq!(format_units(123_450, 2), "1234.5");
        assert_eq!(format_units(42, 0), "42");
    }

    #[test]
    fn test_converts_wei_strings() {
        assert_eq!(wei_to_eth("25000000000000000000").ok().as_deref(), Some("25"));
        assert_eq!(wei_to_eth("").ok().as_deref(), Some("0"));
        assert!(wei_to_eth("-1").is_err());
    }

    #[test]
    fn test_parses_hex_quantities() {
        assert_eq!(parse_hex_quantity("0xde0b6b3a7640000").ok(), Some(1_000_000_000_000_000_000));
        assert_eq!(parse_hex_quantity("0x").ok(), Some(0));
        assert!(parse_hex_quantity("1234").is_err());
        assert!(parse_hex_quantity("0xzz").is_err());
    }
}
