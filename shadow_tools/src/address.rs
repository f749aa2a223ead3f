//! Address argument handling shared by the tools.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::ToolResult;

#[allow(clippy::expect_used)]
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("address pattern is valid"));

/// JSON schema fragment for an address parameter.
#[must_use]
pub fn address_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "string",
        "description": description,
        "pattern": ADDRESS_RE.as_str(),
    })
}

#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// Read and normalize the `address` argument.
///
/// Returns the lowercased address, or an error result for the caller.
pub fn address_arg(input: &serde_json::Value) -> Result<String, ToolResult> {
    let Some(address) = input.get("address").and_then(|v| v.as_str()) else {
        return Err(
            ToolResult::error("Error: address must be a string").with_error_type("invalid_argument")
        );
    };
    let address = address.trim();
    if !is_valid_address(address) {
        return Err(
            ToolResult::error(format!("Error: invalid Ethereum address: {address}"))
                .with_error_type("invalid_argument"),
        );
    }
    Ok(address.to_lowercase())
}
