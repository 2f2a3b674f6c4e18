//! Address parsing and display helpers.

use std::str::FromStr;

pub use solana_pubkey::Pubkey;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Parse user-entered address text. Surrounding whitespace is ignored.
pub fn parse_address(text: &str) -> BlockchainResult<Pubkey> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BlockchainError::InvalidAddress(String::new()));
    }
    Pubkey::from_str(trimmed).map_err(|_| BlockchainError::InvalidAddress(trimmed.to_string()))
}

/// Shorten an address to `edge` leading and trailing characters, e.g.
/// `FKjSjCqB...zBeC42bH`.
pub fn abbreviate(address: &Pubkey, edge: usize) -> String {
    let text = address.to_string();
    if text.len() <= edge * 2 {
        return text;
    }
    // base58 is ASCII so byte slicing is safe
    format!("{}...{}", &text[..edge], &text[text.len() - edge..])
}
