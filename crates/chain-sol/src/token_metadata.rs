//! Token metadata interface, stored inside the Token-2022 mint itself.
//!
//! The `Initialize` instruction appends a variable-length TLV entry to the
//! mint account. The mint must already hold enough lamports to stay
//! rent-exempt at its new size, so callers fund it before initializing.

use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;
use crate::token_2022::{TLV_HEADER_SIZE, TOKEN_2022_PROGRAM_ID};
use crate::transaction::{AccountMeta, Instruction};

/// Width the on-chain symbol is padded to.
pub const SYMBOL_PADDED_LEN: usize = 6;

/// Bytes of a metadata entry that do not depend on its text fields:
/// TLV header, update authority, mint, and four u32 length prefixes
/// (name, symbol, uri, additional metadata).
pub const METADATA_FIXED_OVERHEAD: usize = TLV_HEADER_SIZE + 32 + 32 + 4 * 4;

/// Slack added to the size estimate so a rent rate change or a longer
/// normalized field does not leave the account short.
pub const METADATA_SAFETY_MARGIN: usize = 64;

const INITIALIZE_PREIMAGE: &str = "spl_token_metadata_interface:initialize_account";

/// The 8-byte discriminator of the interface's `Initialize` instruction.
pub fn initialize_discriminator() -> [u8; 8] {
    let hash = Sha256::digest(INITIALIZE_PREIMAGE.as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

/// Right-pad `symbol` with spaces to exactly six characters.
///
/// Longer inputs are truncated so the result is always six characters.
pub fn pad_symbol(symbol: &str) -> String {
    let mut padded: String = symbol.chars().take(SYMBOL_PADDED_LEN).collect();
    let width = padded.chars().count();
    padded.extend(std::iter::repeat(' ').take(SYMBOL_PADDED_LEN - width));
    padded
}

/// Estimated on-chain size of a metadata entry with these fields.
pub fn estimate_metadata_len(name: &str, symbol: &str, uri: &str) -> usize {
    METADATA_FIXED_OVERHEAD + name.len() + symbol.len() + uri.len() + METADATA_SAFETY_MARGIN
}

/// Build the `Initialize` instruction writing name, symbol and uri into the
/// mint's metadata entry.
///
/// Accounts: metadata (the mint itself), update authority, mint, and the mint
/// authority, which must sign.
pub fn initialize(
    mint: &Pubkey,
    update_authority: &Pubkey,
    mint_authority: &Pubkey,
    name: &str,
    symbol: &str,
    uri: &str,
) -> Result<Instruction, SolError> {
    if name.is_empty() {
        return Err(SolError::InstructionBuildError("metadata name is empty".into()));
    }

    let mut data = Vec::with_capacity(8 + 12 + name.len() + symbol.len() + uri.len());
    data.extend_from_slice(&initialize_discriminator());
    for field in [name, symbol, uri] {
        let len = u32::try_from(field.len()).map_err(|_| {
            SolError::InstructionBuildError("metadata field too long".into())
        })?;
        data.extend_from_slice(&len.to_le_bytes());
        data.extend_from_slice(field.as_bytes());
    }

    Ok(Instruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(*update_authority, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(*mint_authority, true),
        ],
        data,
    })
}
