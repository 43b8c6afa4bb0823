//! Token-2022 instructions for mints carrying a metadata-pointer extension.
//!
//! Only the handful of instructions needed to launch a fungible token are
//! implemented, encoded by hand in the program's packed layout.

use crate::address::Pubkey;
use crate::error::SolError;
use crate::transaction::{AccountMeta, Instruction};

/// Token-2022 Program ID: `TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb`
pub const TOKEN_2022_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xee, 0x75, 0x8f, 0xde, 0x18, 0x42, 0x5d, 0xbc, 0xe4, 0x6c, 0xcd,
    0xda, 0xb6, 0x1a, 0xfc, 0x4d, 0x83, 0xb9, 0x0d, 0x27, 0xfe, 0xbd, 0xf9, 0x28, 0xd8, 0xa1,
    0x8b, 0xfc,
]);

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: Pubkey = Pubkey::new([
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
]);

/// Packed size of a base mint.
pub const MINT_SIZE: usize = 82;

/// Extended mints are padded to the size of a token account so the account
/// type byte never collides with base mint data.
const BASE_ACCOUNT_SIZE: usize = 165;
const ACCOUNT_TYPE_SIZE: usize = 1;

/// Extension TLV header: u16 type + u16 length.
pub const TLV_HEADER_SIZE: usize = 4;

/// Metadata pointer payload: authority + metadata address.
const METADATA_POINTER_SIZE: usize = 64;

/// Largest decimal count the launchpad accepts.
pub const MAX_DECIMALS: u8 = 9;

// Instruction tags.
const INITIALIZE_MINT_IX: u8 = 0;
const MINT_TO_IX: u8 = 7;
const METADATA_POINTER_EXTENSION_IX: u8 = 39;
const METADATA_POINTER_INITIALIZE_IX: u8 = 0;

/// Account size of a mint carrying only the metadata-pointer extension.
///
/// 165 (padded base) + 1 (account type) + 4 (TLV header) + 64 = 234 bytes.
pub const fn mint_len_with_metadata_pointer() -> usize {
    BASE_ACCOUNT_SIZE + ACCOUNT_TYPE_SIZE + TLV_HEADER_SIZE + METADATA_POINTER_SIZE
}

/// Build `MetadataPointerInstruction::Initialize`.
///
/// Must run before `InitializeMint`. `None` is stored as the zero key.
pub fn initialize_metadata_pointer(
    mint: &Pubkey,
    authority: Option<&Pubkey>,
    metadata_address: Option<&Pubkey>,
) -> Instruction {
    let zero = Pubkey::default();
    let mut data = Vec::with_capacity(2 + METADATA_POINTER_SIZE);
    data.push(METADATA_POINTER_EXTENSION_IX);
    data.push(METADATA_POINTER_INITIALIZE_IX);
    data.extend_from_slice(authority.unwrap_or(&zero).as_bytes());
    data.extend_from_slice(metadata_address.unwrap_or(&zero).as_bytes());

    Instruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*mint, false)],
        data,
    }
}

/// Build `InitializeMint` with no freeze authority.
pub fn initialize_mint(
    mint: &Pubkey,
    decimals: u8,
    mint_authority: &Pubkey,
) -> Result<Instruction, SolError> {
    if decimals > MAX_DECIMALS {
        return Err(SolError::InstructionBuildError(format!(
            "decimals must be 0..={MAX_DECIMALS}, got {decimals}"
        )));
    }

    // tag + decimals + authority + COption::None tag = 35 bytes.
    let mut data = Vec::with_capacity(35);
    data.push(INITIALIZE_MINT_IX);
    data.push(decimals);
    data.extend_from_slice(mint_authority.as_bytes());
    data.push(0);

    Ok(Instruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        data,
    })
}

/// Build `MintTo`, crediting `amount` base units to `destination`.
pub fn mint_to(
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, SolError> {
    if amount == 0 {
        return Err(SolError::InstructionBuildError(
            "mint amount must be > 0".into(),
        ));
    }

    let mut data = Vec::with_capacity(9);
    data.push(MINT_TO_IX);
    data.extend_from_slice(&amount.to_le_bytes());

    Ok(Instruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data,
    })
}

/// Convert a whole-token supply into base units: `supply * 10^decimals`.
///
/// Pure integer arithmetic; overflow of `u64` is an error.
pub fn ui_amount_to_base_units(supply: u64, decimals: u8) -> Result<u64, SolError> {
    10u64
        .checked_pow(decimals as u32)
        .and_then(|scale| supply.checked_mul(scale))
        .ok_or_else(|| SolError::AmountOverflow(format!("{supply} * 10^{decimals}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_ids_match_base58() {
        assert_eq!(
            TOKEN_2022_PROGRAM_ID.to_string(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"
        );
        assert_eq!(
            SYSVAR_RENT_ID.to_string(),
            "SysvarRent111111111111111111111111111111111"
        );
    }

    #[test]
    fn mint_len_with_pointer_is_234() {
        assert_eq!(mint_len_with_metadata_pointer(), 234);
    }

    #[test]
    fn metadata_pointer_points_at_mint() {
        let mint = Pubkey::new([1u8; 32]);
        let authority = Pubkey::new([2u8; 32]);

        let ix = initialize_metadata_pointer(&mint, Some(&authority), Some(&mint));
        assert_eq!(ix.data.len(), 66);
        assert_eq!(&ix.data[..2], &[39, 0]);
        assert_eq!(&ix.data[2..34], authority.as_bytes());
        assert_eq!(&ix.data[34..], mint.as_bytes());
        assert_eq!(ix.accounts, vec![AccountMeta::new(mint, false)]);
    }

    #[test]
    fn metadata_pointer_none_is_zero_key() {
        let mint = Pubkey::new([1u8; 32]);
        let ix = initialize_metadata_pointer(&mint, None, Some(&mint));
        assert!(ix.data[2..34].iter().all(|b| *b == 0));
    }

    #[test]
    fn initialize_mint_layout() {
        let mint = Pubkey::new([1u8; 32]);
        let authority = Pubkey::new([2u8; 32]);

        let ix = initialize_mint(&mint, 9, &authority).unwrap();
        assert_eq!(ix.data.len(), 35);
        assert_eq!(ix.data[0], 0);
        assert_eq!(ix.data[1], 9);
        assert_eq!(&ix.data[2..34], authority.as_bytes());
        assert_eq!(ix.data[34], 0, "no freeze authority");
        assert_eq!(ix.accounts[1].pubkey, SYSVAR_RENT_ID);
    }

    #[test]
    fn initialize_mint_rejects_large_decimals() {
        let mint = Pubkey::new([1u8; 32]);
        assert!(initialize_mint(&mint, 10, &mint).is_err());
    }

    #[test]
    fn mint_to_layout() {
        let mint = Pubkey::new([1u8; 32]);
        let dest = Pubkey::new([2u8; 32]);
        let authority = Pubkey::new([3u8; 32]);

        let ix = mint_to(&mint, &dest, &authority, 42).unwrap();
        assert_eq!(ix.data[0], 7);
        assert_eq!(u64::from_le_bytes(ix.data[1..9].try_into().unwrap()), 42);
        assert!(ix.accounts[0].is_writable);
        assert!(ix.accounts[1].is_writable);
        assert!(ix.accounts[2].is_signer);
        assert!(!ix.accounts[2].is_writable);
    }

    #[test]
    fn mint_to_zero_fails() {
        let key = Pubkey::new([1u8; 32]);
        assert!(mint_to(&key, &key, &key, 0).is_err());
    }

    #[test]
    fn base_units_are_exact() {
        assert_eq!(
            ui_amount_to_base_units(1_000_000, 9).unwrap(),
            1_000_000_000_000_000
        );
        assert_eq!(ui_amount_to_base_units(7, 0).unwrap(), 7);
        assert_eq!(ui_amount_to_base_units(123_456_789, 6).unwrap(), 123_456_789_000_000);
    }

    #[test]
    fn base_units_overflow_is_error() {
        assert!(ui_amount_to_base_units(u64::MAX, 1).is_err());
        assert!(ui_amount_to_base_units(20_000_000_000, 9).is_err());
    }
}
