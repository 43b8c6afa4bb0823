//! System Program instructions.

use crate::address::Pubkey;
use crate::error::SolError;
use crate::transaction::{AccountMeta, Instruction};

/// The System Program: 32 zero bytes, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// Lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

// Instruction indices are little-endian u32 tags.
const CREATE_ACCOUNT_IX: u32 = 0;
const TRANSFER_IX: u32 = 2;

/// Build a `CreateAccount` instruction.
///
/// Both `from` (funding) and `new_account` must sign.
pub fn create_account(
    from: &Pubkey,
    new_account: &Pubkey,
    lamports: u64,
    space: u64,
    owner: &Pubkey,
) -> Instruction {
    // u32 tag + u64 lamports + u64 space + 32-byte owner = 52 bytes.
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&CREATE_ACCOUNT_IX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner.as_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*from, true),
            AccountMeta::new(*new_account, true),
        ],
        data,
    }
}

/// Build a `Transfer` instruction moving `lamports` from `from` to `to`.
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<Instruction, SolError> {
    if lamports == 0 {
        return Err(SolError::InstructionBuildError(
            "lamports must be > 0".into(),
        ));
    }

    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&TRANSFER_IX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Ok(Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_account_layout() {
        let from = Pubkey::new([1u8; 32]);
        let new_account = Pubkey::new([2u8; 32]);
        let owner = Pubkey::new([3u8; 32]);

        let ix = create_account(&from, &new_account, 5_000, 234, &owner);
        assert_eq!(ix.data.len(), 52);
        assert_eq!(&ix.data[..4], &0u32.to_le_bytes());
        assert_eq!(u64::from_le_bytes(ix.data[4..12].try_into().unwrap()), 5_000);
        assert_eq!(u64::from_le_bytes(ix.data[12..20].try_into().unwrap()), 234);
        assert_eq!(&ix.data[20..], owner.as_bytes());

        assert!(ix.accounts.iter().all(|m| m.is_signer && m.is_writable));
    }

    #[test]
    fn transfer_layout() {
        let from = Pubkey::new([1u8; 32]);
        let to = Pubkey::new([2u8; 32]);

        let ix = transfer(&from, &to, 1_500_000_000).unwrap();
        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.data.len(), 12);
        assert_eq!(&ix.data[..4], &2u32.to_le_bytes());
        assert_eq!(u64::from_le_bytes(ix.data[4..].try_into().unwrap()), 1_500_000_000);

        assert!(ix.accounts[0].is_signer);
        assert!(!ix.accounts[1].is_signer);
        assert!(ix.accounts[1].is_writable);
    }

    #[test]
    fn transfer_zero_lamports_fails() {
        let from = Pubkey::new([1u8; 32]);
        let to = Pubkey::new([2u8; 32]);
        assert!(transfer(&from, &to, 0).is_err());
    }
}
