//! Hand-built Solana legacy transactions.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::address::Pubkey;
use crate::error::SolError;
use crate::keypair::Signer;

/// Largest serialized transaction the cluster accepts.
pub const PACKET_DATA_SIZE: usize = 1232;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value, returning `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for (consumed, byte) in data.iter().take(3).enumerate() {
        value |= ((byte & 0x7f) as u32) << (7 * consumed);
        if byte & 0x80 == 0 {
            return u16::try_from(value)
                .map(|v| (v, consumed + 1))
                .map_err(|_| SolError::SerializationError("compact-u16 value overflow".into()));
        }
    }

    Err(SolError::SerializationError(
        "unexpected end of data while decoding compact-u16".into(),
    ))
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction before it is compiled into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// An instruction whose account references are indices into
/// `Message::account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// The signed portion of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Account keys in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions into a message paid for by `fee_payer`.
    pub fn compile(
        instructions: &[Instruction],
        fee_payer: &Pubkey,
        recent_blockhash: &[u8; 32],
    ) -> Result<Self, SolError> {
        if instructions.is_empty() {
            return Err(SolError::TransactionBuildError(
                "transaction needs at least one instruction".into(),
            ));
        }

        struct AccountEntry {
            pubkey: Pubkey,
            is_signer: bool,
            is_writable: bool,
        }

        // Account lists are tiny; a Vec keeps insertion order for free.
        let mut entries: Vec<AccountEntry> = Vec::new();
        let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
            if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
                entry.is_signer |= signer;
                entry.is_writable |= writable;
            } else {
                entries.push(AccountEntry {
                    pubkey,
                    is_signer: signer,
                    is_writable: writable,
                });
            }
        };

        upsert(*fee_payer, true, true);
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(ix.program_id, false, false);
        }

        // Stable sort keeps the fee payer ahead of every other writable signer.
        entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
            (true, true) => 0u8,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        if entries.len() > u8::MAX as usize {
            return Err(SolError::TransactionBuildError(format!(
                "too many accounts: {}",
                entries.len()
            )));
        }

        let count = |f: fn(&AccountEntry) -> bool| entries.iter().filter(|e| f(e)).count() as u8;
        let num_required_signatures = count(|e| e.is_signer);
        let num_readonly_signed = count(|e| e.is_signer && !e.is_writable);
        let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable);

        let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, SolError> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| {
                    SolError::TransactionBuildError(format!("account {key} not in account keys"))
                })
        };

        let mut compiled = Vec::with_capacity(instructions.len());
        for ix in instructions {
            compiled.push(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                account_indices: ix
                    .accounts
                    .iter()
                    .map(|meta| index_of(&meta.pubkey))
                    .collect::<Result<_, _>>()?,
                data: ix.data.clone(),
            });
        }

        Ok(Self {
            account_keys,
            num_required_signatures,
            num_readonly_signed,
            num_readonly_unsigned,
            recent_blockhash: *recent_blockhash,
            instructions: compiled,
        })
    }

    /// The accounts whose signatures the message requires, in slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&encode_compact_u16(self.account_keys.len() as u16));
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&encode_compact_u16(self.instructions.len() as u16));
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            buf.extend_from_slice(&encode_compact_u16(ix.account_indices.len() as u16));
            buf.extend_from_slice(&ix.account_indices);
            buf.extend_from_slice(&encode_compact_u16(ix.data.len() as u16));
            buf.extend_from_slice(&ix.data);
        }

        buf
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A message plus one signature slot per required signer.
///
/// Unfilled slots hold 64 zero bytes until the matching signer signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; 64]>,
    pub message: Message,
}

impl Transaction {
    /// Build an unsigned transaction.
    pub fn new_unsigned(message: Message) -> Self {
        Self {
            signatures: vec![[0u8; 64]; message.num_required_signatures as usize],
            message,
        }
    }

    /// Compile `instructions` and sign with every signer in `signers`.
    ///
    /// The resulting transaction is not required to be fully signed; callers
    /// that need that guarantee check `is_fully_signed`.
    pub fn new_signed(
        instructions: &[Instruction],
        fee_payer: &Pubkey,
        recent_blockhash: &[u8; 32],
        signers: &[&dyn Signer],
    ) -> Result<Self, SolError> {
        let message = Message::compile(instructions, fee_payer, recent_blockhash)?;
        let mut tx = Self::new_unsigned(message);
        tx.partial_sign(signers)?;
        Ok(tx)
    }

    /// Fill the signature slots belonging to `signers`.
    ///
    /// Fails if any signer is not a required signer of the message.
    pub fn partial_sign(&mut self, signers: &[&dyn Signer]) -> Result<(), SolError> {
        let message_bytes = self.message.serialize();
        for signer in signers {
            let pubkey = signer.pubkey();
            let slot = self
                .message
                .signer_keys()
                .iter()
                .position(|k| *k == pubkey)
                .ok_or_else(|| {
                    SolError::SigningError(format!("{pubkey} is not a required signer"))
                })?;
            self.signatures[slot] = signer.sign_message(&message_bytes);
        }
        Ok(())
    }

    /// Whether every required signature slot has been filled.
    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(|sig| sig.iter().any(|b| *b != 0))
    }

    /// The transaction id: Base58 of the fee payer's signature.
    pub fn signature(&self) -> Option<String> {
        self.signatures
            .first()
            .filter(|sig| sig.iter().any(|b| *b != 0))
            .map(|sig| bs58::encode(sig).into_string())
    }

    /// Serialize into the wire format accepted by `sendTransaction`.
    pub fn to_wire_bytes(&self) -> Result<Vec<u8>, SolError> {
        let message_bytes = self.message.serialize();
        let mut wire = Vec::with_capacity(3 + 64 * self.signatures.len() + message_bytes.len());

        wire.extend_from_slice(&encode_compact_u16(self.signatures.len() as u16));
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message_bytes);

        if wire.len() > PACKET_DATA_SIZE {
            return Err(SolError::SerializationError(format!(
                "transaction is {} bytes, limit is {PACKET_DATA_SIZE}",
                wire.len()
            )));
        }

        Ok(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::Keypair;
    use crate::message::verify_signature;
    use crate::system;

    const BLOCKHASH: [u8; 32] = [0xABu8; 32];

    // -- Compact-u16 ---------------------------------------------------------

    #[test]
    fn compact_u16_boundaries() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
        assert_eq!(encode_compact_u16(0x80), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(0x3fff), vec![0xff, 0x7f]);
        assert_eq!(encode_compact_u16(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(0xffff), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn compact_u16_decode_reports_consumed_bytes() {
        assert_eq!(decode_compact_u16(&[0x80, 0x01, 0xAA]).unwrap(), (0x80, 2));
        assert_eq!(decode_compact_u16(&[0xff, 0xff, 0x03]).unwrap(), (0xffff, 3));
    }

    #[test]
    fn compact_u16_decode_rejects_truncated_and_overflow() {
        assert!(decode_compact_u16(&[]).is_err());
        assert!(decode_compact_u16(&[0x80]).is_err());
        assert!(decode_compact_u16(&[0xff, 0xff, 0x04]).is_err());
    }

    // -- Message compilation -------------------------------------------------

    #[test]
    fn fee_payer_is_first_account() {
        let payer = Pubkey::new([1u8; 32]);
        let other_signer = Pubkey::new([2u8; 32]);
        let ix = Instruction {
            program_id: Pubkey::new([9u8; 32]),
            accounts: vec![
                AccountMeta::new(other_signer, true),
                AccountMeta::new(payer, true),
            ],
            data: vec![],
        };

        let msg = Message::compile(&[ix], &payer, &BLOCKHASH).unwrap();
        assert_eq!(msg.account_keys[0], payer);
        assert_eq!(msg.account_keys[1], other_signer);
        assert_eq!(msg.num_required_signatures, 2);
    }

    #[test]
    fn accounts_are_sorted_by_role_and_merged() {
        let payer = Pubkey::new([1u8; 32]);
        let readonly = Pubkey::new([3u8; 32]);
        let writable = Pubkey::new([4u8; 32]);
        let program = Pubkey::new([9u8; 32]);
        let ix = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new_readonly(readonly, false),
                AccountMeta::new_readonly(writable, false),
                // Same key again, now writable: permissions merge upward.
                AccountMeta::new(writable, false),
            ],
            data: vec![1, 2, 3],
        };

        let msg = Message::compile(&[ix], &payer, &BLOCKHASH).unwrap();
        assert_eq!(msg.account_keys, vec![payer, writable, readonly, program]);
        assert_eq!(msg.num_required_signatures, 1);
        assert_eq!(msg.num_readonly_signed, 0);
        assert_eq!(msg.num_readonly_unsigned, 2);
        assert_eq!(msg.instructions[0].program_id_index, 3);
        assert_eq!(msg.instructions[0].account_indices, vec![2, 1, 1]);
    }

    #[test]
    fn compile_rejects_empty_instruction_list() {
        let payer = Pubkey::new([1u8; 32]);
        assert!(Message::compile(&[], &payer, &BLOCKHASH).is_err());
    }

    // -- Signing -------------------------------------------------------------

    #[test]
    fn two_signers_fill_both_slots() {
        let payer = Keypair::generate();
        let mint = Keypair::generate();
        let ix = system::create_account(&payer.pubkey(), &mint.pubkey(), 1_000, 82, &Pubkey::default());

        let tx = Transaction::new_signed(&[ix], &payer.pubkey(), &BLOCKHASH, &[&payer, &mint])
            .unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert!(tx.is_fully_signed());

        let message = tx.message.serialize();
        assert!(verify_signature(&payer.pubkey(), &message, &tx.signatures[0]));
        assert!(verify_signature(&mint.pubkey(), &message, &tx.signatures[1]));
    }

    #[test]
    fn partial_signing_leaves_slot_empty() {
        let payer = Keypair::generate();
        let mint = Keypair::generate();
        let ix = system::create_account(&payer.pubkey(), &mint.pubkey(), 1_000, 82, &Pubkey::default());

        let tx = Transaction::new_signed(&[ix], &payer.pubkey(), &BLOCKHASH, &[&payer]).unwrap();
        assert!(!tx.is_fully_signed());
        assert!(tx.signature().is_some());
    }

    #[test]
    fn unknown_signer_is_rejected() {
        let payer = Keypair::generate();
        let stranger = Keypair::generate();
        let ix = system::transfer(&payer.pubkey(), &Pubkey::new([5u8; 32]), 10).unwrap();

        let err = Transaction::new_signed(&[ix], &payer.pubkey(), &BLOCKHASH, &[&payer, &stranger])
            .unwrap_err();
        assert!(err.to_string().contains("not a required signer"));
    }

    #[test]
    fn wire_format_layout() {
        let payer = Keypair::generate();
        let ix = system::transfer(&payer.pubkey(), &Pubkey::new([5u8; 32]), 10).unwrap();
        let tx = Transaction::new_signed(&[ix], &payer.pubkey(), &BLOCKHASH, &[&payer]).unwrap();

        let wire = tx.to_wire_bytes().unwrap();
        assert_eq!(wire[0], 1);
        assert_eq!(&wire[1..65], &tx.signatures[0]);
        assert_eq!(&wire[65..], tx.message.serialize().as_slice());
        assert_eq!(tx.signature().unwrap(), bs58::encode(tx.signatures[0]).into_string());
    }

    #[test]
    fn oversized_transaction_is_rejected() {
        let payer = Keypair::generate();
        let ix = Instruction {
            program_id: Pubkey::new([9u8; 32]),
            accounts: vec![],
            data: vec![0u8; PACKET_DATA_SIZE],
        };
        let tx = Transaction::new_signed(&[ix], &payer.pubkey(), &BLOCKHASH, &[&payer]).unwrap();
        assert!(tx.to_wire_bytes().is_err());
    }
}
