//! Solana primitives for the Batua wallet.
//!
//! Addresses, keypairs, the compact transaction wire format, and the System,
//! Token-2022, token-metadata and associated-token-account instructions
//! needed to transfer SOL and launch a fungible token. Everything is encoded
//! by hand with `ed25519-dalek`, `sha2` and `bs58` instead of `solana-sdk`.

pub mod address;
pub mod associated_token;
pub mod error;
pub mod keypair;
pub mod message;
pub mod system;
pub mod token_2022;
pub mod token_metadata;
pub mod transaction;

pub use address::Pubkey;
pub use associated_token::{
    create_associated_token_account_idempotent, derive_associated_token_address,
    ASSOCIATED_TOKEN_PROGRAM_ID,
};
pub use error::SolError;
pub use keypair::{Keypair, Signer};
pub use message::{sign_text, verify_signature, verify_text};
pub use system::{LAMPORTS_PER_SOL, SYSTEM_PROGRAM_ID};
pub use token_2022::{mint_len_with_metadata_pointer, ui_amount_to_base_units, TOKEN_2022_PROGRAM_ID};
pub use token_metadata::{estimate_metadata_len, pad_symbol};
pub use transaction::{AccountMeta, Instruction, Message, Transaction};
