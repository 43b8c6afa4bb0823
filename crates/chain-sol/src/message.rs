//! Off-chain message signing and verification.
//!
//! Messages are UTF-8 encoded and signed raw with Ed25519; signatures travel
//! as Base58 strings.

use ed25519_dalek::{Signature, VerifyingKey};

use crate::address::Pubkey;
use crate::error::SolError;
use crate::keypair::Signer;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Sign the UTF-8 bytes of `text`.
pub fn sign_text(signer: &dyn Signer, text: &str) -> Result<[u8; SIGNATURE_LEN], SolError> {
    if text.is_empty() {
        return Err(SolError::SigningError("message is empty".into()));
    }
    Ok(signer.sign_message(text.as_bytes()))
}

/// Verify a raw signature. Invalid keys or signatures yield `false`.
pub fn verify_signature(pubkey: &Pubkey, message: &[u8], signature: &[u8; SIGNATURE_LEN]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(pubkey.as_bytes()) else {
        return false;
    };
    key.verify_strict(message, &Signature::from_bytes(signature))
        .is_ok()
}

/// Verify a Base58 signature over `text` for a Base58 public key.
///
/// Any decoding problem is reported as an invalid signature (`false`).
pub fn verify_text(text: &str, signature_b58: &str, pubkey_b58: &str) -> bool {
    let Ok(pubkey) = pubkey_b58.parse::<Pubkey>() else {
        return false;
    };
    let Ok(sig_bytes) = bs58::decode(signature_b58.trim()).into_vec() else {
        return false;
    };
    let Ok(signature) = <[u8; SIGNATURE_LEN]>::try_from(sig_bytes.as_slice()) else {
        return false;
    };
    verify_signature(&pubkey, text.as_bytes(), &signature)
}
