//! Off-chain message signing with the connected wallet.

use chain_sol::Signer;
use tracing::{debug, info};

use crate::error::BatuaError;
use crate::session::WalletSession;
use crate::types::SignatureRecord;

/// Sign the UTF-8 bytes of `text` with the connected account.
pub fn sign_message(session: &WalletSession, text: &str) -> Result<SignatureRecord, BatuaError> {
    let wallet = session.wallet();
    if !wallet.supports_message_signing() {
        return Err(BatuaError::Capability(
            "Wallet connection does not support message signing".into(),
        ));
    }
    if text.is_empty() {
        return Err(BatuaError::Validation("Please enter a message to sign".into()));
    }

    let signer: &dyn Signer = wallet;
    let signature = chain_sol::sign_text(signer, text)?;
    let message = text.as_bytes().to_vec();
    let encoded = bs58::encode(signature).into_string();
    info!(account = %wallet.pubkey(), "message signed");

    Ok(SignatureRecord {
        message,
        signature,
        encoded,
    })
}

/// Check a Base58 signature over `text` for a Base58 public key.
///
/// Malformed input of any kind yields `false`.
pub fn verify_message(text: &str, signature_b58: &str, pubkey_b58: &str) -> bool {
    let valid = chain_sol::verify_text(text, signature_b58, pubkey_b58);
    debug!(valid, signature_len = signature_b58.len(), "verified message");
    valid
}

/// Like [`verify_message`], but rejects empty fields up front.
pub fn verify_input(text: &str, signature_b58: &str, pubkey_b58: &str) -> Result<bool, BatuaError> {
    if text.is_empty() || signature_b58.trim().is_empty() {
        return Err(BatuaError::Validation(
            "Please provide both message and signature".into(),
        ));
    }
    Ok(verify_message(text, signature_b58, pubkey_b58))
}
