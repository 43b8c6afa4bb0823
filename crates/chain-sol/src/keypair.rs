//! Ed25519 keypairs and the signing capability used by transactions.
//!
//! Secrets are held inside `ed25519_dalek::SigningKey`, which zeroizes its
//! memory on drop. Intermediate buffers are zeroized explicitly.

use std::fs;
use std::path::Path;

use ed25519_dalek::{Signer as _, SigningKey};
use rand_core::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::address::Pubkey;
use crate::error::SolError;

/// Anything that can produce an Ed25519 signature for an account.
pub trait Signer {
    fn pubkey(&self) -> Pubkey;

    /// Sign raw bytes, returning the 64-byte signature.
    fn sign_message(&self, message: &[u8]) -> [u8; 64];
}

/// An Ed25519 keypair.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse the 64-byte `seed || pubkey` layout used by the Solana CLI.
    ///
    /// The trailing public key must match the one derived from the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        if bytes.len() != 64 {
            return Err(SolError::InvalidKeypair(format!(
                "expected 64 bytes, got {}",
                bytes.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_seed(&seed);
        seed.zeroize();

        if keypair.pubkey().as_bytes() != &bytes[32..] {
            return Err(SolError::InvalidKeypair(
                "public key does not match secret key".into(),
            ));
        }

        Ok(keypair)
    }

    /// Parse a JSON array of 64 integers (the Solana CLI keypair file).
    pub fn from_json(json: &str) -> Result<Self, SolError> {
        let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
            serde_json::from_str(json)
                .map_err(|e| SolError::InvalidKeypair(format!("invalid keypair JSON: {e}")))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Read a Solana CLI keypair file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, SolError> {
        let path = path.as_ref();
        let contents = Zeroizing::new(fs::read_to_string(path).map_err(|e| {
            SolError::InvalidKeypair(format!("cannot read {}: {e}", path.display()))
        })?);
        Self::from_json(&contents)
    }

    /// The 64-byte `seed || pubkey` encoding. Zeroized when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 64]> {
        let mut out = Zeroizing::new([0u8; 64]);
        out[..32].copy_from_slice(self.signing_key.as_bytes());
        out[32..].copy_from_slice(self.pubkey().as_bytes());
        out
    }
}

impl Signer for Keypair {
    fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keypairs_differ() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert_ne!(a.pubkey(), b.pubkey());
        assert!(a.pubkey().is_on_curve());
    }

    #[test]
    fn bytes_roundtrip_preserves_pubkey() {
        let original = Keypair::generate();
        let restored = Keypair::from_bytes(&original.to_bytes()[..]).unwrap();
        assert_eq!(original.pubkey(), restored.pubkey());
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        let err = Keypair::from_bytes(&[0u8; 32]).unwrap_err();
        assert!(err.to_string().contains("expected 64 bytes"));
    }

    #[test]
    fn from_bytes_rejects_mismatched_pubkey() {
        let mut bytes = *Keypair::generate().to_bytes();
        bytes[63] ^= 0xff;
        assert!(Keypair::from_bytes(&bytes).is_err());
    }

    #[test]
    fn from_json_accepts_cli_format() {
        let keypair = Keypair::from_seed(&[3u8; 32]);
        let json = serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap();
        let parsed = Keypair::from_json(&json).unwrap();
        assert_eq!(parsed.pubkey(), keypair.pubkey());
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(Keypair::from_json("{\"not\": \"a keypair\"}").is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let debug = format!("{keypair:?}");
        assert!(debug.contains("pubkey"));
        assert!(!debug.contains("signing_key"));
    }
}
