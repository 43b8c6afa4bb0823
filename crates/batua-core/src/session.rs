//! Wallet context shared by every page.
//!
//! A `WalletSession` is built once at start-up from the configured RPC
//! endpoint and wallet, handed by reference to each operation, and consumed
//! by `disconnect`. There is no global wallet state.

use std::path::Path;
use std::sync::Arc;

use bip39::{Language, Mnemonic};
use chain_sol::{Keypair, Pubkey, Signer};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha512;
use tracing::info;
use zeroize::{Zeroize, Zeroizing};

use crate::config::BatuaConfig;
use crate::error::BatuaError;
use crate::rpc::{Commitment, HttpRpcClient, LedgerRpc};

type HmacSha512 = Hmac<Sha512>;

/// SLIP-0010 path used by Solana wallets for the first account.
pub const SOLANA_DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

const HARDENED_OFFSET: u32 = 0x8000_0000;

/// The signing capability of the connected account.
pub trait Wallet: Signer + Send + Sync {
    /// Whether the wallet can sign arbitrary off-chain messages.
    fn supports_message_signing(&self) -> bool {
        true
    }
}

/// A wallet backed by a keypair held in this process.
#[derive(Debug)]
pub struct LocalWallet {
    keypair: Keypair,
}

impl LocalWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Load a Solana CLI JSON keypair file.
    pub fn from_keypair_file(path: &Path) -> Result<Self, BatuaError> {
        Ok(Self::new(Keypair::read_from_file(path)?))
    }

    /// Derive the first Solana account of a BIP-39 phrase.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, BatuaError> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, phrase)
            .map_err(|e| BatuaError::Wallet(format!("invalid mnemonic: {e}")))?;
        let seed = Zeroizing::new(mnemonic.to_seed(passphrase));
        let secret = derive_ed25519_seed(&seed[..], SOLANA_DERIVATION_PATH)?;
        Ok(Self::new(Keypair::from_seed(&secret)))
    }

    /// Build from the `[wallet]` section: keypair file first, then mnemonic.
    pub fn from_config(config: &BatuaConfig) -> Result<Self, BatuaError> {
        if let Some(path) = &config.wallet.keypair_path {
            return Self::from_keypair_file(path);
        }
        if let Some(phrase) = &config.wallet.mnemonic {
            return Self::from_mnemonic(phrase.expose_secret(), "");
        }
        Err(BatuaError::Validation("Please connect your wallet first".into()))
    }
}

impl Signer for LocalWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.keypair.sign_message(message)
    }
}

impl Wallet for LocalWallet {}

/// SLIP-0010 Ed25519 derivation. Every path component is hardened.
fn derive_ed25519_seed(seed: &[u8], path: &str) -> Result<Zeroizing<[u8; 32]>, BatuaError> {
    let mut mac = HmacSha512::new_from_slice(b"ed25519 seed")
        .map_err(|e| BatuaError::Wallet(e.to_string()))?;
    mac.update(seed);
    let mut result = mac.finalize().into_bytes();

    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&result[..32]);
    chain_code.copy_from_slice(&result[32..]);
    result.zeroize();

    for index in parse_hardened_path(path)? {
        let mut mac = HmacSha512::new_from_slice(&chain_code[..])
            .map_err(|e| BatuaError::Wallet(e.to_string()))?;
        mac.update(&[0x00]);
        mac.update(&key[..]);
        mac.update(&(index | HARDENED_OFFSET).to_be_bytes());
        let mut result = mac.finalize().into_bytes();

        key.copy_from_slice(&result[..32]);
        chain_code.copy_from_slice(&result[32..]);
        result.zeroize();
    }

    Ok(key)
}

/// Parse "m/44'/501'/0'/0'" into [44, 501, 0, 0].
fn parse_hardened_path(path: &str) -> Result<Vec<u32>, BatuaError> {
    let rest = path
        .strip_prefix("m/")
        .ok_or_else(|| BatuaError::Wallet("derivation path must start with m/".into()))?;

    rest.split('/')
        .map(|component| {
            let number = component
                .strip_suffix('\'')
                .or_else(|| component.strip_suffix('h'))
                .ok_or_else(|| {
                    BatuaError::Wallet(format!("ed25519 path component {component} is not hardened"))
                })?;
            number
                .parse::<u32>()
                .ok()
                .filter(|n| *n < HARDENED_OFFSET)
                .ok_or_else(|| BatuaError::Wallet(format!("invalid path component {component}")))
        })
        .collect()
}

/// The connection context handed to every page.
pub struct WalletSession {
    rpc: Arc<dyn LedgerRpc>,
    wallet: Arc<dyn Wallet>,
    commitment: Commitment,
}

impl WalletSession {
    pub fn connect(rpc: Arc<dyn LedgerRpc>, wallet: Arc<dyn Wallet>, commitment: Commitment) -> Self {
        info!(account = %wallet.pubkey(), %commitment, "wallet connected");
        Self {
            rpc,
            wallet,
            commitment,
        }
    }

    /// Connect the configured wallet to the configured cluster.
    pub fn from_config(config: &BatuaConfig) -> Result<Self, BatuaError> {
        let wallet = LocalWallet::from_config(config)?;
        let rpc = HttpRpcClient::new(&config.rpc);
        info!(url = rpc.url(), "using rpc endpoint");
        Ok(Self::connect(
            Arc::new(rpc),
            Arc::new(wallet),
            config.rpc.commitment,
        ))
    }

    pub fn pubkey(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    pub fn wallet(&self) -> &dyn Wallet {
        self.wallet.as_ref()
    }

    pub fn rpc(&self) -> &dyn LedgerRpc {
        self.rpc.as_ref()
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    /// Tear the session down. Nothing can use it afterwards.
    pub fn disconnect(self) {
        info!(account = %self.wallet.pubkey(), "wallet disconnected");
    }
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("account", &self.wallet.pubkey())
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    // BIP-39 test vector: "abandon" x11 + "about"
    const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn mnemonic_derives_known_solana_account() {
        let wallet = LocalWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();
        assert_eq!(
            wallet.pubkey().to_string(),
            "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"
        );
    }

    #[test]
    fn passphrase_changes_account() {
        let plain = LocalWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap();
        let salted = LocalWallet::from_mnemonic(TEST_MNEMONIC, "batua").unwrap();
        assert_ne!(plain.pubkey(), salted.pubkey());
    }

    #[test]
    fn invalid_mnemonic_is_rejected() {
        let err = LocalWallet::from_mnemonic("abandon abandon", "").unwrap_err();
        assert!(matches!(err, BatuaError::Wallet(_)));
    }

    #[test]
    fn path_parsing() {
        assert_eq!(parse_hardened_path(SOLANA_DERIVATION_PATH).unwrap(), vec![44, 501, 0, 0]);
        assert_eq!(parse_hardened_path("m/44h/501h").unwrap(), vec![44, 501]);
        assert!(parse_hardened_path("44'/501'").is_err());
        assert!(parse_hardened_path("m/44'/501'/0").is_err());
        assert!(parse_hardened_path("m/44'/x'").is_err());
    }

    #[test]
    fn unconfigured_wallet_asks_to_connect() {
        let err = LocalWallet::from_config(&BatuaConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Please connect your wallet first");
    }

    #[test]
    fn config_mnemonic_is_used() {
        let mut config = BatuaConfig::default();
        config.wallet.mnemonic = Some(SecretString::from(TEST_MNEMONIC));
        let wallet = LocalWallet::from_config(&config).unwrap();
        assert!(wallet.supports_message_signing());
        assert_eq!(
            wallet.pubkey(),
            LocalWallet::from_mnemonic(TEST_MNEMONIC, "").unwrap().pubkey()
        );
    }

    #[test]
    fn keypair_file_is_loaded() {
        let keypair = Keypair::generate();
        let bytes: Vec<u8> = keypair.to_bytes().to_vec();
        let path = std::env::temp_dir().join(format!("batua-session-{}.json", keypair.pubkey()));
        std::fs::write(&path, serde_json::to_string(&bytes).unwrap()).unwrap();

        let wallet = LocalWallet::from_keypair_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(wallet.pubkey(), keypair.pubkey());
    }
}
