//! Batua wallet application layer.
//!
//! Every page of the wallet (airdrop, send, sign/verify, token launch) is an
//! operation over a [`WalletSession`]. External services sit behind traits:
//! [`LedgerRpc`] for the cluster, [`ImageHost`] for logo uploads and
//! [`MetadataPinner`] for token metadata.

pub mod config;
pub mod error;
pub mod faucet;
pub mod launchpad;
pub mod metadata;
pub mod rpc;
pub mod session;
pub mod signing;
pub mod transfer;
pub mod types;
pub mod upload;

pub use config::BatuaConfig;
pub use error::BatuaError;
pub use launchpad::{
    FundingAttempt, FundingPolicy, LaunchOutcome, LaunchProgress, LaunchReport, LaunchStep,
    Launchpad, StepState,
};
pub use metadata::{MetadataPinner, PinataPinner};
pub use rpc::{Commitment, HttpRpcClient, LedgerRpc, SendOptions, SimulationOutcome};
pub use session::{LocalWallet, Wallet, WalletSession};
pub use types::{MetadataRecord, SignatureRecord, TokenDescriptor, TokenForm, UploadResult};
pub use upload::{CloudinaryHost, ImageHost, LogoFile};
