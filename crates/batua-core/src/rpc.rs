//! Ledger RPC access.
//!
//! `LedgerRpc` is the seam between the pages and the cluster; `HttpRpcClient`
//! implements it with plain JSON-RPC 2.0 calls over `reqwest`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use chain_sol::{Pubkey, Transaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::RpcConfig;
use crate::error::BatuaError;

/// How settled a transaction must be before it counts as landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(format!("unknown commitment level {other:?}")),
        }
    }
}

/// What a dry run of a transaction predicted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcome {
    pub err: Option<String>,
    pub logs: Vec<String>,
    pub units_consumed: Option<u64>,
}

impl SimulationOutcome {
    pub fn is_ok(&self) -> bool {
        self.err.is_none()
    }
}

/// Options for `sendTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SendOptions {
    /// Submit without the node's preflight simulation.
    pub skip_preflight: bool,
}

impl SendOptions {
    pub const SKIP_PREFLIGHT: SendOptions = SendOptions {
        skip_preflight: true,
    };
}

/// The ledger operations the pages depend on.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, BatuaError>;

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], BatuaError>;

    async fn simulate_transaction(&self, tx: &Transaction)
        -> Result<SimulationOutcome, BatuaError>;

    /// Submit a signed transaction, returning its Base58 signature.
    /// Failures are `BatuaError::Submission`.
    async fn send_transaction(
        &self,
        tx: &Transaction,
        options: SendOptions,
    ) -> Result<String, BatuaError>;

    /// Wait until `signature` reaches `commitment`.
    /// Failures and timeouts are `BatuaError::Confirmation`.
    async fn confirm_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
    ) -> Result<(), BatuaError>;

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<String, BatuaError>;

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, BatuaError>;
}

// ---------------------------------------------------------------------------
// JSON-RPC envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulationValue {
    err: Option<Value>,
    logs: Option<Vec<String>>,
    units_consumed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureStatus {
    err: Option<Value>,
    confirmation_status: Option<Commitment>,
}

fn unwrap_envelope<T>(method: &str, response: RpcResponse<T>) -> Result<T, BatuaError> {
    if let Some(error) = response.error {
        return Err(BatuaError::Rpc(format!(
            "{method}: RPC error {}: {}",
            error.code, error.message
        )));
    }
    response
        .result
        .ok_or_else(|| BatuaError::Rpc(format!("{method}: no result in RPC response")))
}

/// Whether a reported status satisfies the requested commitment.
fn status_reaches(status: Option<Commitment>, wanted: Commitment) -> bool {
    status.is_some_and(|s| s >= wanted)
}

fn send_params(encoded: String, options: SendOptions, commitment: Commitment) -> Value {
    json!([encoded, {
        "encoding": "base64",
        "skipPreflight": options.skip_preflight,
        "preflightCommitment": commitment.as_str(),
    }])
}

fn decode_blockhash(blockhash: &str) -> Result<[u8; 32], BatuaError> {
    let bytes = bs58::decode(blockhash)
        .into_vec()
        .map_err(|e| BatuaError::Rpc(format!("invalid blockhash {blockhash:?}: {e}")))?;
    bytes
        .try_into()
        .map_err(|_| BatuaError::Rpc(format!("blockhash {blockhash:?} is not 32 bytes")))
}

// ---------------------------------------------------------------------------
// HTTP client
// ---------------------------------------------------------------------------

/// JSON-RPC client for a Solana cluster endpoint.
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    url: String,
    client: reqwest::Client,
    commitment: Commitment,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl HttpRpcClient {
    pub fn new(config: &RpcConfig) -> Self {
        Self {
            url: config.url.clone(),
            client: reqwest::Client::new(),
            commitment: config.commitment,
            confirm_timeout: config.confirm_timeout(),
            poll_interval: config.poll_interval(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, BatuaError> {
        debug!(method, %params, "rpc call");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response: RpcResponse<T> = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BatuaError::Rpc(format!("{method}: {e}")))?
            .json()
            .await
            .map_err(|e| BatuaError::Rpc(format!("{method}: invalid response: {e}")))?;

        unwrap_envelope(method, response)
    }

    fn encode(tx: &Transaction) -> Result<String, BatuaError> {
        let wire = tx.to_wire_bytes()?;
        Ok(base64::engine::general_purpose::STANDARD.encode(wire))
    }
}

#[async_trait]
impl LedgerRpc for HttpRpcClient {
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, BatuaError> {
        self.call("getMinimumBalanceForRentExemption", json!([data_len]))
            .await
    }

    async fn get_latest_blockhash(&self) -> Result<[u8; 32], BatuaError> {
        let response: WithContext<BlockhashValue> = self
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment.as_str() }]),
            )
            .await?;
        decode_blockhash(&response.value.blockhash)
    }

    async fn simulate_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<SimulationOutcome, BatuaError> {
        let encoded = Self::encode(tx)?;
        let response: WithContext<SimulationValue> = self
            .call(
                "simulateTransaction",
                json!([encoded, {
                    "encoding": "base64",
                    "commitment": self.commitment.as_str(),
                }]),
            )
            .await?;

        let value = response.value;
        Ok(SimulationOutcome {
            err: value.err.map(|e| e.to_string()),
            logs: value.logs.unwrap_or_default(),
            units_consumed: value.units_consumed,
        })
    }

    async fn send_transaction(
        &self,
        tx: &Transaction,
        options: SendOptions,
    ) -> Result<String, BatuaError> {
        let encoded = Self::encode(tx)?;
        self.call("sendTransaction", send_params(encoded, options, self.commitment))
            .await
            .map_err(|e| BatuaError::Submission(e.to_string()))
    }

    async fn confirm_transaction(
        &self,
        signature: &str,
        commitment: Commitment,
    ) -> Result<(), BatuaError> {
        let deadline = tokio::time::Instant::now() + self.confirm_timeout;

        loop {
            let statuses: Result<WithContext<Vec<Option<SignatureStatus>>>, _> = self
                .call("getSignatureStatuses", json!([[signature]]))
                .await;

            match statuses {
                Ok(response) => {
                    if let Some(Some(status)) = response.value.into_iter().next() {
                        if let Some(err) = status.err {
                            return Err(BatuaError::Confirmation(format!(
                                "transaction {signature} failed: {err}"
                            )));
                        }
                        if status_reaches(status.confirmation_status, commitment) {
                            return Ok(());
                        }
                    }
                }
                // A flaky poll is not fatal; the deadline still applies.
                Err(e) => warn!(%signature, "status poll failed: {e}"),
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(BatuaError::Confirmation(format!(
                    "transaction {signature} not {commitment} within {}s",
                    self.confirm_timeout.as_secs()
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<String, BatuaError> {
        self.call("requestAirdrop", json!([pubkey.to_string(), lamports]))
            .await
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, BatuaError> {
        let response: WithContext<u64> = self
            .call(
                "getBalance",
                json!([pubkey.to_string(), { "commitment": self.commitment.as_str() }]),
            )
            .await?;
        Ok(response.value)
    }
}
