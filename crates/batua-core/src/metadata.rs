//! Publishing off-chain token metadata to an IPFS pinning service.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::PinningConfig;
use crate::error::BatuaError;
use crate::types::MetadataRecord;

/// Content-addressed storage for metadata JSON.
#[async_trait]
pub trait MetadataPinner: Send + Sync {
    /// Fails with `Configuration` when credentials are missing.
    fn ensure_configured(&self) -> Result<(), BatuaError>;

    /// Pin `record` and return the URI it can be fetched from.
    async fn publish(&self, record: &MetadataRecord) -> Result<String, BatuaError>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// Pinata's `pinJSONToIPFS` endpoint.
pub struct PinataPinner {
    config: PinningConfig,
    client: Client,
}

impl PinataPinner {
    pub fn new(config: &PinningConfig) -> Self {
        let config = PinningConfig {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            secret_api_key: config
                .secret_api_key
                .as_ref()
                .map(|secret| SecretString::from(secret.expose_secret().to_owned())),
            gateway: config.gateway.clone(),
        };
        Self {
            config,
            client: Client::new(),
        }
    }

    /// `<gateway>/ipfs/<hash>`.
    pub fn gateway_uri(&self, hash: &str) -> String {
        gateway_uri(&self.config.gateway, hash)
    }
}

pub fn gateway_uri(gateway: &str, hash: &str) -> String {
    format!("{}/ipfs/{hash}", gateway.trim_end_matches('/'))
}

#[async_trait]
impl MetadataPinner for PinataPinner {
    fn ensure_configured(&self) -> Result<(), BatuaError> {
        self.config.require().map(|_| ())
    }

    async fn publish(&self, record: &MetadataRecord) -> Result<String, BatuaError> {
        let (api_key, secret) = self.config.require()?;
        let url = format!(
            "{}/pinning/pinJSONToIPFS",
            self.config.api_url.trim_end_matches('/')
        );
        debug!(%url, mint = %record.mint, "pinning metadata");

        let response = self
            .client
            .post(&url)
            .header("pinata_api_key", api_key)
            .header("pinata_secret_api_key", secret.expose_secret())
            .json(record)
            .send()
            .await
            .map_err(|e| BatuaError::Publish(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BatuaError::Publish(e.to_string()))?;
        if !status.is_success() {
            return Err(BatuaError::Publish(body));
        }

        let pinned: PinResponse = serde_json::from_str(&body)
            .map_err(|e| BatuaError::Publish(format!("unexpected response {body}: {e}")))?;
        let uri = self.gateway_uri(&pinned.ipfs_hash);
        info!(%uri, "metadata pinned");
        Ok(uri)
    }
}
