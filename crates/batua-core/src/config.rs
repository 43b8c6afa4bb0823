//! Runtime configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! environment variables. Credentials stay optional here; each operation
//! checks the ones it needs before touching the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::BatuaError;
use crate::rpc::Commitment;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_IMAGE_HOST_API: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_UPLOAD_FOLDER: &str = "batua_tokens";
pub const DEFAULT_PINNING_API: &str = "https://api.pinata.cloud";
pub const DEFAULT_GATEWAY: &str = "https://gateway.pinata.cloud";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatuaConfig {
    pub rpc: RpcConfig,
    pub image_host: ImageHostConfig,
    pub pinning: PinningConfig,
    pub wallet: WalletConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub url: String,
    pub commitment: Commitment,
    pub confirm_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.into(),
            commitment: Commitment::Confirmed,
            confirm_timeout_secs: 60,
            poll_interval_ms: 500,
        }
    }
}

impl RpcConfig {
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Image host (Cloudinary-style unsigned upload) settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageHostConfig {
    pub api_base: String,
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
    pub folder: String,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_IMAGE_HOST_API.into(),
            cloud_name: None,
            upload_preset: None,
            folder: DEFAULT_UPLOAD_FOLDER.into(),
        }
    }
}

impl ImageHostConfig {
    /// Cloud name and upload preset, or a configuration error naming the
    /// first one that is missing.
    pub fn require(&self) -> Result<(&str, &str), BatuaError> {
        let cloud_name = non_empty(self.cloud_name.as_deref())
            .ok_or_else(|| missing("CLOUDINARY_CLOUD_NAME"))?;
        let preset = non_empty(self.upload_preset.as_deref())
            .ok_or_else(|| missing("CLOUDINARY_UPLOAD_PRESET"))?;
        Ok((cloud_name, preset))
    }
}

/// Metadata pinning service (Pinata-style) settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PinningConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret_api_key: Option<SecretString>,
    pub gateway: String,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PINNING_API.into(),
            api_key: None,
            secret_api_key: None,
            gateway: DEFAULT_GATEWAY.into(),
        }
    }
}

impl PinningConfig {
    pub fn require(&self) -> Result<(&str, &SecretString), BatuaError> {
        let key = non_empty(self.api_key.as_deref()).ok_or_else(|| missing("PINATA_API_KEY"))?;
        let secret = self
            .secret_api_key
            .as_ref()
            .ok_or_else(|| missing("PINATA_SECRET_API_KEY"))?;
        Ok((key, secret))
    }
}

/// Where the local wallet's key comes from.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub keypair_path: Option<PathBuf>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub mnemonic: Option<SecretString>,
}

impl BatuaConfig {
    /// Load from `path` (if given) and then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, BatuaError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, BatuaError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BatuaError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, BatuaError> {
        toml::from_str(contents)
            .map_err(|e| BatuaError::Configuration(format!("invalid config: {e}")))
    }

    /// Override fields from environment-style variables.
    ///
    /// Unparseable numeric or commitment values are ignored with a warning so
    /// a stray variable cannot abort start-up.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BATUA_RPC_URL") {
            self.rpc.url = url;
        }
        if let Some(value) = lookup("BATUA_COMMITMENT") {
            match value.parse() {
                Ok(commitment) => self.rpc.commitment = commitment,
                Err(e) => tracing::warn!("ignoring BATUA_COMMITMENT: {e}"),
            }
        }
        if let Some(value) = lookup("BATUA_CONFIRM_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => self.rpc.confirm_timeout_secs = secs,
                Err(e) => tracing::warn!("ignoring BATUA_CONFIRM_TIMEOUT_SECS={value}: {e}"),
            }
        }

        if let Some(name) = lookup("CLOUDINARY_CLOUD_NAME") {
            self.image_host.cloud_name = Some(name);
        }
        if let Some(preset) = lookup("CLOUDINARY_UPLOAD_PRESET") {
            self.image_host.upload_preset = Some(preset);
        }
        if let Some(folder) = lookup("CLOUDINARY_FOLDER") {
            self.image_host.folder = folder;
        }

        if let Some(key) = lookup("PINATA_API_KEY") {
            self.pinning.api_key = Some(key);
        }
        if let Some(secret) = lookup("PINATA_SECRET_API_KEY") {
            self.pinning.secret_api_key = Some(SecretString::from(secret));
        }
        if let Some(gateway) = lookup("PINATA_GATEWAY") {
            self.pinning.gateway = gateway;
        }

        if let Some(path) = lookup("BATUA_KEYPAIR") {
            self.wallet.keypair_path = Some(PathBuf::from(path));
        }
        if let Some(phrase) = lookup("BATUA_MNEMONIC") {
            self.wallet.mnemonic = Some(SecretString::from(phrase));
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn missing(var: &str) -> BatuaError {
    BatuaError::Configuration(format!("{var} is not set"))
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_devnet_without_credentials() {
        let config = BatuaConfig::default();
        assert_eq!(config.rpc.url, DEFAULT_RPC_URL);
        assert_eq!(config.rpc.commitment, Commitment::Confirmed);
        assert_eq!(config.image_host.folder, "batua_tokens");
        assert!(config.image_host.require().is_err());
        assert!(config.pinning.require().is_err());
    }

    #[test]
    fn toml_sections_are_read() {
        let config = BatuaConfig::from_toml(
            r#"
            [rpc]
            url = "http://127.0.0.1:8899"
            commitment = "finalized"

            [image_host]
            cloud_name = "demo"
            upload_preset = "ml_default"

            [pinning]
            api_key = "key"
            secret_api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.rpc.url, "http://127.0.0.1:8899");
        assert_eq!(config.rpc.commitment, Commitment::Finalized);
        assert_eq!(config.rpc.confirm_timeout_secs, 60);
        assert_eq!(config.image_host.require().unwrap(), ("demo", "ml_default"));
        let (key, secret) = config.pinning.require().unwrap();
        assert_eq!(key, "key");
        assert_eq!(secret.expose_secret(), "secret");
    }

    #[test]
    fn invalid_toml_is_configuration_error() {
        let err = BatuaConfig::from_toml("rpc = 5").unwrap_err();
        assert!(matches!(err, BatuaError::Configuration(_)));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = BatuaConfig::from_toml("[image_host]\ncloud_name = \"file\"").unwrap();
        config.apply_env(env(&[
            ("CLOUDINARY_CLOUD_NAME", "env"),
            ("CLOUDINARY_UPLOAD_PRESET", "preset"),
            ("PINATA_API_KEY", "k"),
            ("PINATA_SECRET_API_KEY", "s"),
            ("BATUA_CONFIRM_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(config.image_host.require().unwrap(), ("env", "preset"));
        assert!(config.pinning.require().is_ok());
        assert_eq!(config.rpc.confirm_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let mut config = BatuaConfig::default();
        config.apply_env(env(&[
            ("BATUA_COMMITMENT", "eventually"),
            ("BATUA_CONFIRM_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(config.rpc.commitment, Commitment::Confirmed);
        assert_eq!(config.rpc.confirm_timeout_secs, 60);
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let mut config = BatuaConfig::default();
        config.apply_env(env(&[("CLOUDINARY_CLOUD_NAME", "  "), ("CLOUDINARY_UPLOAD_PRESET", "p")]));
        let err = config.image_host.require().unwrap_err();
        assert_eq!(err.to_string(), "configuration error: CLOUDINARY_CLOUD_NAME is not set");
    }

    #[test]
    fn missing_pinning_secret_is_named() {
        let mut config = BatuaConfig::default();
        config.apply_env(env(&[("PINATA_API_KEY", "k")]));
        let err = config.pinning.require().unwrap_err();
        assert!(err.to_string().contains("PINATA_SECRET_API_KEY"));
    }
}
