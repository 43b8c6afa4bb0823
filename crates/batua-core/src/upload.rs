//! Token logo validation and upload to the image host.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ImageHostConfig;
use crate::error::BatuaError;
use crate::types::UploadResult;

/// Largest accepted logo, 2 MiB.
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const JPEG_MAGIC: &[u8] = &[0xff, 0xd8, 0xff];

/// A logo file staged in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl LogoFile {
    /// Build from raw bytes, sniffing the MIME type from the content and
    /// falling back to the file extension.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = sniff_mime(&bytes)
            .or_else(|| mime_from_extension(&name))
            .unwrap_or("application/octet-stream")
            .to_string();
        Self { name, mime, bytes }
    }

    pub fn read(path: &Path) -> Result<Self, BatuaError> {
        let bytes = std::fs::read(path)
            .map_err(|e| BatuaError::Validation(format!("cannot read {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "logo".into());
        Ok(Self::from_bytes(name, bytes))
    }

    /// A `data:` URL for showing the logo before it is uploaded.
    pub fn preview_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

impl std::fmt::Debug for LogoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some(MIME_PNG)
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some(MIME_JPEG)
    } else {
        None
    }
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some(MIME_PNG),
        "jpg" | "jpeg" => Some(MIME_JPEG),
        _ => None,
    }
}

/// Check type and size. Runs before any network call.
pub fn validate_logo(file: &LogoFile) -> Result<(), BatuaError> {
    if file.mime != MIME_JPEG && file.mime != MIME_PNG {
        return Err(BatuaError::Validation(
            "Please upload a valid image file (JPEG, PNG)".into(),
        ));
    }
    if file.bytes.len() > MAX_LOGO_BYTES {
        return Err(BatuaError::Validation("File size must be less than 2MB".into()));
    }
    Ok(())
}

/// Hosted image storage returning a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Fails with `Configuration` when credentials are missing.
    fn ensure_configured(&self) -> Result<(), BatuaError>;

    /// Upload an already validated file and return its public URL.
    async fn upload(&self, file: &LogoFile) -> Result<String, BatuaError>;
}

/// Validate and upload, folding every failure into an `UploadResult`.
pub async fn upload_image(host: &dyn ImageHost, file: &LogoFile) -> UploadResult {
    if let Err(e) = validate_logo(file).and_then(|_| host.ensure_configured()) {
        return UploadResult::failed(e.to_string());
    }
    match host.upload(file).await {
        Ok(url) => {
            info!(%url, "logo uploaded");
            UploadResult::succeeded(url)
        }
        Err(BatuaError::Upload(message)) => {
            warn!(%message, "logo upload failed");
            UploadResult::failed(message)
        }
        Err(e) => {
            warn!(error = %e, "logo upload failed");
            UploadResult::failed(e.to_string())
        }
    }
}

/// Unsigned uploads to a Cloudinary-compatible endpoint.
pub struct CloudinaryHost {
    config: ImageHostConfig,
    client: Client,
}

impl CloudinaryHost {
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            config: config.clone(),
            client: Client::new(),
        }
    }

    fn endpoint(&self, cloud_name: &str) -> String {
        format!(
            "{}/{cloud_name}/image/upload",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    fn ensure_configured(&self) -> Result<(), BatuaError> {
        self.config.require().map(|_| ())
    }

    async fn upload(&self, file: &LogoFile) -> Result<String, BatuaError> {
        let (cloud_name, preset) = self.config.require()?;

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|e| BatuaError::Upload(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", preset.to_string())
            .text("folder", self.config.folder.clone());

        let url = self.endpoint(cloud_name);
        debug!(%url, file = %file.name, "uploading logo");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BatuaError::Upload(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BatuaError::Upload(e.to_string()))?;

        parse_upload_response(status.is_success(), &body)
    }
}

/// `{secure_url}` on success, `{error: {message}}` otherwise.
fn parse_upload_response(success: bool, body: &str) -> Result<String, BatuaError> {
    let json: Option<Value> = serde_json::from_str(body).ok();

    if let Some(message) = json
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
    {
        return Err(BatuaError::Upload(message.to_string()));
    }
    if !success {
        return Err(BatuaError::Upload(body.to_string()));
    }

    json.as_ref()
        .and_then(|v| v.get("secure_url"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BatuaError::Upload("response has no secure_url".into()))
}
