//! Label image inputs and the opaque references passed to the model.

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SUPPORTED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image is empty")]
    Empty,

    #[error("unsupported image type: {0}")]
    UnsupportedMimeType(String),

    #[error("image data is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid image url: {0}")]
    InvalidUrl(String),

    #[error("image upload failed: {0}")]
    Upload(String),
}

impl ImageError {
    /// Whether the caller supplied a bad image, as opposed to a failure on our side.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ImageError::Upload(_))
    }
}

/// An image as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageInput {
    Url {
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    Bytes {
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
        mime_type: String,
    },
}

impl ImageInput {
    pub fn url(url: impl Into<String>) -> Self {
        ImageInput::Url { url: url.into() }
    }

    pub fn bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        ImageInput::Bytes {
            data,
            mime_type: mime_type.into(),
        }
    }
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, String> {
    let payload = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| e.to_string())
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        super::decode_base64(&encoded)
            .map_err(|e| serde::de::Error::custom(super::ImageError::InvalidBase64(e)))
    }
}

/// Opaque handle the model can load: an http(s) URL or a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short content hash for log correlation; never logs the image itself.
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(self.0.as_bytes());
        hash.to_hex()[..16].to_string()
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.starts_with("data:") {
            write!(f, "data:<{}>", self.fingerprint())
        } else {
            f.write_str(&self.0)
        }
    }
}

#[async_trait]
/// Turns a caller-supplied image into a reference the model can fetch.
pub trait ImagePreparer: Send + Sync {
    async fn prepare(&self, input: &ImageInput) -> Result<ImageReference, ImageError>;
}

/// Inlines uploaded bytes as `data:` URLs and passes http(s) URLs through.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlPreparer;

#[async_trait]
impl ImagePreparer for DataUrlPreparer {
    async fn prepare(&self, input: &ImageInput) -> Result<ImageReference, ImageError> {
        match input {
            ImageInput::Url { url } => validate_url(url),
            ImageInput::Bytes { data, mime_type } => data_url(data, mime_type),
        }
    }
}

pub fn validate_url(url: &str) -> Result<ImageReference, ImageError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ImageError::Empty);
    }
    let parsed = reqwest::Url::parse(url).map_err(|e| ImageError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" | "data" => Ok(ImageReference::new(url)),
        other => Err(ImageError::InvalidUrl(format!("unsupported scheme '{}'", other))),
    }
}

pub fn data_url(data: &[u8], mime_type: &str) -> Result<ImageReference, ImageError> {
    if data.is_empty() {
        return Err(ImageError::Empty);
    }
    let mime_type = mime_type.trim().to_ascii_lowercase();
    if !SUPPORTED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(ImageError::UnsupportedMimeType(mime_type));
    }
    Ok(ImageReference::new(format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(data)
    )))
}
