//! Image payloads for multimodal analysis
//!
//! Images arrive as a file path from the CLI or the shell. No size or content
//! validation is applied beyond recognising the media type.

use crate::errors::{Result, SchoaError};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;

/// Base64 payload plus its declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data_base64: String,
    pub media_type: String,
}

impl ImagePayload {
    pub fn from_bytes(bytes: &[u8], media_type: impl Into<String>) -> Self {
        Self {
            data_base64: STANDARD.encode(bytes),
            media_type: media_type.into(),
        }
    }

    /// Read an image file, inferring the media type from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let media_type = media_type_for(path).ok_or_else(|| {
            SchoaError::ImageError(format!("Unrecognised image type: {}", path.display()))
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes, media_type))
    }

    /// Decoded size in bytes, if the payload is valid base64
    pub fn decoded_len(&self) -> Option<usize> {
        STANDARD.decode(&self.data_base64).ok().map(|b| b.len())
    }
}

/// Media type for the image extensions a browser file picker would offer
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
