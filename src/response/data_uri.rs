//! Inline `data:` URIs for generated images

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{AppError, Result};

/// MIME type of every synthesized image
pub const IMAGE_MIME_TYPE: &str = "image/png";

/// Encode bytes as `data:<mime>;base64,<payload>`
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Encode PNG bytes
pub fn encode_png(bytes: &[u8]) -> String {
    encode(IMAGE_MIME_TYPE, bytes)
}

/// Decode a base64 data URI into its MIME type and bytes
pub fn decode(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AppError::Internal("Not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AppError::Internal("Data URI has no payload".to_string()))?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| AppError::Internal("Data URI is not base64 encoded".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::Internal(format!("Invalid base64 payload: {}", e)))?;

    Ok((mime_type.to_string(), bytes))
}
