//! Logo assets
//!
//! The header logo is optional. Any failure to read or decode it is an
//! [`AssetLoadWarning`]: logged, then the header falls back to text only.

use crate::pdf::JpegImage;
use base64::{engine::general_purpose::STANDARD, Engine};
use render_model::LogoInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

/// Resource ID the page renderer uses for the logo
pub const LOGO_RESOURCE_ID: &str = "logo";

/// Where the logo image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogoSource {
    /// JPEG file on disk
    Path(PathBuf),
    /// `data:image/jpeg;base64,...` URI
    DataUri(String),
}

impl LogoSource {
    fn describe(&self) -> String {
        match self {
            LogoSource::Path(path) => path.display().to_string(),
            LogoSource::DataUri(_) => "data URI".to_string(),
        }
    }

    async fn read(&self) -> std::result::Result<Vec<u8>, String> {
        match self {
            LogoSource::Path(path) => tokio::fs::read(path).await.map_err(|e| e.to_string()),
            LogoSource::DataUri(uri) => decode_data_uri(uri),
        }
    }
}

/// Non-fatal failure to load the logo
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("logo {asset} could not be loaded: {reason}")]
pub struct AssetLoadWarning {
    pub asset: String,
    pub reason: String,
}

/// A decoded logo, ready for the renderer and the PDF writer
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLogo {
    pub info: LogoInfo,
    pub image: JpegImage,
}

impl LoadedLogo {
    fn from_jpeg(image: JpegImage) -> Self {
        Self {
            info: LogoInfo {
                resource_id: LOGO_RESOURCE_ID.to_string(),
                width_px: image.width,
                height_px: image.height,
            },
            image,
        }
    }
}

/// Try to load the logo, reporting why it failed
pub async fn try_load_logo(source: &LogoSource) -> std::result::Result<LoadedLogo, AssetLoadWarning> {
    let warning = |reason: String| AssetLoadWarning {
        asset: source.describe(),
        reason,
    };
    let bytes = source.read().await.map_err(warning)?;
    let image = JpegImage::parse(bytes).map_err(|e| warning(e.to_string()))?;
    debug!(width = image.width, height = image.height, "logo loaded");
    Ok(LoadedLogo::from_jpeg(image))
}

/// Load the logo if one is configured
///
/// Failures are logged and yield `None`, which renders a text-only header.
pub async fn load_logo(source: Option<&LogoSource>) -> Option<LoadedLogo> {
    let source = source?;
    match try_load_logo(source).await {
        Ok(logo) => Some(logo),
        Err(warning) => {
            warn!(%warning, "continuing with text-only header");
            None
        }
    }
}

fn decode_data_uri(uri: &str) -> std::result::Result<Vec<u8>, String> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URI has no payload".to_string())?;
    if !meta.ends_with(";base64") {
        return Err("data URI is not base64 encoded".to_string());
    }
    STANDARD.decode(payload.trim()).map_err(|e| e.to_string())
}
