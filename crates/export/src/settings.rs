//! Export settings
//!
//! Page geometry, branding, PDF options and the output directory, read
//! from a JSON file. A missing file means defaults; a file that does not
//! parse is logged and replaced by defaults.

use crate::assets::LogoSource;
use crate::pdf::PdfOptions;
use crate::Result;
use layout_engine::{PageMetrics, PageSize};
use render_model::Branding;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main export settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    pub page: PageSettings,
    pub branding: BrandingSettings,
    pub pdf: PdfSettings,
    pub output: OutputSettings,
}

/// Page geometry, in points
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettings {
    pub size: PageSize,
    pub margin_left: f32,
    pub margin_right: f32,
    pub header_height: f32,
    pub top_padding: f32,
    pub footer_reserve: f32,
    pub body_font_size: f32,
    pub table_header_height: f32,
}

impl Default for PageSettings {
    fn default() -> Self {
        let metrics = PageMetrics::a4();
        Self {
            size: metrics.page_size,
            margin_left: metrics.margin_left,
            margin_right: metrics.margin_right,
            header_height: metrics.header_height,
            top_padding: metrics.top_padding,
            footer_reserve: metrics.footer_reserve,
            body_font_size: metrics.body_font_size,
            table_header_height: metrics.table_header_height,
        }
    }
}

/// Organization identity printed on every page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandingSettings {
    pub organization_name: String,
    pub address_lines: Vec<String>,
    pub notice: String,
    pub logo: Option<LogoSource>,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        let branding = Branding::default();
        Self {
            organization_name: branding.organization_name,
            address_lines: branding.address_lines,
            notice: branding.notice,
            logo: None,
        }
    }
}

impl BrandingSettings {
    pub fn to_branding(&self) -> Branding {
        Branding {
            organization_name: self.organization_name.clone(),
            address_lines: self.address_lines.clone(),
            notice: self.notice.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfSettings {
    /// Flate-compress page content streams
    pub compress: bool,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self { compress: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl ExportSettings {
    /// Validated page metrics for these settings
    pub fn page_metrics(&self) -> layout_engine::Result<PageMetrics> {
        let page = &self.page;
        let mut metrics = PageMetrics::for_size(page.size);
        metrics.margin_left = page.margin_left;
        metrics.margin_right = page.margin_right;
        metrics.header_height = page.header_height;
        metrics.top_padding = page.top_padding;
        metrics.footer_reserve = page.footer_reserve;
        metrics.body_font_size = page.body_font_size;
        metrics.table_header_height = page.table_header_height;
        metrics.validate()?;
        Ok(metrics)
    }

    pub fn pdf_options(&self) -> PdfOptions {
        PdfOptions {
            compress: self.pdf.compress,
        }
    }
}

/// Reads and writes the settings file
pub struct SettingsLoader {
    path: PathBuf,
}

impl SettingsLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk, or return defaults if the file doesn't exist
    pub async fn load(&self) -> Result<ExportSettings> {
        if !self.path.exists() {
            return Ok(ExportSettings::default());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(parse_or_default(&content, &self.path))
    }

    /// Load settings synchronously
    pub fn load_sync(&self) -> Result<ExportSettings> {
        if !self.path.exists() {
            return Ok(ExportSettings::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(parse_or_default(&content, &self.path))
    }

    /// Write settings as pretty JSON, creating the parent directory
    pub async fn save(&self, settings: &ExportSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

fn parse_or_default(content: &str, path: &Path) -> ExportSettings {
    match serde_json::from_str::<ExportSettings>(content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "Failed to parse settings file, using defaults: {}",
                e
            );
            ExportSettings::default()
        }
    }
}
