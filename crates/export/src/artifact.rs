//! Finished export artifacts and their file names

use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::Result;
use layout_engine::LayoutWarning;
use report_model::{Document, ReportKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// `<Kind>_Report_<date>.pdf`
pub fn pdf_file_name(kind: ReportKind, iso_date: &str) -> String {
    format!("{}_Report_{}.pdf", kind.entity_label(), iso_date)
}

/// `<Kind>-report-<date>.xlsx`
pub fn xlsx_file_name(kind: ReportKind, iso_date: &str) -> String {
    format!("{}-report-{}.xlsx", kind.entity_label(), iso_date)
}

/// A serialized PDF report
///
/// The bytes are shared, so the download and every preview of one
/// artifact are the same buffer.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
    pub page_count: usize,
    /// Degenerate pages found while planning, for the caller to surface
    pub warnings: Vec<LayoutWarning>,
}

impl PdfArtifact {
    pub(crate) fn new(document: &Document, bytes: Vec<u8>, page_count: usize, warnings: Vec<LayoutWarning>) -> Self {
        Self {
            file_name: pdf_file_name(document.kind, &document.iso_date()),
            bytes: Arc::from(bytes),
            page_count,
            warnings,
        }
    }

    /// Download mode: write the file into `directory`
    pub async fn save_to(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        save_file(directory.as_ref(), &self.file_name, &self.bytes).await
    }

    /// Preview mode: publish the same bytes under a revocable URL
    pub fn preview(&self, registry: &PreviewRegistry) -> PreviewHandle {
        registry.open(Arc::clone(&self.bytes))
    }
}

/// A serialized XLSX workbook
#[derive(Debug, Clone)]
pub struct SpreadsheetArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub sheet_names: Vec<String>,
}

impl SpreadsheetArtifact {
    pub async fn save_to(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        save_file(directory.as_ref(), &self.file_name, &self.bytes).await
    }
}

/// Write through a temporary sibling so a failed write leaves no partial file
async fn save_file(directory: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(directory).await?;
    let target = directory.join(file_name);
    let staging = directory.join(format!(".{}.partial", file_name));

    if let Err(e) = tokio::fs::write(&staging, bytes).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e.into());
    }
    tokio::fs::rename(&staging, &target).await?;

    info!(path = %target.display(), bytes = bytes.len(), "artifact saved");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(pdf_file_name(ReportKind::Site, "2024-08-30"), "Site_Report_2024-08-30.pdf");
        assert_eq!(
            xlsx_file_name(ReportKind::Supplier, "2024-08-30"),
            "Supplier-report-2024-08-30.xlsx"
        );
    }

    #[tokio::test]
    async fn test_save_leaves_only_target() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports");
        let path = save_file(&out, "Site_Report_2024-08-30.pdf", b"%PDF").await.unwrap();

        assert_eq!(path, out.join("Site_Report_2024-08-30.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF");
        let names: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }
}
