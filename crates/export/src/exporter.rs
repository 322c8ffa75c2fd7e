//! Report export pipeline
//!
//! `plan -> render -> serialize` for PDF, and a direct projection of the
//! content model for XLSX. A plan can be computed once and passed to
//! [`ReportExporter::render_pdf`] any number of times; the bytes depend only
//! on the document, the plan and the exporter's configuration.

use crate::artifact::{xlsx_file_name, PdfArtifact, SpreadsheetArtifact};
use crate::assets::{LoadedLogo, LOGO_RESOURCE_ID};
use crate::pdf::{DocumentInfo, PdfDocumentWriter, PdfOptions};
use crate::settings::ExportSettings;
use crate::xlsx::{write_workbook, Workbook};
use crate::Result;
use layout_engine::{PageMetrics, PagePlan, Paginator};
use render_model::{Branding, PageRenderer, RenderContext};
use report_model::Document;
use tracing::{info, warn};

/// Turns documents into PDF and XLSX artifacts
pub struct ReportExporter {
    paginator: Paginator,
    renderer: PageRenderer,
    branding: Branding,
    pdf_options: PdfOptions,
    logo: Option<LoadedLogo>,
}

impl ReportExporter {
    /// Exporter with default branding and no logo
    pub fn new(metrics: PageMetrics) -> Result<Self> {
        let renderer = PageRenderer::new(metrics.clone())?;
        Ok(Self {
            paginator: Paginator::new(metrics),
            renderer,
            branding: Branding::default(),
            pdf_options: PdfOptions::default(),
            logo: None,
        })
    }

    /// Exporter configured from settings. The logo is loaded separately.
    pub fn from_settings(settings: &ExportSettings) -> Result<Self> {
        Ok(Self::new(settings.page_metrics()?)?
            .with_branding(settings.branding.to_branding())
            .with_pdf_options(settings.pdf_options()))
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    pub fn with_pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf_options = options;
        self
    }

    pub fn with_logo(mut self, logo: Option<LoadedLogo>) -> Self {
        self.logo = logo;
        self
    }

    pub fn metrics(&self) -> &PageMetrics {
        self.paginator.metrics()
    }

    /// Decide page breaks for a document
    pub fn plan(&self, document: &Document) -> PagePlan {
        let plan = self.paginator.plan(document);
        for warning in &plan.warnings {
            warn!(%warning, "report has an oversized block");
        }
        plan
    }

    /// Render and serialize a planned document
    pub fn render_pdf(&self, document: &Document, plan: &PagePlan) -> Result<PdfArtifact> {
        let context = RenderContext::for_document(document, self.branding.clone())
            .with_logo(self.logo.as_ref().map(|logo| logo.info.clone()));
        let model = self.renderer.render_plan(plan, &context)?;

        let mut writer = PdfDocumentWriter::new(self.pdf_options.clone());
        if let Some(logo) = &self.logo {
            writer.register_image(LOGO_RESOURCE_ID, logo.image.clone());
        }
        let mut info = DocumentInfo::new(document.title.clone(), document.generated_at);
        info.author = Some(self.branding.organization_name.clone());
        let bytes = writer.write_to_bytes(&model, &info)?;

        info!(
            kind = %document.kind,
            pages = plan.total_pages,
            bytes = bytes.len(),
            "pdf report exported"
        );
        Ok(PdfArtifact::new(document, bytes, plan.total_pages, plan.warnings.clone()))
    }

    /// Plan, render and serialize in one step
    pub fn export_pdf(&self, document: &Document) -> Result<PdfArtifact> {
        let plan = self.plan(document);
        self.render_pdf(document, &plan)
    }

    /// Project the document into a workbook and serialize it
    pub fn export_xlsx(&self, document: &Document) -> Result<SpreadsheetArtifact> {
        let workbook = Workbook::from_document(document);
        let bytes = write_workbook(&workbook, document.generated_at)?;
        info!(
            kind = %document.kind,
            sheets = workbook.sheets.len(),
            bytes = bytes.len(),
            "spreadsheet report exported"
        );
        Ok(SpreadsheetArtifact {
            file_name: xlsx_file_name(document.kind, &document.iso_date()),
            bytes,
            sheet_names: workbook.sheets.into_iter().map(|sheet| sheet.name).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_jpeg;
    use crate::pdf::JpegImage;
    use chrono::{TimeZone, Utc};
    use render_model::LogoInfo;
    use report_model::{ContentBlock, KeyValueRow, ReportKind, Section};

    fn document() -> Document {
        Document::new(ReportKind::Site, Utc.with_ymd_and_hms(2024, 8, 30, 10, 0, 0).unwrap()).with_section(
            Section::new(
                "North Yard",
                vec![
                    ContentBlock::heading("North Yard", 2),
                    ContentBlock::key_value(vec![KeyValueRow::new("Site Name", "North Yard")]),
                ],
            ),
        )
    }

    fn logo() -> LoadedLogo {
        let image = JpegImage::parse(test_jpeg(300, 100)).unwrap();
        LoadedLogo {
            info: LogoInfo {
                resource_id: LOGO_RESOURCE_ID.to_string(),
                width_px: image.width,
                height_px: image.height,
            },
            image,
        }
    }

    fn as_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    #[test]
    fn test_pdf_file_name_and_pages() {
        let exporter = ReportExporter::new(PageMetrics::a4()).unwrap();
        let artifact = exporter.export_pdf(&document()).unwrap();
        assert_eq!(artifact.file_name, "Site_Report_2024-08-30.pdf");
        assert_eq!(artifact.page_count, 1);
        assert!(artifact.warnings.is_empty());
        assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_logo_is_embedded_only_when_loaded() {
        let plain = ReportExporter::new(PageMetrics::a4()).unwrap();
        assert!(!as_text(&plain.export_pdf(&document()).unwrap().bytes).contains("/DCTDecode"));

        let branded = ReportExporter::new(PageMetrics::a4()).unwrap().with_logo(Some(logo()));
        assert!(as_text(&branded.export_pdf(&document()).unwrap().bytes).contains("/DCTDecode"));
    }

    #[test]
    fn test_uncompressed_pdf_shows_text() {
        let exporter = ReportExporter::new(PageMetrics::a4())
            .unwrap()
            .with_pdf_options(PdfOptions { compress: false });
        let text = as_text(&exporter.export_pdf(&document()).unwrap().bytes);
        assert!(text.contains("(North Yard) Tj"));
        assert!(text.contains("(Page 1 of 1) Tj"));
    }

    #[test]
    fn test_xlsx_artifact() {
        let exporter = ReportExporter::new(PageMetrics::a4()).unwrap();
        let artifact = exporter.export_xlsx(&document()).unwrap();
        assert_eq!(artifact.file_name, "Site-report-2024-08-30.xlsx");
        assert_eq!(artifact.sheet_names, vec!["Site Information"]);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = ExportSettings::default();
        settings.page.margin_left = 400.0;
        settings.page.margin_right = 400.0;
        assert!(ReportExporter::from_settings(&settings).is_err());
    }
}
