//! End-to-end export of built reports

use chrono::{DateTime, TimeZone, Utc};
use export::{PreviewRegistry, ReportExporter};
use export::pdf::PdfOptions;
use layout_engine::PageMetrics;
use render_model::{Branding, PageRenderer, RenderContext};
use report_builder::{EntityRecord, ReportRequest, SiteRecord, SupplierRecord, SystemRecord};
use report_model::{ContentBlock, Document, ReportKind, Stat};
use std::io::{Cursor, Read};
use tempfile::TempDir;

fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 30, 16, 45, 0).unwrap()
}

fn site(name: &str, systems: usize) -> EntityRecord {
    EntityRecord::Site(SiteRecord {
        site_name: name.to_string(),
        site_code: format!("{}-01", &name[..1]),
        city: "Springfield".to_string(),
        systems: (0..systems)
            .map(|i| SystemRecord {
                system_name: format!("{} Unit {}", name, i),
                system_type: "Chiller".to_string(),
                status: "Active".to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    })
}

fn supplier(name: &str, status: &str) -> EntityRecord {
    EntityRecord::Supplier(SupplierRecord {
        supplier_name: name.to_string(),
        status: status.to_string(),
        ..Default::default()
    })
}

fn build(kind: ReportKind, entities: Vec<EntityRecord>) -> Document {
    ReportRequest::new(kind, entities).build_at(generated_at()).unwrap()
}

fn sheet_row_count(xlsx: &[u8], part: &str) -> usize {
    let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).unwrap();
    let mut xml = String::new();
    archive.by_name(part).unwrap().read_to_string(&mut xml).unwrap();
    xml.matches("<row ").count()
}

#[test]
fn single_site_exports_one_page_and_one_sheet() {
    let document = build(ReportKind::Site, vec![site("Harbor Point", 0)]);
    let exporter = ReportExporter::new(PageMetrics::a4()).unwrap();

    let pdf = exporter.export_pdf(&document).unwrap();
    assert_eq!(pdf.page_count, 1);
    assert_eq!(pdf.file_name, "Site_Report_2024-08-30.pdf");

    let xlsx = exporter.export_xlsx(&document).unwrap();
    assert_eq!(xlsx.sheet_names, vec!["Site Information"]);
    assert_eq!(sheet_row_count(&xlsx.bytes, "xl/worksheets/sheet1.xml"), 2);
}

#[test]
fn combined_systems_sheet_has_every_system() {
    let document = build(
        ReportKind::Site,
        vec![site("Alpha", 5), site("Bravo", 5), site("Charlie", 5)],
    );
    let exporter = ReportExporter::new(PageMetrics::a4()).unwrap();

    let xlsx = exporter.export_xlsx(&document).unwrap();
    assert_eq!(xlsx.sheet_names, vec!["Site Information", "Systems"]);
    assert_eq!(sheet_row_count(&xlsx.bytes, "xl/worksheets/sheet1.xml"), 1 + 3);
    assert_eq!(sheet_row_count(&xlsx.bytes, "xl/worksheets/sheet2.xml"), 1 + 15);

    let pdf = exporter.export_pdf(&document).unwrap();
    assert!(pdf.warnings.is_empty());
    assert!(pdf.page_count >= 1);
}

#[test]
fn supplier_summary_counts_only_the_selection() {
    let document = build(
        ReportKind::Supplier,
        vec![supplier("Acme", "Pending"), supplier("Birch", "On Hold")],
    );
    let card = document.sections[0]
        .blocks
        .iter()
        .find_map(|block| match block {
            ContentBlock::SummaryCard(card) => Some(card),
            _ => None,
        })
        .unwrap();
    assert!(card.stats.contains(&Stat::new("Active", 0)));
    assert!(card.stats.contains(&Stat::new("Inactive", 0)));
    assert!(card.stats.contains(&Stat::new("Total", 2)));

    let exporter = ReportExporter::new(PageMetrics::a4()).unwrap();
    let plan = exporter.plan(&document);
    let renderer = PageRenderer::new(PageMetrics::a4()).unwrap();
    let context = RenderContext::for_document(&document, Branding::default());
    let page = renderer.render(&plan.pages[0], plan.total_pages, &context).unwrap();
    assert!(page.contains_text("Active"));
    assert!(page.contains_text("Inactive"));
    assert!(page.contains_text("0"));
    assert!(page.contains_text("2"));
}

#[tokio::test]
async fn preview_and_download_share_identical_bytes() {
    let document = build(ReportKind::Site, vec![site("Alpha", 40), site("Bravo", 40)]);
    let exporter = ReportExporter::new(PageMetrics::a4()).unwrap();
    let plan = exporter.plan(&document);
    assert!(plan.total_pages > 1);

    let download = exporter.render_pdf(&document, &plan).unwrap();
    let dir = TempDir::new().unwrap();
    let path = download.save_to(dir.path()).await.unwrap();

    let registry = PreviewRegistry::new();
    let preview = exporter.render_pdf(&document, &plan).unwrap().preview(&registry);

    let saved = std::fs::read(&path).unwrap();
    assert_eq!(saved.as_slice(), preview.bytes());
    assert_eq!(&*registry.fetch(preview.url()).unwrap(), saved.as_slice());

    let url = preview.url().to_string();
    preview.close();
    assert!(!registry.is_open(&url));
}

#[test]
fn repeated_exports_are_byte_identical() {
    let document = build(ReportKind::Site, vec![site("Alpha", 12), site("Bravo", 3)]);
    for compress in [true, false] {
        let exporter = ReportExporter::new(PageMetrics::letter())
            .unwrap()
            .with_pdf_options(PdfOptions { compress });
        let first = exporter.export_pdf(&document).unwrap();
        let second = exporter.export_pdf(&document).unwrap();
        assert_eq!(first.bytes, second.bytes);

        let first = exporter.export_xlsx(&document).unwrap();
        let second = exporter.export_xlsx(&document).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }
}
