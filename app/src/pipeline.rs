//! Request to artifacts
//!
//! The order matters: access and selection are checked before any layout
//! work, and artifacts are fully encoded in memory before anything is
//! written.

use crate::access::{authorize, Actor, GENERATE_REPORTS};
use crate::cli::{CliArgs, OutputFormat};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use export::{load_logo, PreviewRegistry, ReportExporter, SettingsLoader};
use report_builder::ReportRequest;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// A report request together with who is asking
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleRequest {
    pub actor: Actor,
    #[serde(flatten)]
    pub report: ReportRequest,
}

/// What a run produced
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub written: Vec<PathBuf>,
    pub preview_url: Option<String>,
    pub page_count: usize,
    pub warnings: Vec<String>,
}

pub async fn read_request(path: &Path) -> Result<ConsoleRequest> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading report request {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing report request {}", path.display()))
}

/// Run one report from the command line arguments
pub async fn run(args: &CliArgs, generated_at: DateTime<Utc>) -> Result<RunOutcome> {
    let settings = SettingsLoader::new(&args.settings).load().await?;
    let request = read_request(&args.request).await?;

    authorize(&request.actor, GENERATE_REPORTS)?;
    request.report.validate()?;

    let document = request.report.build_at(generated_at)?;
    info!(
        kind = %document.kind,
        sections = document.sections.len(),
        "report document built"
    );

    let logo = load_logo(settings.branding.logo.as_ref()).await;
    let exporter = ReportExporter::from_settings(&settings)
        .context("invalid page settings")?
        .with_logo(logo);
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output.directory.clone());

    let mut outcome = RunOutcome::default();

    if args.format.includes_pdf() {
        let plan = exporter.plan(&document);
        let pdf = exporter.render_pdf(&document, &plan)?;
        outcome.page_count = pdf.page_count;
        outcome.warnings = pdf.warnings.iter().map(ToString::to_string).collect();

        if args.preview {
            let registry = PreviewRegistry::new();
            let preview = pdf.preview(&registry);
            outcome.preview_url = Some(preview.url().to_string());
            println!("Preview: {} ({} bytes)", preview.url(), preview.bytes().len());
            preview.close();
        }
        outcome.written.push(pdf.save_to(&output_dir).await?);
    }

    if args.format.includes_xlsx() {
        let xlsx = exporter.export_xlsx(&document)?;
        outcome.written.push(xlsx.save_to(&output_dir).await?);
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessDenied;
    use chrono::TimeZone;
    use report_builder::BuildError;
    use tempfile::TempDir;

    const SITE_REQUEST: &str = r#"{
        "actor": {"id": "u-3", "accessType": "staff"},
        "kind": "site",
        "options": {"includeContactFields": false},
        "entities": [
            {"kind": "site", "siteName": "Harbor Point", "city": "Springfield",
             "systems": [{"systemName": "AHU-1", "systemType": "HVAC"}]}
        ]
    }"#;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 30, 12, 0, 0).unwrap()
    }

    fn args(dir: &TempDir, request: &str, extra: &[&str]) -> CliArgs {
        use clap::Parser;
        let request_path = dir.path().join("request.json");
        std::fs::write(&request_path, request).unwrap();
        let out = dir.path().join("out");
        let mut argv = vec![
            "report-console".to_string(),
            request_path.display().to_string(),
            "--settings".to_string(),
            dir.path().join("missing-settings.json").display().to_string(),
            "--output-dir".to_string(),
            out.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_writes_both_artifacts() {
        let dir = TempDir::new().unwrap();
        let outcome = run(&args(&dir, SITE_REQUEST, &["--preview"]), generated_at()).await.unwrap();

        let names: Vec<_> = outcome
            .written
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Site_Report_2024-08-30.pdf", "Site-report-2024-08-30.xlsx"]);
        assert!(outcome.written.iter().all(|path| path.exists()));
        assert!(outcome.preview_url.unwrap().starts_with("blob:report-preview/"));
        assert_eq!(outcome.page_count, 1);
    }

    #[tokio::test]
    async fn test_xlsx_only() {
        let dir = TempDir::new().unwrap();
        let outcome = run(&args(&dir, SITE_REQUEST, &["--format", "xlsx"]), generated_at()).await.unwrap();
        assert_eq!(outcome.written.len(), 1);
        assert_eq!(outcome.page_count, 0);
    }

    #[tokio::test]
    async fn test_restricted_actor_is_denied() {
        let dir = TempDir::new().unwrap();
        let request = SITE_REQUEST.replace("staff", "restricted");
        let err = run(&args(&dir, &request, &[]), generated_at()).await.unwrap_err();
        assert!(err.downcast_ref::<AccessDenied>().is_some());
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_empty_selection_stops_before_export() {
        let dir = TempDir::new().unwrap();
        let request = r#"{"actor": {"id": "u-1", "accessType": "admin"}, "kind": "supplier", "entities": []}"#;
        let err = run(&args(&dir, request, &[]), generated_at()).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<BuildError>(),
            Some(&BuildError::EmptySelection {
                kind: report_model::ReportKind::Supplier
            })
        );
        assert!(!dir.path().join("out").exists());
    }
}
