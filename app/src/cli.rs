//! Command-line interface

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which artifacts to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pdf,
    Xlsx,
    All,
}

impl OutputFormat {
    pub fn includes_pdf(self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::All)
    }

    pub fn includes_xlsx(self) -> bool {
        matches!(self, OutputFormat::Xlsx | OutputFormat::All)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "report-console")]
#[command(about = "Generate paginated site and supplier reports")]
#[command(version)]
pub struct CliArgs {
    /// JSON report request: actor, kind, options and selected entities
    #[arg(value_name = "REQUEST")]
    pub request: PathBuf,

    /// Export settings file (page geometry, branding, output directory)
    #[arg(long, short = 's', value_name = "PATH", default_value = "report-settings.json")]
    pub settings: PathBuf,

    /// Write artifacts here instead of the configured output directory
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "all")]
    pub format: OutputFormat,

    /// Publish the PDF as an in-memory preview and print its URL
    #[arg(long)]
    pub preview: bool,
}

impl CliArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.preview && !self.format.includes_pdf() {
            return Err("--preview needs the PDF output (--format pdf or all)".to_string());
        }
        Ok(())
    }
}
