//! Per-document render context
//!
//! Everything the page header and footer need besides the page itself. The
//! context is built once per document so every page shows the same
//! generation timestamp.

use crate::Color;
use chrono::{DateTime, Utc};
use report_model::{Document, Stat};
use serde::{Deserialize, Serialize};

/// Organization details shown in the header and footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub organization_name: String,
    pub address_lines: Vec<String>,
    /// Left-aligned footer notice
    pub notice: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization_name: "Field Service Console".to_string(),
            address_lines: Vec::new(),
            notice: "Confidential - for internal use only".to_string(),
        }
    }
}

/// A logo image that has been loaded and registered with the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoInfo {
    pub resource_id: String,
    pub width_px: u32,
    pub height_px: u32,
}

impl LogoInfo {
    /// Largest size with the image's aspect ratio that fits in `max_width` x `max_height`
    pub fn fit_within(&self, max_width: f64, max_height: f64) -> (f64, f64) {
        if self.width_px == 0 || self.height_px == 0 {
            return (0.0, 0.0);
        }
        let scale = (max_width / self.width_px as f64).min(max_height / self.height_px as f64);
        (self.width_px as f64 * scale, self.height_px as f64 * scale)
    }
}

/// Colors used by the page renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub header_fill: Color,
    pub title_bar_fill: Color,
    pub title_text: Color,
    pub text: Color,
    pub muted_text: Color,
    pub heading_text: Color,
    pub table_header_fill: Color,
    pub table_header_text: Color,
    pub stripe_fill: Color,
    pub label_fill: Color,
    pub grid_stroke: Color,
    pub card_fill: Color,
    pub rule: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            header_fill: Color::rgb(241, 245, 249),
            title_bar_fill: Color::rgb(30, 58, 95),
            title_text: Color::WHITE,
            text: Color::rgb(33, 37, 41),
            muted_text: Color::rgb(108, 117, 125),
            heading_text: Color::rgb(30, 58, 95),
            table_header_fill: Color::rgb(52, 84, 122),
            table_header_text: Color::WHITE,
            stripe_fill: Color::rgb(245, 247, 250),
            label_fill: Color::rgb(233, 236, 239),
            grid_stroke: Color::rgb(206, 212, 218),
            card_fill: Color::rgb(248, 249, 250),
            rule: Color::rgb(173, 181, 189),
        }
    }
}

/// Document-level information shared by every page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub summary: Vec<Stat>,
    pub branding: Branding,
    /// `None` draws the text-only header
    pub logo: Option<LogoInfo>,
}

impl RenderContext {
    pub fn for_document(document: &Document, branding: Branding) -> Self {
        Self {
            title: document.title.clone(),
            generated_at: document.generated_at,
            summary: document.summary.clone(),
            branding,
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: Option<LogoInfo>) -> Self {
        self.logo = logo;
        self
    }

    /// Summary stats joined for the title bar, e.g. `Sites: 3 | Systems: 15`
    pub fn summary_line(&self) -> Option<String> {
        if self.summary.is_empty() {
            return None;
        }
        Some(
            self.summary
                .iter()
                .map(|stat| format!("{}: {}", stat.label, stat.count))
                .collect::<Vec<_>>()
                .join(" | "),
        )
    }

    /// Footer generation date, identical on every page
    pub fn date_label(&self) -> String {
        format!("Generated {}", self.generated_at.format("%Y-%m-%d %H:%M UTC"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use report_model::ReportKind;

    fn context() -> RenderContext {
        let document = Document::new(
            ReportKind::Site,
            Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap(),
        )
        .with_summary(vec![Stat::new("Sites", 3), Stat::new("Systems", 15)]);
        RenderContext::for_document(&document, Branding::default())
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(context().summary_line().unwrap(), "Sites: 3 | Systems: 15");
    }

    #[test]
    fn test_empty_summary_has_no_line() {
        let mut ctx = context();
        ctx.summary.clear();
        assert!(ctx.summary_line().is_none());
    }

    #[test]
    fn test_date_label_uses_generated_at() {
        assert_eq!(context().date_label(), "Generated 2024-03-09 14:05 UTC");
    }

    #[test]
    fn test_logo_fit_keeps_aspect_ratio() {
        let logo = LogoInfo {
            resource_id: "logo".to_string(),
            width_px: 400,
            height_px: 100,
        };
        assert_eq!(logo.fit_within(120.0, 44.0), (120.0, 30.0));
        assert_eq!(logo.fit_within(400.0, 20.0), (80.0, 20.0));
    }
}
