//! Draw command types
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and y growing downwards. Backends with a bottom-left origin flip y.

use serde::{Deserialize, Serialize};

/// A rectangle in page coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Components scaled to 0.0..=1.0
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A single line of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text to draw, already fitted to its box
    pub text: String,
    /// Left edge of the run
    pub x: f64,
    /// Baseline position
    pub y: f64,
    /// Font size in points
    pub font_size: f64,
    pub bold: bool,
    pub color: Color,
}

/// An image placed on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRenderInfo {
    /// Resource ID the backend resolves to image data
    pub resource_id: String,
    /// Bounds where the image should be drawn
    pub bounds: Rect,
}

/// Draw command types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    /// A rectangle, filled and/or stroked
    Rectangle {
        bounds: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
    /// A straight line
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
    /// A run of text
    Text(TextRun),
    /// An image
    Image(ImageRenderInfo),
}

impl DrawCommand {
    pub fn fill(bounds: Rect, color: Color) -> Self {
        DrawCommand::Rectangle {
            bounds,
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    pub fn stroke(bounds: Rect, color: Color, width: f64) -> Self {
        DrawCommand::Rectangle {
            bounds,
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    /// Create a horizontal line
    pub fn horizontal(x: f64, y: f64, length: f64, color: Color, width: f64) -> Self {
        DrawCommand::Line {
            x1: x,
            y1: y,
            x2: x + length,
            y2: y,
            color,
            width,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawCommand::Text(run) => Some(run),
            _ => None,
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRender {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl PageRender {
    /// All text runs on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.commands.iter().filter_map(DrawCommand::as_text)
    }

    /// Whether any text run on the page equals `text`
    pub fn contains_text(&self, text: &str) -> bool {
        self.texts().any(|run| run.text == text)
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageRenderInfo> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Image(image) => Some(image),
            _ => None,
        })
    }
}

/// The complete render model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub pages: Vec<PageRender>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    pub fn add_page(&mut self, page: PageRender) {
        self.pages.push(page);
    }
}
