//! PDF Content Stream Generation
//!
//! Builder for the page-description operators used by reports:
//!
//! - `q`/`Q`: save/restore graphics state
//! - `cm`: concatenate transformation matrix
//! - `w`: line width
//! - `rg`/`RG`: RGB fill/stroke color
//! - `re`, `m`, `l`: path construction
//! - `f`, `S`, `B`: fill, stroke, fill and stroke
//! - `BT`/`ET`, `Tf`, `Tm`, `Tj`: text
//! - `Do`: paint an XObject

use super::objects::{format_number, write_literal};

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write numeric operands followed by an operator
    fn op(&mut self, operands: &[f64], operator: &str) -> &mut Self {
        for operand in operands {
            self.data.extend_from_slice(format_number(*operand).as_bytes());
            self.data.push(b' ');
        }
        self.data.extend_from_slice(operator.as_bytes());
        self.data.push(b'\n');
        self
    }

    // =========================================================================
    // Graphics State
    // =========================================================================

    pub fn save_state(&mut self) -> &mut Self {
        self.op(&[], "q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op(&[], "Q")
    }

    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(&[a, b, c, d, e, f], "cm")
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(&[width], "w")
    }

    /// Components in 0.0..=1.0
    pub fn set_fill_rgb(&mut self, (r, g, b): (f64, f64, f64)) -> &mut Self {
        self.op(&[r, g, b], "rg")
    }

    pub fn set_stroke_rgb(&mut self, (r, g, b): (f64, f64, f64)) -> &mut Self {
        self.op(&[r, g, b], "RG")
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(&[x, y, width, height], "re")
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "m")
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[x, y], "l")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op(&[], "f")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op(&[], "S")
    }

    pub fn fill_and_stroke(&mut self) -> &mut Self {
        self.op(&[], "B")
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn begin_text(&mut self) -> &mut Self {
        self.op(&[], "BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op(&[], "ET")
    }

    pub fn set_font(&mut self, resource: &str, size: f64) -> &mut Self {
        self.data.push(b'/');
        self.data.extend_from_slice(resource.as_bytes());
        self.data.push(b' ');
        self.op(&[size], "Tf")
    }

    /// Position the text cursor at (x, y)
    pub fn set_text_position(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(&[1.0, 0.0, 0.0, 1.0, x, y], "Tm")
    }

    /// Show already-encoded text bytes
    pub fn show_text(&mut self, encoded: &[u8]) -> &mut Self {
        write_literal(encoded, &mut self.data);
        self.data.push(b' ');
        self.op(&[], "Tj")
    }

    // =========================================================================
    // XObjects
    // =========================================================================

    pub fn draw_xobject(&mut self, resource: &str) -> &mut Self {
        self.data.push(b'/');
        self.data.extend_from_slice(resource.as_bytes());
        self.data.push(b' ');
        self.op(&[], "Do")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(stream: &ContentStream) -> String {
        String::from_utf8(stream.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_filled_rect() {
        let mut stream = ContentStream::new();
        stream
            .save_state()
            .set_fill_rgb((1.0, 0.5, 0.0))
            .rect(40.0, 700.5, 100.0, 20.0)
            .fill()
            .restore_state();
        assert_eq!(text(&stream), "q\n1 0.5 0 rg\n40 700.5 100 20 re\nf\nQ\n");
    }

    #[test]
    fn test_text_object() {
        let mut stream = ContentStream::new();
        stream
            .begin_text()
            .set_font("F2", 12.0)
            .set_text_position(40.0, 800.0)
            .show_text(b"Page (1)")
            .end_text();
        assert_eq!(
            text(&stream),
            "BT\n/F2 12 Tf\n1 0 0 1 40 800 Tm\n(Page \\(1\\)) Tj\nET\n"
        );
    }

    #[test]
    fn test_xobject() {
        let mut stream = ContentStream::new();
        stream.transform(120.0, 0.0, 0.0, 40.0, 40.0, 790.0).draw_xobject("Im1");
        assert_eq!(text(&stream), "120 0 0 40 40 790 cm\n/Im1 Do\n");
    }
}
