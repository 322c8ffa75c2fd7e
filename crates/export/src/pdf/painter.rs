//! Draw commands to PDF content streams
//!
//! Draw commands use a top-left origin; PDF user space starts at the
//! bottom-left, so every y is flipped against the page height.

use super::content::ContentStream;
use super::fonts::{encode_win_ansi, StandardFont};
use render_model::{DrawCommand, PageRender, Rect};
use std::collections::BTreeMap;
use tracing::debug;

/// Paint one rendered page
///
/// `images` maps render resource IDs to XObject resource names.
pub fn paint_page(page: &PageRender, images: &BTreeMap<String, String>) -> ContentStream {
    let mut stream = ContentStream::new();
    let flip = |y: f64| page.height - y;

    for command in &page.commands {
        match command {
            DrawCommand::Rectangle {
                bounds,
                fill,
                stroke,
                stroke_width,
            } => {
                if fill.is_none() && stroke.is_none() {
                    continue;
                }
                stream.save_state();
                if let Some(color) = fill {
                    stream.set_fill_rgb(color.to_unit());
                }
                if let Some(color) = stroke {
                    stream.set_stroke_rgb(color.to_unit()).set_line_width(*stroke_width);
                }
                stream.rect(bounds.x, flip(bounds.bottom()), bounds.width, bounds.height);
                match (fill, stroke) {
                    (Some(_), Some(_)) => stream.fill_and_stroke(),
                    (Some(_), None) => stream.fill(),
                    _ => stream.stroke(),
                };
                stream.restore_state();
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                stream
                    .save_state()
                    .set_stroke_rgb(color.to_unit())
                    .set_line_width(*width)
                    .move_to(*x1, flip(*y1))
                    .line_to(*x2, flip(*y2))
                    .stroke()
                    .restore_state();
            }
            DrawCommand::Text(run) => {
                let font = StandardFont::for_weight(run.bold);
                stream
                    .begin_text()
                    .set_fill_rgb(run.color.to_unit())
                    .set_font(font.resource_name(), run.font_size)
                    .set_text_position(run.x, flip(run.y))
                    .show_text(&encode_win_ansi(&run.text))
                    .end_text();
            }
            DrawCommand::Image(image) => match images.get(&image.resource_id) {
                Some(name) => paint_image(&mut stream, name, &image.bounds, page.height),
                None => debug!(resource = %image.resource_id, "image resource not registered, skipped"),
            },
        }
    }
    stream
}

fn paint_image(stream: &mut ContentStream, name: &str, bounds: &Rect, page_height: f64) {
    stream
        .save_state()
        .transform(
            bounds.width,
            0.0,
            0.0,
            bounds.height,
            bounds.x,
            page_height - bounds.bottom(),
        )
        .draw_xobject(name)
        .restore_state();
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_model::{Color, ImageRenderInfo, TextRun};

    fn page(commands: Vec<DrawCommand>) -> PageRender {
        PageRender {
            page_number: 1,
            width: 600.0,
            height: 800.0,
            commands,
        }
    }

    fn painted(page: &PageRender, images: &BTreeMap<String, String>) -> String {
        String::from_utf8(paint_page(page, images).into_bytes()).unwrap()
    }

    #[test]
    fn test_rect_is_flipped() {
        let page = page(vec![DrawCommand::fill(Rect::new(40.0, 100.0, 200.0, 20.0), Color::BLACK)]);
        let out = painted(&page, &BTreeMap::new());
        assert!(out.contains("40 680 200 20 re\nf\n"));
    }

    #[test]
    fn test_text_uses_weight_font() {
        let page = page(vec![DrawCommand::Text(TextRun {
            text: "Total".to_string(),
            x: 50.0,
            y: 110.0,
            font_size: 9.0,
            bold: true,
            color: Color::BLACK,
        })]);
        let out = painted(&page, &BTreeMap::new());
        assert!(out.contains("/F2 9 Tf\n1 0 0 1 50 690 Tm\n(Total) Tj\n"));
    }

    #[test]
    fn test_unregistered_image_skipped() {
        let image = DrawCommand::Image(ImageRenderInfo {
            resource_id: "logo".to_string(),
            bounds: Rect::new(40.0, 8.0, 120.0, 40.0),
        });
        assert!(painted(&page(vec![image.clone()]), &BTreeMap::new()).is_empty());

        let images = BTreeMap::from([("logo".to_string(), "Im1".to_string())]);
        let out = painted(&page(vec![image]), &images);
        assert!(out.contains("120 0 0 40 40 752 cm\n/Im1 Do\n"));
    }
}
