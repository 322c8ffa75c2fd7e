//! Fixed font metric table
//!
//! Advance widths of the standard Helvetica faces for printable ASCII, in
//! 1/1000 of the font size. Characters outside the table measure as the
//! width of a digit.

use std::borrow::Cow;

const FIRST_CHAR: u32 = 32;
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const ELLIPSIS: &str = "...";

/// Advance width of one character in 1/1000 em
pub fn char_width(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    (c as u32)
        .checked_sub(FIRST_CHAR)
        .and_then(|index| table.get(index as usize))
        .copied()
        .unwrap_or(FALLBACK_WIDTH)
}

/// Width of a single line of text in points
pub fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, bold) as u32).sum();
    units as f32 * font_size / 1000.0
}

/// Shorten text to fit `max_width`, ending it with an ellipsis
///
/// Returns the text unchanged when it already fits, and an empty string
/// when not even the ellipsis fits.
pub fn fit_text(text: &str, max_width: f32, font_size: f32, bold: bool) -> Cow<'_, str> {
    if text_width(text, font_size, bold) <= max_width {
        return Cow::Borrowed(text);
    }

    let budget = max_width - text_width(ELLIPSIS, font_size, bold);
    if budget < 0.0 {
        return Cow::Borrowed("");
    }

    let mut used = 0.0;
    let mut end = 0;
    for (index, c) in text.char_indices() {
        let advance = char_width(c, bold) as f32 * font_size / 1000.0;
        if used + advance > budget {
            break;
        }
        used += advance;
        end = index + c.len_utf8();
    }

    let mut fitted = text[..end].trim_end().to_string();
    fitted.push_str(ELLIPSIS);
    Cow::Owned(fitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(char_width(' ', false), 278);
        assert_eq!(char_width('W', false), 944);
        assert_eq!(char_width('i', false), 222);
        assert_eq!(char_width('i', true), 278);
        assert_eq!(char_width('~', true), 584);
    }

    #[test]
    fn test_fallback_width() {
        assert_eq!(char_width('\u{e9}', false), FALLBACK_WIDTH);
        assert_eq!(char_width('\t', true), FALLBACK_WIDTH);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w10 = text_width("Page 1 of 2", 10.0, false);
        let w20 = text_width("Page 1 of 2", 20.0, false);
        assert!((w20 - 2.0 * w10).abs() < 0.001);
        // "11" at 10pt is two digits
        assert!((text_width("11", 10.0, false) - 11.12).abs() < 0.001);
    }

    #[test]
    fn test_fit_text_keeps_short_text() {
        assert_eq!(fit_text("Pump", 100.0, 9.0, false), "Pump");
    }

    #[test]
    fn test_fit_text_truncates_with_ellipsis() {
        let long = "Centrifugal chilled water pump assembly";
        let fitted = fit_text(long, 60.0, 9.0, false);
        assert!(fitted.ends_with("..."));
        assert!(text_width(&fitted, 9.0, false) <= 60.0);
        assert!(long.starts_with(fitted.trim_end_matches("...")));
    }

    #[test]
    fn test_fit_text_too_narrow() {
        assert_eq!(fit_text("Anything", 2.0, 9.0, false), "");
    }
}
