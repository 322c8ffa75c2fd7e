//! XLSX Writer
//!
//! Writes a [`Workbook`] as an Office Open XML spreadsheet package. Parts
//! are written in a fixed order with fixed entry timestamps, so the same
//! workbook always produces the same bytes.

use super::error::{XlsxError, XlsxResult};
use super::workbook::{column_letter, Workbook, Worksheet};
use chrono::{DateTime, Utc};
use quick_xml::escape::escape;
use std::fmt::Write as _;
use std::io::{Cursor, Seek, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Relationship type URIs
mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
}

/// Style index of the bold header cell format in styles.xml
const HEADER_STYLE: u32 = 1;
const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 60;

/// Main XLSX writer
pub struct XlsxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    created: DateTime<Utc>,
}

impl<W: Write + Seek> XlsxWriter<W> {
    /// `created` is recorded in the core properties part
    pub fn new(writer: W, created: DateTime<Utc>) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            created,
        }
    }

    /// Write a complete workbook and finish the archive
    pub fn write(mut self, workbook: &Workbook) -> XlsxResult<W> {
        if workbook.sheets.is_empty() {
            return Err(XlsxError::InvalidWorkbook("no worksheets".to_string()));
        }

        self.write_file("[Content_Types].xml", &content_types_xml(workbook.sheets.len()))?;
        self.write_file("_rels/.rels", &root_rels_xml())?;
        self.write_file("docProps/core.xml", &core_properties_xml(&self.created))?;
        self.write_file("xl/workbook.xml", &workbook_xml(workbook))?;
        self.write_file("xl/_rels/workbook.xml.rels", &workbook_rels_xml(workbook.sheets.len()))?;
        self.write_file("xl/styles.xml", STYLES_XML)?;
        for (index, sheet) in workbook.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", index + 1);
            self.write_file(&path, &worksheet_xml(sheet))?;
            debug!(sheet = %sheet.name, rows = sheet.rows.len(), "worksheet written");
        }

        Ok(self.zip.finish()?)
    }

    fn write_file(&mut self, path: &str, content: &str) -> XlsxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Serialize a workbook to XLSX bytes
pub fn write_workbook(workbook: &Workbook, created: DateTime<Utc>) -> XlsxResult<Vec<u8>> {
    let cursor = XlsxWriter::new(Cursor::new(Vec::new()), created).write(workbook)?;
    Ok(cursor.into_inner())
}

// =============================================================================
// Package parts
// =============================================================================

fn content_types_xml(sheet_count: usize) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    for index in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            index
        );
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}" Target="xl/workbook.xml"/><Relationship Id="rId2" Type="{}" Target="docProps/core.xml"/></Relationships>"#,
        XML_DECLARATION,
        PACKAGE_REL_NS,
        relationship_types::OFFICE_DOCUMENT,
        relationship_types::CORE_PROPERTIES
    )
}

fn core_properties_xml(created: &DateTime<Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        concat!(
            "{}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        XML_DECLARATION, stamp, stamp
    )
}

fn workbook_xml(workbook: &Workbook) -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = write!(xml, r#"<workbook xmlns="{}" xmlns:r="{}"><sheets>"#, SHEET_NS, REL_NS);
    for (index, sheet) in workbook.sheets.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            xml_text(&sheet.name),
            index + 1,
            index + 1
        );
    }
    xml.push_str("</sheets></workbook>");
    xml
}

/// Worksheets take rId1..rIdN, styles follows them
fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, PACKAGE_REL_NS);
    for index in 1..=sheet_count {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}" Target="worksheets/sheet{}.xml"/>"#,
            index,
            relationship_types::WORKSHEET,
            index
        );
    }
    let _ = write!(
        xml,
        r#"<Relationship Id="rId{}" Type="{}" Target="styles.xml"/>"#,
        sheet_count + 1,
        relationship_types::STYLES
    );
    xml.push_str("</Relationships>");
    xml
}

/// Two cell formats: 0 is the default, 1 is bold with a light fill
const STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill>"#,
    r#"<fill><patternFill patternType="solid"><fgColor rgb="FFE2E8F0"/><bgColor indexed="64"/></patternFill></fill></fills>"#,
    r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#,
    r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
    r#"<cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
    r#"<xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1"/></cellXfs>"#,
    r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
    "</styleSheet>"
);

fn worksheet_xml(sheet: &Worksheet) -> String {
    let mut xml = String::from(XML_DECLARATION);
    let _ = write!(xml, r#"<worksheet xmlns="{}">"#, SHEET_NS);
    xml.push_str(
        r#"<sheetViews><sheetView workbookViewId="0"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/></sheetView></sheetViews>"#,
    );

    if !sheet.columns.is_empty() {
        xml.push_str("<cols>");
        for (index, width) in column_widths(sheet).into_iter().enumerate() {
            let _ = write!(
                xml,
                r#"<col min="{}" max="{}" width="{}" customWidth="1"/>"#,
                index + 1,
                index + 1,
                width
            );
        }
        xml.push_str("</cols>");
    }

    xml.push_str("<sheetData>");
    write_row(&mut xml, 1, &sheet.columns, Some(HEADER_STYLE));
    for (index, row) in sheet.rows.iter().enumerate() {
        write_row(&mut xml, index + 2, row, None);
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn write_row(xml: &mut String, number: usize, cells: &[String], style: Option<u32>) {
    let _ = write!(xml, r#"<row r="{}">"#, number);
    for (index, value) in cells.iter().enumerate() {
        let _ = write!(xml, r#"<c r="{}{}" t="inlineStr""#, column_letter(index), number);
        if let Some(style) = style {
            let _ = write!(xml, r#" s="{}""#, style);
        }
        let _ = write!(
            xml,
            r#"><is><t xml:space="preserve">{}</t></is></c>"#,
            xml_text(value)
        );
    }
    xml.push_str("</row>");
}

/// Escape text content, dropping characters XML 1.0 does not allow
fn xml_text(value: &str) -> String {
    let allowed = |c: char| {
        matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
    };
    if value.chars().all(allowed) {
        return escape(value).into_owned();
    }
    let cleaned: String = value.chars().filter(|c| allowed(*c)).collect();
    escape(cleaned.as_str()).into_owned()
}

/// Character-count widths, clamped to a readable range
fn column_widths(sheet: &Worksheet) -> Vec<usize> {
    (0..sheet.columns.len())
        .map(|index| {
            let widest = std::iter::once(&sheet.columns[index])
                .chain(sheet.rows.iter().filter_map(|row| row.get(index)))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            (widest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}
