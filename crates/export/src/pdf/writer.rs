//! PDF Writer
//!
//! File structure (header, body, cross-reference table, trailer) and the
//! document assembly for rendered report pages.
//!
//! Object numbers are allocated in a fixed order so that the same pages
//! always produce the same bytes:
//!
//! ```text
//! 1 Catalog   2 Pages   3 Info   4.. fonts   .. images   .. (page, content) per page
//! ```

use super::content::ContentStream;
use super::fonts::{encode_win_ansi, StandardFont};
use super::images::{ImageError, JpegImage};
use super::objects::{ObjectId, PdfDictionary, PdfObject, PdfStream};
use super::painter::paint_page;
use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use render_model::RenderModel;
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

/// Error type for PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;

/// Low-level writer that tracks object offsets for the xref table
pub struct PdfWriter {
    buffer: Vec<u8>,
    offsets: BTreeMap<ObjectId, usize>,
    next_id: ObjectId,
    compress: bool,
}

impl PdfWriter {
    pub fn new(compress: bool) -> Self {
        Self {
            buffer: Vec::new(),
            offsets: BTreeMap::new(),
            next_id: 1,
            compress,
        }
    }

    pub fn allocate(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn write_header(&mut self) {
        self.buffer.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker so transfer tools treat the file as binary
        self.buffer.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
    }

    fn begin_object(&mut self, id: ObjectId) {
        self.offsets.insert(id, self.buffer.len());
        self.buffer.extend_from_slice(format!("{} 0 obj\n", id).as_bytes());
    }

    fn end_object(&mut self) {
        self.buffer.extend_from_slice(b"\nendobj\n");
    }

    pub fn write_object(&mut self, id: ObjectId, object: &PdfObject) {
        self.begin_object(id);
        object.write_to(&mut self.buffer);
        self.end_object();
    }

    /// Write a stream, compressing unfiltered data when enabled
    pub fn write_stream(&mut self, id: ObjectId, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.is_filtered() {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&stream.data)?;
            stream.data = encoder.finish()?;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream.dict.insert("Length", stream.data.len() as i64);

        self.begin_object(id);
        stream.dict.write_to(&mut self.buffer);
        self.buffer.extend_from_slice(b"\nstream\n");
        self.buffer.extend_from_slice(&stream.data);
        self.buffer.extend_from_slice(b"\nendstream");
        self.end_object();
        Ok(())
    }

    /// Write the cross-reference table and trailer and return the file bytes
    pub fn finish(mut self, catalog: ObjectId, info: ObjectId) -> Result<Vec<u8>> {
        let missing: Vec<ObjectId> = (1..self.next_id)
            .filter(|id| !self.offsets.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(PdfError::InvalidDocument(format!(
                "objects allocated but never written: {:?}",
                missing
            )));
        }

        let xref_offset = self.buffer.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_id);
        for offset in self.offsets.values() {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        self.buffer.extend_from_slice(xref.as_bytes());

        let trailer = PdfDictionary::new()
            .with("Size", self.next_id as i64)
            .with("Root", PdfObject::Reference(catalog))
            .with("Info", PdfObject::Reference(info));
        self.buffer.extend_from_slice(b"trailer\n");
        trailer.write_to(&mut self.buffer);
        self.buffer
            .extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", xref_offset).as_bytes());
        Ok(self.buffer)
    }
}

/// Document information dictionary entries
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: Option<String>,
    pub creator: String,
    pub creation_date: DateTime<Utc>,
}

impl DocumentInfo {
    pub fn new(title: impl Into<String>, creation_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            author: None,
            creator: "Field Service Console".to_string(),
            creation_date,
        }
    }

    fn to_dictionary(&self) -> PdfDictionary {
        let date = format!("D:{}Z", self.creation_date.format("%Y%m%d%H%M%S"));
        let mut dict = PdfDictionary::new()
            .with("Title", PdfObject::string(encode_win_ansi(&self.title)))
            .with("Creator", PdfObject::string(encode_win_ansi(&self.creator)))
            .with("Producer", PdfObject::string(concat!("report export ", env!("CARGO_PKG_VERSION"))))
            .with("CreationDate", PdfObject::string(date.clone()))
            .with("ModDate", PdfObject::string(date));
        if let Some(author) = &self.author {
            dict.insert("Author", PdfObject::string(encode_win_ansi(author)));
        }
        dict
    }
}

/// PDF serialization options
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// Flate-compress content streams
    pub compress: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self { compress: true }
    }
}

/// Assembles rendered pages into a complete PDF file
pub struct PdfDocumentWriter {
    options: PdfOptions,
    images: BTreeMap<String, JpegImage>,
}

impl PdfDocumentWriter {
    pub fn new(options: PdfOptions) -> Self {
        Self {
            options,
            images: BTreeMap::new(),
        }
    }

    /// Register image data for draw commands that reference `resource_id`
    pub fn register_image(&mut self, resource_id: impl Into<String>, image: JpegImage) {
        self.images.insert(resource_id.into(), image);
    }

    /// Serialize the render model to PDF bytes
    pub fn write_to_bytes(&self, model: &RenderModel, info: &DocumentInfo) -> Result<Vec<u8>> {
        if model.pages.is_empty() {
            return Err(PdfError::InvalidDocument("No pages to export".to_string()));
        }

        let mut pdf = PdfWriter::new(self.options.compress);
        pdf.write_header();

        let catalog_id = pdf.allocate();
        let pages_id = pdf.allocate();
        let info_id = pdf.allocate();
        let font_ids: Vec<(StandardFont, ObjectId)> = StandardFont::ALL
            .iter()
            .map(|font| (*font, pdf.allocate()))
            .collect();

        // Image XObjects: resource names follow registration key order
        let mut image_names = BTreeMap::new();
        let mut image_ids = Vec::new();
        for (index, (resource_id, image)) in self.images.iter().enumerate() {
            let name = format!("Im{}", index + 1);
            image_names.insert(resource_id.clone(), name.clone());
            image_ids.push((name, pdf.allocate(), image));
        }

        let page_ids: Vec<(ObjectId, ObjectId)> = model
            .pages
            .iter()
            .map(|_| (pdf.allocate(), pdf.allocate()))
            .collect();

        pdf.write_object(
            catalog_id,
            &PdfDictionary::typed("Catalog")
                .with("Pages", PdfObject::Reference(pages_id))
                .into(),
        );
        pdf.write_object(
            pages_id,
            &PdfDictionary::typed("Pages")
                .with(
                    "Kids",
                    PdfObject::Array(
                        page_ids.iter().map(|(page, _)| PdfObject::Reference(*page)).collect(),
                    ),
                )
                .with("Count", page_ids.len() as i64)
                .into(),
        );
        pdf.write_object(info_id, &info.to_dictionary().into());

        for (font, id) in &font_ids {
            pdf.write_object(*id, &font.dictionary().into());
        }
        for (_, id, image) in &image_ids {
            pdf.write_stream(*id, image.to_xobject())?;
        }

        let resources = self.resources(&font_ids, &image_ids);
        for (page, (page_id, content_id)) in model.pages.iter().zip(&page_ids) {
            let content: ContentStream = paint_page(page, &image_names);
            pdf.write_stream(*content_id, PdfStream::new(PdfDictionary::new(), content.into_bytes()))?;

            let page_dict = PdfDictionary::typed("Page")
                .with("Parent", PdfObject::Reference(pages_id))
                .with("MediaBox", PdfObject::reals(&[0.0, 0.0, page.width, page.height]))
                .with("Contents", PdfObject::Reference(*content_id))
                .with("Resources", resources.clone());
            pdf.write_object(*page_id, &page_dict.into());
        }

        let bytes = pdf.finish(catalog_id, info_id)?;
        debug!(pages = model.pages.len(), bytes = bytes.len(), "pdf serialized");
        Ok(bytes)
    }

    fn resources(
        &self,
        fonts: &[(StandardFont, ObjectId)],
        images: &[(String, ObjectId, &JpegImage)],
    ) -> PdfDictionary {
        let mut font_dict = PdfDictionary::new();
        for (font, id) in fonts {
            font_dict.insert(font.resource_name(), PdfObject::Reference(*id));
        }
        let mut resources = PdfDictionary::new()
            .with("Font", font_dict)
            .with(
                "ProcSet",
                PdfObject::Array(vec![PdfObject::name("PDF"), PdfObject::name("Text"), PdfObject::name("ImageC")]),
            );
        if !images.is_empty() {
            let mut xobjects = PdfDictionary::new();
            for (name, id, _) in images {
                xobjects.insert(name.clone(), PdfObject::Reference(*id));
            }
            resources.insert("XObject", xobjects);
        }
        resources
    }
}
