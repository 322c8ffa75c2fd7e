//! JPEG image XObjects
//!
//! JPEG data is embedded as-is with the DCTDecode filter; only the frame
//! header is read to learn the dimensions and color components.

use super::objects::{PdfDictionary, PdfObject, PdfStream};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("Not a JPEG image")]
    NotJpeg,

    #[error("JPEG frame header not found")]
    MissingFrameHeader,

    #[error("Unsupported JPEG component count: {0}")]
    UnsupportedComponents(u8),
}

/// A decoded-enough JPEG ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegImage {
    pub width: u32,
    pub height: u32,
    pub components: u8,
    pub data: Vec<u8>,
}

impl JpegImage {
    /// Read the frame header of a JPEG file
    pub fn parse(data: Vec<u8>) -> Result<Self, ImageError> {
        let (width, height, components) = read_frame_header(&data)?;
        if !matches!(components, 1 | 3 | 4) {
            return Err(ImageError::UnsupportedComponents(components));
        }
        Ok(Self {
            width,
            height,
            components,
            data,
        })
    }

    fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }

    /// Image XObject stream for this JPEG
    pub fn to_xobject(&self) -> PdfStream {
        let dict = PdfDictionary::typed("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", self.width as i64)
            .with("Height", self.height as i64)
            .with("ColorSpace", PdfObject::name(self.color_space()))
            .with("BitsPerComponent", 8i64)
            .with("Filter", PdfObject::name("DCTDecode"));
        PdfStream::new(dict, self.data.clone())
    }
}

/// Walk the marker segments up to the first start-of-frame
fn read_frame_header(data: &[u8]) -> Result<(u32, u32, u8), ImageError> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ImageError::NotJpeg);
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return Err(ImageError::MissingFrameHeader);
        }
        let marker = data[pos + 1];
        if marker == 0xFF {
            // Fill byte
            pos += 1;
            continue;
        }
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        if marker == 0xD9 || marker == 0xDA {
            break;
        }

        let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let segment = pos + 4;
            if segment + 6 > data.len() {
                break;
            }
            let height = u16::from_be_bytes([data[segment + 1], data[segment + 2]]) as u32;
            let width = u16::from_be_bytes([data[segment + 3], data[segment + 4]]) as u32;
            let components = data[segment + 5];
            return Ok((width, height, components));
        }
        pos += 2 + length;
    }
    Err(ImageError::MissingFrameHeader)
}

/// Minimal JPEG with the given frame header, for tests
#[cfg(test)]
pub(crate) fn test_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    // APP0 segment
    data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
    // SOF0: length 17, precision 8, height, width, 3 components
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(3);
    data.extend_from_slice(&[1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}
