//! Raster images prepared for embedding as PDF image XObjects.

use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegDecoder;
use image::{ExtendedColorType, ImageDecoder, ImageFormat};
use lopdf::{Dictionary, Object, Stream, dictionary};

use crate::error::{PdfOpsError, Result};

/// Codec used to decode an image, chosen from its declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageCodec {
    /// PNG, re-encoded as Flate streams with an optional soft mask.
    Png,
    /// JPEG, embedded unchanged with `DCTDecode`.
    Jpeg,
}

impl ImageCodec {
    /// PNG when the declared type mentions "png", JPEG for everything else.
    ///
    /// Types such as `image/gif` therefore go to the JPEG decoder and fail
    /// there.
    pub fn for_content_type(content_type: &str) -> Self {
        if content_type.contains("png") {
            Self::Png
        } else {
            Self::Jpeg
        }
    }
}

/// A decoded image ready to be written into a document.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    bits_per_component: i64,
    filter: &'static str,
    decode: Option<Vec<i64>>,
    data: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl EmbeddedImage {
    /// Decode `bytes` with `codec`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::FailedToEmbedImage`] if the bytes are not a
    /// valid image for the codec.
    pub fn decode(name: &str, codec: ImageCodec, bytes: &[u8]) -> Result<Self> {
        let decoded = match codec {
            ImageCodec::Png => Self::from_png(bytes),
            ImageCodec::Jpeg => Self::from_jpeg(bytes),
        };
        decoded.map_err(|err| match err {
            PdfOpsError::FailedToEmbedImage { reason, .. } => {
                PdfOpsError::failed_to_embed_image(name, reason)
            }
            other => other,
        })
    }

    fn from_jpeg(bytes: &[u8]) -> Result<Self> {
        let decoder = JpegDecoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions();

        let (color_space, decode) = match decoder.original_color_type() {
            ExtendedColorType::L8 | ExtendedColorType::L1 => ("DeviceGray", None),
            // Adobe writes CMYK JPEGs inverted.
            ExtendedColorType::Cmyk8 => ("DeviceCMYK", Some(vec![1, 0, 1, 0, 1, 0, 1, 0])),
            _ => ("DeviceRGB", None),
        };

        Ok(Self {
            width,
            height,
            color_space,
            bits_per_component: 8,
            filter: "DCTDecode",
            decode,
            data: bytes.to_vec(),
            alpha: None,
        })
    }

    fn from_png(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
        let (width, height) = (img.width(), img.height());

        let alpha = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let mask: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
            Some(deflate(&mask)?)
        } else {
            None
        };
        let rgb = img.to_rgb8();

        Ok(Self {
            width,
            height,
            color_space: "DeviceRGB",
            bits_per_component: 8,
            filter: "FlateDecode",
            decode: None,
            data: deflate(rgb.as_raw())?,
            alpha,
        })
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether a soft mask will be written alongside the image.
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Image XObject stream. `smask` is the id of an already written soft mask.
    pub(crate) fn to_stream(&self, smask: Option<lopdf::ObjectId>) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => self.bits_per_component,
            "Filter" => self.filter,
        };
        if let Some(decode) = &self.decode {
            let values: Vec<Object> = decode.iter().map(|v| Object::Integer(*v)).collect();
            dict.set("Decode", values);
        }
        if let Some(smask_id) = smask {
            dict.set("SMask", smask_id);
        }

        Stream::new(dict, self.data.clone()).with_compression(false)
    }

    /// Soft mask stream, when the image has alpha.
    pub(crate) fn to_smask_stream(&self) -> Option<Stream> {
        let alpha = self.alpha.as_ref()?;
        let dict: Dictionary = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        Some(Stream::new(dict, alpha.clone()).with_compression(false))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
