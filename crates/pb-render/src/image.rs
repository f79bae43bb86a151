//! PNG `data:` URL encoding for snapshots and exported drawings.
//!
//! Snapshots are persisted as self-contained `data:image/png;base64,...`
//! strings, the same form a browser canvas produces with `toDataURL()`, so a
//! stored whiteboard can be embedded straight into a note as an `<img>`.

use crate::raster::Raster;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("PNG decoding failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("not a PNG data URL")]
    NotPngDataUrl,

    #[error("unsupported PNG color type {0:?}")]
    UnsupportedColor(png::ColorType),
}

/// Encode as an 8-bit RGBA PNG.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&raster.to_rgba())?;
    writer.finish()?;
    Ok(out)
}

/// Decode any 8/16-bit PNG into an RGBA raster.
pub fn decode_png(bytes: &[u8]) -> Result<Raster, ImageError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        other => return Err(ImageError::UnsupportedColor(other)),
    };

    Raster::from_rgba(info.width, info.height, &rgba).ok_or(ImageError::NotPngDataUrl)
}

pub fn to_data_url(raster: &Raster) -> Result<String, ImageError> {
    let png = encode_png(raster)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}

pub fn from_data_url(url: &str) -> Result<Raster, ImageError> {
    let payload = url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(ImageError::NotPngDataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    decode_png(&bytes)
}
