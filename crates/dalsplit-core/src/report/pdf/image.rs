//! Image embedding
//!
//! Photos are embedded without re-encoding where PDF allows it:
//! - JPEG files go in as-is with the DCT filter; only the frame header is read.
//!   Adobe CMYK files (APP14 marker) store inverted ink values and get a
//!   `/Decode` array that flips them back.
//! - Opaque, non-interlaced PNG files reuse their zlib IDAT stream. PDF's
//!   Flate filter understands the PNG row predictors, so the pixel data never
//!   needs to be inflated.
//! - PNGs with an alpha channel or Adam7 interlacing are decoded and
//!   re-compressed as plain 8-bit samples. Alpha is dropped, the same as
//!   converting the photo to RGB before printing.

use std::io::Write;

use byteorder::{BigEndian, ByteOrder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Errors that can occur while reading an image for embedding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("unrecognised image format (expected JPEG or PNG)")]
    UnknownFormat,

    #[error("image data is truncated")]
    Truncated,

    #[error("corrupt image: {0}")]
    Corrupt(String),

    #[error("unsupported image: {0}")]
    Unsupported(String),

    #[error("could not re-encode image: {0}")]
    Encode(String),

    #[error("PNG chunk {chunk} CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        chunk: String,
        expected: u32,
        actual: u32,
    },
}

/// Colour model of the embedded samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    /// One channel
    Gray,
    /// Three channels
    Rgb,
    /// Four channels (JPEG only)
    Cmyk,
    /// Palette lookup into RGB triples
    Indexed {
        /// Packed RGB palette entries
        palette: Vec<u8>,
    },
}

impl ColorSpace {
    /// Samples per pixel in the stream
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::Gray | ColorSpace::Indexed { .. } => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
        }
    }
}

/// How the embedded stream is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    /// Baseline/progressive JPEG
    Dct,
    /// zlib data with PNG row predictors
    FlatePng,
    /// zlib data of raw samples
    Flate,
}

/// An image ready to be written as an XObject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfImage {
    /// Pixel width
    pub width: u32,
    /// Pixel height
    pub height: u32,
    /// Colour model
    pub color_space: ColorSpace,
    /// Bits per sample
    pub bits_per_component: u8,
    /// Stream encoding
    pub filter: ImageFilter,
    /// Encoded stream contents
    pub data: Vec<u8>,
    /// CMYK samples are stored inverted (Adobe JPEG)
    pub invert_cmyk: bool,
}

impl PdfImage {
    /// Height / width
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

/// Sniff the format and prepare the image for embedding
pub fn load_image(bytes: &[u8]) -> Result<PdfImage, ImageError> {
    if bytes.starts_with(&[0xFF, 0xD8]) {
        load_jpeg(bytes)
    } else if bytes.starts_with(&PNG_SIGNATURE) {
        load_png(bytes)
    } else {
        Err(ImageError::UnknownFormat)
    }
}

fn load_jpeg(bytes: &[u8]) -> Result<PdfImage, ImageError> {
    let mut pos = 2;
    let mut adobe = false;
    loop {
        // Skip fill bytes before the marker code
        while bytes.get(pos) == Some(&0xFF) && bytes.get(pos + 1) == Some(&0xFF) {
            pos += 1;
        }
        if bytes.get(pos) != Some(&0xFF) {
            return Err(ImageError::Corrupt(format!("expected JPEG marker at offset {pos}")));
        }
        let marker = *bytes.get(pos + 1).ok_or(ImageError::Truncated)?;

        match marker {
            // Standalone markers carry no length
            0x01 | 0xD0..=0xD8 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => {
                return Err(ImageError::Corrupt("no frame header before scan data".into()));
            }
            _ => {}
        }

        let segment = bytes.get(pos + 2..pos + 4).ok_or(ImageError::Truncated)?;
        let length = BigEndian::read_u16(segment) as usize;
        if length < 2 {
            return Err(ImageError::Corrupt(format!("bad segment length {length}")));
        }

        if marker == 0xEE {
            adobe |= bytes.get(pos + 4..pos + 9) == Some(b"Adobe".as_slice());
        }

        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let header = bytes.get(pos + 4..pos + 10).ok_or(ImageError::Truncated)?;
            let precision = header[0];
            let height = u32::from(BigEndian::read_u16(&header[1..3]));
            let width = u32::from(BigEndian::read_u16(&header[3..5]));
            let components = header[5];

            if precision != 8 {
                return Err(ImageError::Unsupported(format!("{precision}-bit JPEG")));
            }
            if width == 0 || height == 0 {
                return Err(ImageError::Corrupt("zero image dimension".into()));
            }
            let color_space = match components {
                1 => ColorSpace::Gray,
                3 => ColorSpace::Rgb,
                4 => ColorSpace::Cmyk,
                n => return Err(ImageError::Unsupported(format!("JPEG with {n} components"))),
            };

            return Ok(PdfImage {
                width,
                height,
                color_space,
                bits_per_component: 8,
                filter: ImageFilter::Dct,
                data: bytes.to_vec(),
                invert_cmyk: adobe && components == 4,
            });
        }

        pos += 2 + length;
    }
}

struct PngHeader {
    width: u32,
    height: u32,
    bit_depth: u8,
    color_type: u8,
    interlaced: bool,
}

fn load_png(bytes: &[u8]) -> Result<PdfImage, ImageError> {
    let mut pos = PNG_SIGNATURE.len();
    let mut header: Option<PngHeader> = None;
    let mut palette: Option<Vec<u8>> = None;
    let mut idat = Vec::new();

    loop {
        let len_bytes = bytes.get(pos..pos + 4).ok_or(ImageError::Truncated)?;
        let length = BigEndian::read_u32(len_bytes) as usize;
        let chunk_type = bytes.get(pos + 4..pos + 8).ok_or(ImageError::Truncated)?;
        let data_end = (pos + 8).checked_add(length).ok_or(ImageError::Truncated)?;
        let data = bytes.get(pos + 8..data_end).ok_or(ImageError::Truncated)?;
        let crc_bytes = bytes.get(data_end..data_end + 4).ok_or(ImageError::Truncated)?;

        let expected = BigEndian::read_u32(crc_bytes);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(chunk_type);
        hasher.update(data);
        let actual = hasher.finalize();
        let name = String::from_utf8_lossy(chunk_type).into_owned();
        if expected != actual {
            return Err(ImageError::CrcMismatch {
                chunk: name,
                expected,
                actual,
            });
        }

        match chunk_type {
            b"IHDR" => header = Some(parse_ihdr(data)?),
            b"PLTE" => palette = Some(data.to_vec()),
            b"IDAT" => idat.extend_from_slice(data),
            b"IEND" => break,
            _ => {}
        }
        if header.is_none() {
            return Err(ImageError::Corrupt(format!("chunk {name} before IHDR")));
        }

        pos = data_end + 4;
    }

    let header = header.ok_or_else(|| ImageError::Corrupt("missing IHDR".into()))?;
    if idat.is_empty() {
        return Err(ImageError::Corrupt("no image data".into()));
    }

    if header.interlaced || matches!(header.color_type, 4 | 6) {
        return decode_png(bytes);
    }

    let depth = header.bit_depth;
    let color_space = match (header.color_type, depth) {
        (0, 1 | 2 | 4 | 8 | 16) => ColorSpace::Gray,
        (2, 8 | 16) => ColorSpace::Rgb,
        (3, 1 | 2 | 4 | 8) => {
            let palette = palette.ok_or_else(|| ImageError::Corrupt("palette image without PLTE".into()))?;
            if palette.is_empty() || palette.len() % 3 != 0 || palette.len() > 256 * 3 {
                return Err(ImageError::Corrupt(format!("bad palette length {}", palette.len())));
            }
            ColorSpace::Indexed { palette }
        }
        (ct, d) => {
            return Err(ImageError::Corrupt(format!("invalid colour type {ct} with bit depth {d}")));
        }
    };

    Ok(PdfImage {
        width: header.width,
        height: header.height,
        color_space,
        bits_per_component: depth,
        filter: ImageFilter::FlatePng,
        data: idat,
        invert_cmyk: false,
    })
}

/// Inflate the PNG, drop alpha and re-compress the colour samples
fn decode_png(bytes: &[u8]) -> Result<PdfImage, ImageError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::Corrupt(e.to_string()))?;
    let mut pixels = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut pixels)
        .map_err(|e| ImageError::Corrupt(e.to_string()))?;
    pixels.truncate(frame.buffer_size());

    let (color_space, channels, kept) = match frame.color_type {
        png::ColorType::Grayscale => (ColorSpace::Gray, 1, 1),
        png::ColorType::GrayscaleAlpha => (ColorSpace::Gray, 2, 1),
        png::ColorType::Rgb => (ColorSpace::Rgb, 3, 3),
        png::ColorType::Rgba => (ColorSpace::Rgb, 4, 3),
        png::ColorType::Indexed => {
            return Err(ImageError::Unsupported("palette PNG after expansion".into()));
        }
    };
    let samples: Vec<u8> = if channels == kept {
        pixels
    } else {
        pixels
            .chunks_exact(channels)
            .flat_map(|px| px[..kept].iter().copied())
            .collect()
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&samples)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    let data = encoder.finish().map_err(|e| ImageError::Encode(e.to_string()))?;

    tracing::debug!(
        width = frame.width,
        height = frame.height,
        ?color_space,
        "PNG decoded for embedding"
    );

    Ok(PdfImage {
        width: frame.width,
        height: frame.height,
        color_space,
        bits_per_component: 8,
        filter: ImageFilter::Flate,
        data,
        invert_cmyk: false,
    })
}

fn parse_ihdr(data: &[u8]) -> Result<PngHeader, ImageError> {
    if data.len() != 13 {
        return Err(ImageError::Corrupt(format!("IHDR length {}", data.len())));
    }
    let width = BigEndian::read_u32(&data[0..4]);
    let height = BigEndian::read_u32(&data[4..8]);
    let (bit_depth, color_type) = (data[8], data[9]);
    let (compression, filter, interlace) = (data[10], data[11], data[12]);

    if width == 0 || height == 0 {
        return Err(ImageError::Corrupt("zero image dimension".into()));
    }
    if compression != 0 || filter != 0 {
        return Err(ImageError::Corrupt("unknown compression or filter method".into()));
    }
    if interlace > 1 {
        return Err(ImageError::Corrupt(format!("unknown interlace method {interlace}")));
    }

    Ok(PngHeader {
        width,
        height,
        bit_depth,
        color_type,
        interlaced: interlace == 1,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(kind);
        out.extend_from_slice(data);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(kind);
        hasher.update(data);
        out.extend_from_slice(&hasher.finalize().to_be_bytes());
        out
    }

    /// Build a PNG container. The IDAT payload is only inflated for alpha or
    /// interlaced images, so any bytes will do for opaque layout tests.
    pub(crate) fn png(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);

        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(chunk(b"IHDR", &ihdr));
        if color_type == 3 {
            out.extend(chunk(b"PLTE", &[0, 0, 0, 255, 255, 255]));
        }
        out.extend(chunk(b"IDAT", &[0x78, 0x9C, 0x01, 0x02]));
        out.extend(chunk(b"IEND", &[]));
        out
    }

    /// A real PNG with 8-bit samples, written by the `png` encoder
    pub(crate) fn encoded_png(width: u32, height: u32, color: png::ColorType, samples: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(samples).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    /// 1×1 Adam7-interlaced RGB PNG. A single pixel lives entirely in the
    /// first pass, so the scanline is the same as without interlacing.
    fn interlaced_rgb_pixel(rgb: [u8; 3]) -> Vec<u8> {
        let mut ihdr = Vec::new();
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        ihdr.extend_from_slice(&1u32.to_be_bytes());
        ihdr.extend_from_slice(&[8, 2, 0, 0, 1]);

        let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
        zlib.write_all(&[0, rgb[0], rgb[1], rgb[2]]).unwrap();
        let idat = zlib.finish().unwrap();

        let mut out = PNG_SIGNATURE.to_vec();
        out.extend(chunk(b"IHDR", &ihdr));
        out.extend(chunk(b"IDAT", &idat));
        out.extend(chunk(b"IEND", &[]));
        out
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        use std::io::Read;
        let mut out = Vec::new();
        flate2::read::ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    /// Minimal JPEG header: SOI, APP0, SOF0, EOI
    pub(crate) fn jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        jpeg_with_app(width, height, components, &[0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00])
    }

    pub(crate) fn jpeg_with_app(width: u16, height: u16, components: u8, app: &[u8]) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];
        out.extend_from_slice(app);
        out.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        out.extend_from_slice(&height.to_be_bytes());
        out.extend_from_slice(&width.to_be_bytes());
        out.push(components);
        out.extend_from_slice(&[0u8; 9]);
        out.extend_from_slice(&[0xFF, 0xD9]);
        out
    }

    #[test]
    fn test_jpeg_header() {
        let img = load_image(&jpeg(640, 480, 3)).unwrap();
        assert_eq!((img.width, img.height), (640, 480));
        assert_eq!(img.color_space, ColorSpace::Rgb);
        assert_eq!(img.filter, ImageFilter::Dct);
        assert!((img.aspect_ratio() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_jpeg_without_frame() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02];
        assert!(matches!(load_image(&bytes), Err(ImageError::Corrupt(_))));
        assert_eq!(load_image(&[0xFF, 0xD8, 0xFF]), Err(ImageError::Truncated));
    }

    #[test]
    fn test_png_rgb() {
        let img = load_image(&png(4, 2, 8, 2, 0)).unwrap();
        assert_eq!((img.width, img.height), (4, 2));
        assert_eq!(img.color_space, ColorSpace::Rgb);
        assert_eq!(img.filter, ImageFilter::FlatePng);
        assert_eq!(img.data, vec![0x78, 0x9C, 0x01, 0x02]);
    }

    #[test]
    fn test_png_palette() {
        let img = load_image(&png(1, 1, 8, 3, 0)).unwrap();
        assert_eq!(
            img.color_space,
            ColorSpace::Indexed {
                palette: vec![0, 0, 0, 255, 255, 255]
            }
        );
        assert_eq!(img.color_space.components(), 1);
    }

    #[test]
    fn test_png_rejections() {
        assert!(matches!(load_image(&png(1, 1, 3, 2, 0)), Err(ImageError::Corrupt(_))));
        assert!(matches!(load_image(&png(1, 1, 8, 2, 2)), Err(ImageError::Corrupt(_))));
        // Alpha images are inflated, so a broken zlib stream surfaces
        assert!(matches!(load_image(&png(1, 1, 8, 6, 0)), Err(ImageError::Corrupt(_))));
    }

    #[test]
    fn test_png_rgba_drops_alpha() {
        let samples = [255, 0, 0, 255, 0, 0, 255, 0];
        let img = load_image(&encoded_png(2, 1, png::ColorType::Rgba, &samples)).unwrap();
        assert_eq!((img.width, img.height), (2, 1));
        assert_eq!(img.color_space, ColorSpace::Rgb);
        assert_eq!(img.bits_per_component, 8);
        assert_eq!(img.filter, ImageFilter::Flate);
        assert_eq!(inflate(&img.data), vec![255, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn test_png_gray_alpha() {
        let img = load_image(&encoded_png(2, 1, png::ColorType::GrayscaleAlpha, &[10, 255, 200, 0])).unwrap();
        assert_eq!(img.color_space, ColorSpace::Gray);
        assert_eq!(inflate(&img.data), vec![10, 200]);
    }

    #[test]
    fn test_png_interlaced() {
        let img = load_image(&interlaced_rgb_pixel([1, 2, 3])).unwrap();
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(img.color_space, ColorSpace::Rgb);
        assert_eq!(img.filter, ImageFilter::Flate);
        assert_eq!(inflate(&img.data), vec![1, 2, 3]);
    }

    #[test]
    fn test_adobe_cmyk_jpeg_is_inverted() {
        let adobe = [
            0xFF, 0xEE, 0x00, 0x0E, b'A', b'd', b'o', b'b', b'e', 0x00, 0x64, 0x00, 0x00, 0x00, 0x00, 0x02,
        ];
        let img = load_image(&jpeg_with_app(10, 10, 4, &adobe)).unwrap();
        assert_eq!(img.color_space, ColorSpace::Cmyk);
        assert!(img.invert_cmyk);

        let plain = load_image(&jpeg(10, 10, 4)).unwrap();
        assert!(!plain.invert_cmyk);
        let rgb = load_image(&jpeg_with_app(10, 10, 3, &adobe)).unwrap();
        assert!(!rgb.invert_cmyk);
    }

    #[test]
    fn test_png_crc_checked() {
        let mut bytes = png(2, 2, 8, 0, 0);
        // flip a bit in the IHDR width
        bytes[PNG_SIGNATURE.len() + 8 + 3] ^= 0x01;
        assert!(matches!(load_image(&bytes), Err(ImageError::CrcMismatch { .. })));
    }

    #[test]
    fn test_unknown_format() {
        assert_eq!(load_image(b"GIF89a"), Err(ImageError::UnknownFormat));
    }
}
