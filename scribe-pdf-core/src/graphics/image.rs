//! Raw-sample images for PDF generation
//!
//! Samples are stored uncompressed, row by row. When the writer compresses
//! streams, each image is first run through the adaptive PNG predictor and
//! then Flate-encoded, with matching `/DecodeParms`.

use crate::error::{PdfError, Result};
use crate::filters::predictor::PredictorParams;
use crate::objects::{Dictionary, Object, Stream};

/// Color spaces for images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale
    DeviceGray,
    /// RGB color
    DeviceRGB,
    /// CMYK color
    DeviceCMYK,
}

impl ColorSpace {
    pub fn components(&self) -> usize {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// Represents an image that can be embedded in a PDF
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    color_space: ColorSpace,
    bits_per_component: u8,
    bytes_per_row: usize,
    samples: Vec<u8>,
}

impl Image {
    /// Wraps raw samples, checking that they cover exactly
    /// `height` rows of the declared geometry.
    pub fn from_samples(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        bits_per_component: u8,
        samples: Vec<u8>,
    ) -> Result<Self> {
        if !matches!(bits_per_component, 1 | 2 | 4 | 8 | 16) {
            return Err(PdfError::InvalidImage(format!(
                "unsupported bits per component: {bits_per_component}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "empty image: {width}x{height}"
            )));
        }

        let too_large = || PdfError::InvalidImage(format!("image too large: {width}x{height}"));
        let bytes_per_row = (width as usize)
            .checked_mul(color_space.components() * bits_per_component as usize)
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(too_large)?;
        let expected = bytes_per_row
            .checked_mul(height as usize)
            .ok_or_else(too_large)?;
        if samples.len() != expected {
            return Err(PdfError::InvalidImage(format!(
                "expected {expected} sample bytes, got {}",
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            color_space,
            bits_per_component,
            bytes_per_row,
            samples,
        })
    }

    pub fn gray(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        Self::from_samples(width, height, ColorSpace::DeviceGray, 8, samples)
    }

    pub fn rgb(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        Self::from_samples(width, height, ColorSpace::DeviceRGB, 8, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// `/DecodeParms` for predicting this image's rows with the given
    /// `/Predictor` value.
    ///
    /// The predictor works on bytes, so each row is described as
    /// `bytes_per_row` one-byte samples. Readers then take the left and
    /// upper-left neighbours one byte back, exactly as the encoder did. The
    /// image dictionary still carries the real color space and depth.
    pub fn predictor_params(&self, predictor: i64) -> PredictorParams {
        PredictorParams {
            predictor,
            colors: 1,
            bits_per_component: 8,
            columns: self.bytes_per_row,
        }
    }

    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    fn dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name("XObject".to_string()));
        dict.set("Subtype", Object::Name("Image".to_string()));
        dict.set("Width", Object::Integer(self.width as i64));
        dict.set("Height", Object::Integer(self.height as i64));
        dict.set(
            "ColorSpace",
            Object::Name(self.color_space.pdf_name().to_string()),
        );
        dict.set(
            "BitsPerComponent",
            Object::Integer(self.bits_per_component as i64),
        );
        dict
    }

    /// Builds the image XObject stream.
    pub fn to_stream(&self, compress: bool) -> Result<Stream> {
        let mut stream = Stream::with_dictionary(self.dictionary(), self.samples.clone());

        #[cfg(feature = "compression")]
        if compress {
            stream.apply_png_predictor(&self.predictor_params(15))?;
            stream.compress_flate()?;
        }
        #[cfg(not(feature = "compression"))]
        let _ = compress;

        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_space_components() {
        assert_eq!(ColorSpace::DeviceGray.components(), 1);
        assert_eq!(ColorSpace::DeviceRGB.components(), 3);
        assert_eq!(ColorSpace::DeviceCMYK.components(), 4);
        assert_eq!(ColorSpace::DeviceCMYK.pdf_name(), "DeviceCMYK");
    }

    #[test]
    fn test_from_samples_checks_length() {
        assert!(Image::rgb(2, 2, vec![0; 12]).is_ok());
        assert!(Image::rgb(2, 2, vec![0; 11]).is_err());
        assert!(Image::gray(0, 2, Vec::new()).is_err());
        assert!(Image::from_samples(1, 1, ColorSpace::DeviceGray, 3, vec![0]).is_err());
    }

    #[test]
    fn test_sub_byte_rows_round_up() {
        // 10 one-bit samples need 2 bytes per row
        let image = Image::from_samples(10, 3, ColorSpace::DeviceGray, 1, vec![0; 6]).unwrap();
        assert_eq!(image.bytes_per_row(), 2);
    }

    #[test]
    fn test_uncompressed_stream() {
        let image = Image::gray(2, 2, vec![1, 2, 3, 4]).unwrap();
        let stream = image.to_stream(false).unwrap();

        assert_eq!(stream.data(), &[1, 2, 3, 4]);
        let dict = stream.dictionary();
        assert_eq!(dict.get("Subtype"), Some(&Object::Name("Image".to_string())));
        assert_eq!(dict.get_integer("Width"), Some(2));
        assert_eq!(dict.get_integer("Length"), Some(4));
        assert!(dict.get("Filter").is_none());
        assert!(dict.get("DecodeParms").is_none());
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compressed_stream_decodes_back() {
        use crate::filters::predictor::decode_rows;

        let samples: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
        let image = Image::rgb(4, 3, samples.clone()).unwrap();
        let stream = image.to_stream(true).unwrap();

        let dict = stream.dictionary();
        assert_eq!(dict.get("Filter"), Some(&Object::Name("FlateDecode".to_string())));
        let parms = PredictorParams::from_dictionary(dict.get_dict("DecodeParms").unwrap()).unwrap();
        assert_eq!(parms.predictor, 15);
        assert_eq!(parms.bytes_per_row().unwrap(), 12);
        assert_eq!(dict.get_integer("BitsPerComponent"), Some(8));
        assert_eq!(
            dict.get("ColorSpace"),
            Some(&Object::Name("DeviceRGB".to_string()))
        );

        let inflated = crate::compression::decompress(stream.data()).unwrap();
        assert_eq!(
            decode_rows(&inflated, parms.bytes_per_row().unwrap()).unwrap(),
            samples
        );
    }

    /// PNG unfiltering the way a PDF reader does it: neighbours sit one
    /// pixel back, `ceil(Colors * BitsPerComponent / 8)` bytes.
    #[cfg(feature = "compression")]
    fn reader_unfilter(data: &[u8], parms: &PredictorParams) -> Vec<u8> {
        use crate::filters::predictor::paeth;

        let row_len = parms.bytes_per_row().unwrap();
        let bpp = (parms.colors * parms.bits_per_component).div_ceil(8).max(1);
        let mut out: Vec<u8> = Vec::new();

        for (row, scanline) in data.chunks_exact(row_len + 1).enumerate() {
            let start = row * row_len;
            for x in 0..row_len {
                let a = if x >= bpp { out[start + x - bpp] } else { 0 };
                let b = if row > 0 { out[start - row_len + x] } else { 0 };
                let c = if row > 0 && x >= bpp {
                    out[start - row_len + x - bpp]
                } else {
                    0
                };
                let predicted = match scanline[0] {
                    0 => 0,
                    1 => a,
                    2 => b,
                    3 => ((a as u16 + b as u16) / 2) as u8,
                    4 => paeth(a, b, c),
                    tag => panic!("unexpected tag {tag}"),
                };
                out.push(scanline[1 + x].wrapping_add(predicted));
            }
        }
        out
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_reader_decodes_predicted_rgb_and_sixteen_bit_images() {
        let rgb: Vec<u8> = (0..8 * 4 * 3u32)
            .map(|i| (i * i * 13 % 251) as u8)
            .collect();
        let gray16: Vec<u8> = (0..5 * 3 * 2u32).map(|i| (i * 29 % 256) as u8).collect();

        let images = [
            Image::rgb(8, 4, rgb).unwrap(),
            Image::from_samples(5, 3, ColorSpace::DeviceGray, 16, gray16).unwrap(),
            Image::from_samples(3, 2, ColorSpace::DeviceCMYK, 8, (0..24).collect()).unwrap(),
        ];

        for image in images {
            let stream = image.to_stream(true).unwrap();
            let dict = stream.dictionary();
            let parms =
                PredictorParams::from_dictionary(dict.get_dict("DecodeParms").unwrap()).unwrap();
            assert_eq!(parms.colors, 1);
            assert_eq!(parms.bits_per_component, 8);
            assert_eq!(parms.columns, image.bytes_per_row());

            let inflated = crate::compression::decompress(stream.data()).unwrap();
            assert_eq!(
                reader_unfilter(&inflated, &parms),
                image.samples(),
                "{:?}",
                image.color_space()
            );
        }
    }

    #[test]
    fn test_oversized_geometry_is_rejected() {
        let err = Image::from_samples(u32::MAX, u32::MAX, ColorSpace::DeviceCMYK, 16, Vec::new())
            .unwrap_err();
        assert!(matches!(err, PdfError::InvalidImage(_)));
    }
}
