//! PNG predictor codec for PDF stream data (ISO 32000-1 §7.4.4.4).
//!
//! Predicted data is a sequence of scanlines, each a one-byte filter tag
//! followed by `bytes_per_row` filtered bytes. Decoding reverses the filter
//! row by row; every row depends on the reconstructed row above it, so rows
//! are processed strictly in order.
//!
//! Neighbours are taken at byte distance one: `a` is the reconstructed byte
//! to the left, `b` the byte above, `c` the byte above-left. Missing
//! neighbours (first column, first row) count as zero.

use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object};

/// Per-row filter algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorTag {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

impl PredictorTag {
    pub const ALL: [PredictorTag; 5] = [
        PredictorTag::None,
        PredictorTag::Sub,
        PredictorTag::Up,
        PredictorTag::Average,
        PredictorTag::Paeth,
    ];

    /// Prediction for one byte given its left, upper and upper-left
    /// neighbours.
    fn predict(self, a: u8, b: u8, c: u8) -> u8 {
        match self {
            PredictorTag::None => 0,
            PredictorTag::Sub => a,
            PredictorTag::Up => b,
            PredictorTag::Average => ((a as u16 + b as u16) / 2) as u8,
            PredictorTag::Paeth => paeth(a, b, c),
        }
    }
}

impl TryFrom<u8> for PredictorTag {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(PredictorTag::None),
            1 => Ok(PredictorTag::Sub),
            2 => Ok(PredictorTag::Up),
            3 => Ok(PredictorTag::Average),
            4 => Ok(PredictorTag::Paeth),
            other => Err(other),
        }
    }
}

/// Whichever of `a`, `b`, `c` is closest to `a + b - c`; ties go to `a`,
/// then `b`.
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let (ia, ib, ic) = (a as i16, b as i16, c as i16);
    let p = ia + ib - ic;
    let pa = (p - ia).abs();
    let pb = (p - ib).abs();
    let pc = (p - ic).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Reverses PNG row filtering.
///
/// Returns the reconstructed rows concatenated, tag bytes stripped. Empty
/// input yields empty output. An unknown tag or a trailing partial scanline
/// fails the whole call; no partial output is returned.
pub fn decode_rows(data: &[u8], bytes_per_row: usize) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let stride = bytes_per_row.checked_add(1).ok_or_else(|| {
        PdfError::InvalidFormat(format!("scanline of {bytes_per_row} bytes is too long"))
    })?;
    if data.len() % stride != 0 {
        return Err(PdfError::TruncatedScanline {
            expected: stride,
            actual: data.len(),
        });
    }

    let row_count = data.len() / stride;
    let mut output = vec![0u8; row_count * bytes_per_row];

    for (row, scanline) in data.chunks_exact(stride).enumerate() {
        let tag = PredictorTag::try_from(scanline[0])
            .map_err(|tag| PdfError::InvalidPredictorTag { row, tag })?;
        tracing::trace!(row, ?tag, "decoding scanline");

        let (done, rest) = output.split_at_mut(row * bytes_per_row);
        let previous = if row == 0 {
            None
        } else {
            Some(&done[(row - 1) * bytes_per_row..])
        };
        let current = &mut rest[..bytes_per_row];

        for (x, &filtered) in scanline[1..].iter().enumerate() {
            let a = if x > 0 { current[x - 1] } else { 0 };
            let (b, c) = match previous {
                Some(prev) => (prev[x], if x > 0 { prev[x - 1] } else { 0 }),
                None => (0, 0),
            };
            current[x] = filtered.wrapping_add(tag.predict(a, b, c));
        }
    }

    Ok(output)
}

/// [`decode_rows`] for callers holding optional stream data; `None` decodes
/// to nothing.
pub fn decode_optional(data: Option<&[u8]>, bytes_per_row: usize) -> Result<Vec<u8>> {
    decode_rows(data.unwrap_or_default(), bytes_per_row)
}

/// How the encoder picks a filter for each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictorStrategy {
    /// Same filter on every row (`/Predictor` 10 to 14).
    Fixed(PredictorTag),
    /// Per-row choice minimising the sum of absolute residuals
    /// (`/Predictor` 15).
    Adaptive,
}

impl PredictorStrategy {
    /// Strategy for a `/Predictor` value from a `/DecodeParms` dictionary.
    pub fn from_predictor(predictor: i64) -> Result<Self> {
        match predictor {
            10 => Ok(PredictorStrategy::Fixed(PredictorTag::None)),
            11 => Ok(PredictorStrategy::Fixed(PredictorTag::Sub)),
            12 => Ok(PredictorStrategy::Fixed(PredictorTag::Up)),
            13 => Ok(PredictorStrategy::Fixed(PredictorTag::Average)),
            14 => Ok(PredictorStrategy::Fixed(PredictorTag::Paeth)),
            15 => Ok(PredictorStrategy::Adaptive),
            other => Err(PdfError::InvalidFormat(format!(
                "Predictor {other} is not a PNG predictor"
            ))),
        }
    }
}

fn filter_row(tag: PredictorTag, current: &[u8], previous: Option<&[u8]>, out: &mut [u8]) {
    for (x, &raw) in current.iter().enumerate() {
        let a = if x > 0 { current[x - 1] } else { 0 };
        let (b, c) = match previous {
            Some(prev) => (prev[x], if x > 0 { prev[x - 1] } else { 0 }),
            None => (0, 0),
        };
        out[x] = raw.wrapping_sub(tag.predict(a, b, c));
    }
}

fn residual_cost(filtered: &[u8]) -> u64 {
    filtered
        .iter()
        .map(|&byte| (byte as i8).unsigned_abs() as u64)
        .sum()
}

/// Applies PNG row filtering to raw rows of `bytes_per_row` bytes.
///
/// `data.len()` must be a multiple of `bytes_per_row`.
pub fn encode_rows(
    data: &[u8],
    bytes_per_row: usize,
    strategy: PredictorStrategy,
) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if bytes_per_row == 0 || data.len() % bytes_per_row != 0 {
        return Err(PdfError::TruncatedScanline {
            expected: bytes_per_row,
            actual: data.len(),
        });
    }

    let stride = bytes_per_row + 1;
    let mut output = vec![0u8; data.len() / bytes_per_row * stride];
    let mut candidate = vec![0u8; bytes_per_row];

    for (row, (current, scanline)) in data
        .chunks_exact(bytes_per_row)
        .zip(output.chunks_exact_mut(stride))
        .enumerate()
    {
        let previous = if row == 0 {
            None
        } else {
            Some(&data[(row - 1) * bytes_per_row..row * bytes_per_row])
        };

        let tag = match strategy {
            PredictorStrategy::Fixed(tag) => tag,
            PredictorStrategy::Adaptive => {
                let mut best = (PredictorTag::None, u64::MAX);
                for tag in PredictorTag::ALL {
                    filter_row(tag, current, previous, &mut candidate);
                    let cost = residual_cost(&candidate);
                    if cost < best.1 {
                        best = (tag, cost);
                    }
                }
                best.0
            }
        };

        scanline[0] = tag as u8;
        filter_row(tag, current, previous, &mut scanline[1..]);
    }

    Ok(output)
}

/// The `/DecodeParms` entries that describe predicted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorParams {
    /// 1 = none, 10-15 = PNG
    pub predictor: i64,
    /// Color components per sample
    pub colors: usize,
    /// Bits per color component
    pub bits_per_component: usize,
    /// Samples per row
    pub columns: usize,
}

impl Default for PredictorParams {
    fn default() -> Self {
        Self {
            predictor: 1,
            colors: 1,
            bits_per_component: 8,
            columns: 1,
        }
    }
}

impl PredictorParams {
    /// Data bytes per scanline, excluding the tag byte. Fails when the
    /// geometry does not fit in `usize`.
    pub fn bytes_per_row(&self) -> Result<usize> {
        self.colors
            .checked_mul(self.bits_per_component)
            .and_then(|bits| bits.checked_mul(self.columns))
            .map(|bits| bits.div_ceil(8))
            .ok_or_else(|| {
                PdfError::InvalidFormat(format!(
                    "row of {} columns x {} colors x {} bits overflows",
                    self.columns, self.colors, self.bits_per_component
                ))
            })
    }

    pub fn is_png(&self) -> bool {
        (10..=15).contains(&self.predictor)
    }

    /// Reads the parameters, falling back to the defaults for absent keys.
    pub fn from_dictionary(dict: &Dictionary) -> Result<Self> {
        let defaults = Self::default();
        let read = |key: &str, fallback: usize| -> Result<usize> {
            match dict.get_integer(key) {
                Some(value) if value > 0 => Ok(value as usize),
                Some(value) => Err(PdfError::InvalidFormat(format!(
                    "/{key} must be positive, got {value}"
                ))),
                None => Ok(fallback),
            }
        };

        Ok(Self {
            predictor: dict.get_integer("Predictor").unwrap_or(defaults.predictor),
            colors: read("Colors", defaults.colors)?,
            bits_per_component: read("BitsPerComponent", defaults.bits_per_component)?,
            columns: read("Columns", defaults.columns)?,
        })
    }

    pub fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::with_capacity(4);
        dict.set("Predictor", Object::Integer(self.predictor));
        dict.set("Colors", Object::Integer(self.colors as i64));
        dict.set(
            "BitsPerComponent",
            Object::Integer(self.bits_per_component as i64),
        );
        dict.set("Columns", Object::Integer(self.columns as i64));
        dict
    }
}
