//! PDF stream filters
//!
//! Only the PNG predictor family is handled here; it sits between the raw
//! sample bytes and whatever compressor encodes the stream.

pub mod predictor;

pub use predictor::{
    decode_optional, decode_rows, encode_rows, PredictorParams, PredictorStrategy, PredictorTag,
};
