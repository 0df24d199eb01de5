use crate::error::Result;
use crate::filters::predictor::{encode_rows, PredictorParams, PredictorStrategy};
use crate::objects::{Dictionary, Object};

#[derive(Debug, Clone)]
pub struct Stream {
    dictionary: Dictionary,
    data: Vec<u8>,
}

impl Stream {
    pub fn new(data: Vec<u8>) -> Self {
        let mut dictionary = Dictionary::new();
        dictionary.set("Length", data.len() as i64);

        Self { dictionary, data }
    }

    pub fn with_dictionary(dictionary: Dictionary, data: Vec<u8>) -> Self {
        let mut dict = dictionary;
        dict.set("Length", data.len() as i64);

        Self {
            dictionary: dict,
            data,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_parts(self) -> (Dictionary, Vec<u8>) {
        (self.dictionary, self.data)
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.dictionary
            .set("Filter", Object::Name(filter.to_string()));
    }

    pub fn set_decode_params(&mut self, params: Dictionary) {
        self.dictionary.set("DecodeParms", params);
    }

    /// Filters the stream data row by row with a PNG predictor and records
    /// the matching `/DecodeParms`.
    ///
    /// Must run before [`Stream::compress_flate`]; the predictor only pays
    /// off when a compressor follows it.
    pub fn apply_png_predictor(&mut self, params: &PredictorParams) -> Result<()> {
        let strategy = PredictorStrategy::from_predictor(params.predictor)?;
        self.data = encode_rows(&self.data, params.bytes_per_row()?, strategy)?;
        self.dictionary.set("Length", self.data.len() as i64);
        self.set_decode_params(params.to_dictionary());
        Ok(())
    }

    #[cfg(feature = "compression")]
    pub fn compress_flate(&mut self) -> Result<()> {
        self.data = crate::compression::compress(&self.data)?;
        self.dictionary.set("Length", self.data.len() as i64);
        self.set_filter("FlateDecode");

        Ok(())
    }
}
