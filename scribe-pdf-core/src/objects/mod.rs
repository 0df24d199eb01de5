mod dictionary;
mod primitive;
mod stream;
mod token;

pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};
pub use stream::Stream;
pub use token::{encode_name, encode_text_string};
