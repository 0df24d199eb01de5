mod image;

pub use image::{ColorSpace, Image};
