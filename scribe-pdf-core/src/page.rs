use crate::graphics::Image;
use crate::objects::encode_name;
use indexmap::IndexMap;
use std::io::Write;

/// A single page in a PDF document.
///
/// Pages carry a size in points, a raw content stream and the images that
/// content stream may paint by name.
///
/// # Example
///
/// ```rust
/// use scribe_pdf::{Image, Page};
///
/// let mut page = Page::a4();
/// page.add_image("Im1", Image::gray(2, 2, vec![0, 255, 255, 0])?);
/// page.draw_image("Im1", 100.0, 600.0, 144.0, 144.0);
/// # Ok::<(), scribe_pdf::PdfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Page {
    width: f64,
    height: f64,
    content: Vec<u8>,
    images: IndexMap<String, Image>,
}

impl Page {
    /// Creates a new page with the specified width and height in points.
    ///
    /// Points are 1/72 of an inch.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            content: Vec::new(),
            images: IndexMap::new(),
        }
    }

    /// Creates a new A4 page (595 x 842 points).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// Creates a new US Letter page (612 x 792 points).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Appends raw content-stream operators.
    pub fn append_content(&mut self, operators: &[u8]) {
        self.content.extend_from_slice(operators);
    }

    /// Registers an image under `name` in the page's `/XObject` resources.
    pub fn add_image(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }

    pub fn images(&self) -> &IndexMap<String, Image> {
        &self.images
    }

    /// Paints a registered image into the given rectangle.
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) {
        let name = encode_name(name);
        // Writing into a Vec cannot fail
        let _ = writeln!(
            self.content,
            "q {width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm /{name} Do Q"
        );
    }
}
