//! Classic cross-reference tables (ISO 32000-1 §7.5.4)
//!
//! [`ReferenceTableBuilder`] hands out object ids and collects their byte
//! offsets while a document is written; [`XRefTable`] renders the result in
//! the fixed-width `xref` layout.

mod builder;
pub mod digits;
mod entry;
mod id_generator;
mod section;
mod table;

pub use builder::{ReferenceTableBuilder, ReservationState};
pub use entry::{XRefEntry, MAX_OFFSET};
pub use id_generator::ObjectNumberGenerator;
pub use section::XRefSection;
pub use table::XRefTable;
