//! Script-side data model.
//!
//! An extracted script file is a flat set of [`Entry`] values grouped by
//! engine line. The taxonomy is closed: every string the scanner emits
//! is one of the [`TextType`] variants, and only four of them carry a
//! translation slot.

mod entry;
mod record;

pub use entry::{Entry, TextType};
pub use record::{FileRecord, Metadata};
