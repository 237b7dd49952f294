//! Source directory scanning

mod listing;

pub use listing::{list_children, list_source, Listing};
