//! Listing page extraction.
//!
//! Everything that depends on the remote site's page layout lives here,
//! behind [`parse_item_page`] and its closed set of outcomes. A layout
//! change on the site is a localized fix in this module, nothing else.

mod parser;
mod size;
mod types;

pub use parser::parse_item_page;
pub use size::{to_kib, SizeUnit};
pub use types::*;
