//! Document parser for map definitions
//!
//! The parser is recursive descent with one sub-parser per block kind:
//!
//! 1. **Context**: the token source, mode, capabilities and limits of one
//!    parse, plus the process-wide parse lock (context.rs)
//! 2. **Readers**: field readers shared by documents and partial updates
//!    (readers.rs)
//! 3. **Elements**: the block sub-parsers and their `apply_*_field`
//!    dispatchers (elements/)
//!
//! A parse either returns a complete [`MapDefinition`] or fails. Nothing is
//! recovered after an error.

pub mod context;
pub mod elements;
pub mod readers;

pub use context::{acquire_parse_lock, Capabilities, Limits, ParserContext, ParserOptions, UpdateScope};
pub use elements::map::parse_map;
pub use readers::FieldOutcome;

use crate::mapfile::error::Result;
use crate::mapfile::model::MapDefinition;

/// Parse document text into an unresolved map.
///
/// The caller holds the parse lock. Symbol names, catalogs and output-format
/// defaults are settled afterwards by [`crate::mapfile::resolve`].
pub fn parse_document(text: &str, options: ParserOptions) -> Result<MapDefinition> {
    let mut ctx = ParserContext::document(text, options);
    parse_map(&mut ctx)
}
