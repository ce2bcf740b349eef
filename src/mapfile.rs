//! Map definition engine
//!
//! Reads map documents into a [`MapDefinition`], applies single-field
//! updates to a loaded map, and writes a map back out as a document.
//!
//! ## Pipeline
//!
//! 1. **Lexer**: logos tokens and a token source with document and
//!    single-value modes (lexer/)
//! 2. **Parser**: one sub-parser per block kind, sharing field readers with
//!    the update engine (parser/)
//! 3. **Resolver**: output formats, symbol and font catalogs, symbol names
//!    (resolve.rs)
//! 4. **Update engine**: object paths to one field (update.rs)
//! 5. **Serializer**: the canonical writer (serializer.rs)
//!
//! [`loader::MapLoader`] ties the first three together behind the parse lock.

pub mod error;
pub mod lexer;
pub mod loader;
pub mod model;
pub mod parser;
pub mod resolve;
pub mod serializer;
pub mod update;

pub use error::{ErrorKind, MapfileError, Result, UpdateOutcome, UpdateReport};
pub use lexer::tokenize_map;
pub use loader::{load_map, MapLoader};
pub use model::MapDefinition;
pub use parser::{parse_document, ParserOptions};
pub use serializer::{save_map, write_map};
pub use update::{apply_update, apply_updates};
