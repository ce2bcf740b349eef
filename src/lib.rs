//! # mapfile-engine
//!
//! Parser, partial-update engine and serializer for map definition
//! documents (`MAP ... END`).
//!
//! ```text
//! MAP
//!   NAME "demo"
//!   LAYER
//!     NAME "roads" TYPE LINE
//!     CLASS COLOR 255 0 0 END
//!   END
//! END
//! ```
//!
//! See [`mapfile`] for the pipeline and [`mapfile::MapLoader`] for the entry
//! point hosts use.

pub mod mapfile;

pub use mapfile::{
    apply_update, apply_updates, load_map, save_map, write_map, ErrorKind, MapDefinition, MapLoader, MapfileError,
    ParserOptions, UpdateOutcome, UpdateReport,
};
