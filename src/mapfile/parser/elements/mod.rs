//! One sub-parser per block kind
//!
//! Every block reader follows the same shape: start from the entity's
//! defaults, read keywords until `END`, and hand each keyword to the block's
//! `apply_*_field` function. Those functions are shared with the
//! partial-update engine. Keywords that open nested blocks are handled by the
//! block reader itself, since a single value can never contain a block.

pub mod class;
pub mod feature;
pub mod join;
pub mod label;
pub mod layer;
pub mod map;
pub mod map_elements;
pub mod metadata;
pub mod outputformat;
pub mod projection;
pub mod style;
pub mod symbol;
pub mod web;

use super::context::ParserContext;
use super::readers::FieldOutcome;
use crate::mapfile::error::Result;
use crate::mapfile::lexer::{Keyword, Mode, Token};

/// Routine names of a block: one for documents, one for partial updates.
pub(crate) type Routine = (&'static str, &'static str);

impl ParserContext<'_> {
    pub(crate) fn routine(&self, names: Routine) -> &'static str {
        match self.mode() {
            Mode::Document => names.0,
            Mode::SingleValue => names.1,
        }
    }
}

/// Read keywords until `END`, passing each to `field`.
///
/// Anything that is not a keyword, and any keyword `field` does not know, is
/// an error.
pub(crate) fn read_block<F>(ctx: &mut ParserContext<'_>, routine: &'static str, mut field: F) -> Result<()>
where
    F: FnMut(&mut ParserContext<'_>, Keyword) -> Result<FieldOutcome>,
{
    loop {
        match ctx.next()? {
            Token::Eof => return Err(ctx.end_of_input(routine)),
            Token::End => return Ok(()),
            Token::Keyword(keyword) => {
                if field(ctx, keyword)? == FieldOutcome::Unknown {
                    return Err(ctx.unexpected(routine));
                }
            }
            _ => return Err(ctx.unexpected(routine)),
        }
    }
}
