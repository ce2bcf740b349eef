//! Parser context
//!
//! All state of one parse lives in a [`ParserContext`]: the token source and
//! its mode, the grammar capabilities, the collection limits and, for partial
//! updates, the parts of the target map that values are checked against.
//!
//! Parses are serialized through [`PARSE_LOCK`]. Only the public entry points
//! take it, and they hold it for the whole call.

use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use crate::mapfile::lexer::{Mode, Token, TokenSource};
use crate::mapfile::model::{FontCatalog, SymbolCatalog};
use mapfile_config::EngineConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

static PARSE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Hold the process-wide parse lock. A poisoned lock is recovered: every parse
/// builds its state from scratch.
pub fn acquire_parse_lock() -> MutexGuard<'static, ()> {
    PARSE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Optional grammar features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `FONT`, numeric label sizes and truetype label settings.
    pub truetype_fonts: bool,
    /// `ALPHACOLOR` on styles, labels and map elements.
    pub alpha_color: bool,
    /// Class-level keywords that apply to style 0 or 1.
    pub legacy_style_shortcuts: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            truetype_fonts: true,
            alpha_color: false,
            legacy_style_shortcuts: true,
        }
    }
}

/// Capacities of the fixed-size collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_layers: usize,
    pub max_classes: usize,
    pub max_styles: usize,
    pub max_joins: usize,
    pub max_symbols: usize,
    pub max_format_options: usize,
    pub max_projection_args: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_layers: 200,
            max_classes: 250,
            max_styles: 5,
            max_joins: 20,
            max_symbols: 64,
            max_format_options: 100,
            max_projection_args: 20,
        }
    }
}

/// Capabilities and limits together, as configured for an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    pub capabilities: Capabilities,
    pub limits: Limits,
}

impl From<&EngineConfig> for ParserOptions {
    fn from(config: &EngineConfig) -> Self {
        let capabilities = &config.capabilities;
        let limits = &config.limits;
        Self {
            capabilities: Capabilities {
                truetype_fonts: capabilities.truetype_fonts,
                alpha_color: capabilities.alpha_color,
                legacy_style_shortcuts: capabilities.legacy_style_shortcuts,
            },
            limits: Limits {
                max_layers: limits.max_layers,
                max_classes: limits.max_classes,
                max_styles: limits.max_styles,
                max_joins: limits.max_joins,
                max_symbols: limits.max_symbols,
                max_format_options: limits.max_format_options,
                max_projection_args: limits.max_projection_args,
            },
        }
    }
}

/// What a partial update is checked against.
#[derive(Debug, Clone, Copy)]
pub struct UpdateScope<'a> {
    pub template_pattern: Option<&'a str>,
    pub data_pattern: Option<&'a str>,
    pub symbols: &'a SymbolCatalog,
    pub fonts: &'a FontCatalog,
}

pub struct ParserContext<'a> {
    source: TokenSource,
    pub options: ParserOptions,
    scope: Option<UpdateScope<'a>>,
}

impl<'a> ParserContext<'a> {
    /// Context for a whole document.
    pub fn document(text: impl Into<String>, options: ParserOptions) -> Self {
        Self {
            source: TokenSource::document(text),
            options,
            scope: None,
        }
    }

    /// Context for one partial-update value.
    pub fn single_value(value: impl Into<String>, options: ParserOptions, scope: UpdateScope<'a>) -> Self {
        Self {
            source: TokenSource::single_value(value),
            options,
            scope: Some(scope),
        }
    }

    pub fn mode(&self) -> Mode {
        self.source.mode()
    }

    pub fn scope(&self) -> Option<&UpdateScope<'a>> {
        self.scope.as_ref()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.options.capabilities
    }

    pub fn limits(&self) -> Limits {
        self.options.limits
    }

    pub fn next(&mut self) -> Result<Token> {
        self.source.next()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.source.peek()
    }

    /// Text of the last token.
    pub fn text(&self) -> &str {
        self.source.text()
    }

    pub fn line(&self) -> Option<usize> {
        self.source.line()
    }

    /// Everything left in a single value.
    pub fn take_rest(&mut self) -> String {
        self.source.take_rest()
    }

    /// Build an error at the current line.
    pub fn fail(&self, kind: ErrorKind, routine: &'static str, message: impl Into<String>) -> MapfileError {
        MapfileError::new(kind, routine, message).at_line(self.line())
    }

    /// The last token does not belong here.
    pub fn unexpected(&self, routine: &'static str) -> MapfileError {
        self.fail(
            ErrorKind::Identifier,
            routine,
            format!("Parsing error near ({})", self.text()),
        )
    }

    pub fn end_of_input(&self, routine: &'static str) -> MapfileError {
        MapfileError::end_of_input(routine).at_line(self.line())
    }

    /// Check a template or header path against `templatepattern`.
    pub fn check_template(&self, routine: &'static str, value: &str) -> Result<()> {
        match self.scope {
            Some(scope) => check_pattern(routine, scope.template_pattern, "templatepattern", value),
            None => Ok(()),
        }
    }

    /// Check a data source against `datapattern`.
    pub fn check_data(&self, routine: &'static str, value: &str) -> Result<()> {
        match self.scope {
            Some(scope) => check_pattern(routine, scope.data_pattern, "datapattern", value),
            None => Ok(()),
        }
    }
}

fn check_pattern(routine: &'static str, pattern: Option<&str>, name: &str, value: &str) -> Result<()> {
    let Some(pattern) = pattern else {
        warn!(routine, value, "rejected value: no {} is set", name);
        return Err(MapfileError::validation(
            routine,
            format!("Parameter pattern validation failed: no {} is defined.", name),
        ));
    };
    let regex = Regex::new(pattern).map_err(|err| {
        MapfileError::new(
            ErrorKind::Regex,
            routine,
            format!("Failed to compile {} ({}): {}", name, pattern, err),
        )
    })?;
    if regex.is_match(value) {
        Ok(())
    } else {
        warn!(routine, value, "rejected value: does not match {}", name);
        Err(MapfileError::validation(
            routine,
            format!("Parameter pattern validation failed for value ({}).", value),
        ))
    }
}
