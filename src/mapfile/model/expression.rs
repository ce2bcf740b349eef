//! Match literals
//!
//! An [`Expression`] is one of three literal forms: a plain string, a
//! parenthesized boolean expression or a slash-delimited regular expression.
//! Regexes are compiled on first use and cached.

use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExpressionKind {
    String,
    Expression,
    Regex,
}

#[derive(Debug, Clone, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub text: String,
    #[serde(skip)]
    compiled: OnceCell<Regex>,
}

impl Expression {
    pub fn new(kind: ExpressionKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            compiled: OnceCell::new(),
        }
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::String, text)
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Expression, text)
    }

    pub fn regex(text: impl Into<String>) -> Self {
        Self::new(ExpressionKind::Regex, text)
    }

    /// The compiled pattern of a regex literal, built on first call.
    pub fn compiled(&self) -> Result<&Regex> {
        if self.kind != ExpressionKind::Regex {
            return Err(MapfileError::new(
                ErrorKind::Type,
                "compile_expression",
                format!("'{}' is not a regular expression", self.text),
            ));
        }
        self.compiled.get_or_try_init(|| {
            RegexBuilder::new(&self.text).build().map_err(|err| {
                MapfileError::new(
                    ErrorKind::Regex,
                    "compile_expression",
                    format!("Failed to compile expression ({}): {}", self.text, err),
                )
            })
        })
    }

    /// Whether `value` is selected by a string or regex literal.
    ///
    /// Expression literals need attribute binding and never match here.
    pub fn matches(&self, value: &str) -> Result<bool> {
        match self.kind {
            ExpressionKind::String => Ok(self.text == value),
            ExpressionKind::Regex => Ok(self.compiled()?.is_match(value)),
            ExpressionKind::Expression => Ok(false),
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

/// Renders the literal the way it is written in a document.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ExpressionKind::String => {
                let escaped = self.text.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{}\"", escaped)
            }
            ExpressionKind::Expression => write!(f, "({})", self.text),
            ExpressionKind::Regex => write!(f, "/{}/", self.text),
        }
    }
}
