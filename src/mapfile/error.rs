//! Error types for loading, patching and writing map definitions
//!
//! Every failure carries a coarse [`ErrorKind`], a message, the routine that
//! raised it and, for whole-document parses only, the line being read.
//!
//! Partial updates are applied in batches. Their failures are collected in an
//! [`UpdateReport`] instead of stopping the batch.

use std::fmt;
use thiserror::Error;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The token stream ended inside a block.
    EndOfInput,
    /// A keyword that is not valid at this point in a block.
    Identifier,
    /// A token of the wrong type, or a symbol outside the allowed set.
    Symbol,
    /// A value of the right shape but the wrong type for its owner.
    Type,
    /// A numeric value outside its permitted range.
    OutOfRange,
    /// Allocation of a growable list failed.
    Memory,
    /// Reading or writing a file failed.
    Io,
    /// A fixed-capacity collection is full.
    Capacity,
    /// A pattern could not be compiled or did not match.
    Regex,
    /// A projection definition is malformed or unsupported.
    Projection,
    /// A value was refused by an administrator-supplied allow-list pattern.
    Validation,
    /// Any other structural failure.
    Misc,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::EndOfInput => "unexpected end of input",
            ErrorKind::Identifier => "unknown identifier",
            ErrorKind::Symbol => "unexpected symbol",
            ErrorKind::Type => "type error",
            ErrorKind::OutOfRange => "value out of range",
            ErrorKind::Memory => "memory allocation error",
            ErrorKind::Io => "I/O error",
            ErrorKind::Capacity => "capacity exceeded",
            ErrorKind::Regex => "regular expression error",
            ErrorKind::Projection => "projection error",
            ErrorKind::Validation => "validation failure",
            ErrorKind::Misc => "error",
        };
        f.write_str(name)
    }
}

/// A failure raised by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{routine}(): {kind}: {message}{}", line_suffix(.line))]
pub struct MapfileError {
    pub kind: ErrorKind,
    pub message: String,
    pub routine: &'static str,
    pub line: Option<usize>,
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

impl MapfileError {
    pub fn new(kind: ErrorKind, routine: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            routine,
            line: None,
        }
    }

    /// Attach a line number unless one is already present.
    pub fn at_line(mut self, line: Option<usize>) -> Self {
        if self.line.is_none() {
            self.line = line;
        }
        self
    }

    pub fn end_of_input(routine: &'static str) -> Self {
        Self::new(ErrorKind::EndOfInput, routine, "unexpected end of document")
    }

    pub fn capacity(routine: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Capacity, routine, message)
    }

    pub fn misc(routine: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Misc, routine, message)
    }

    pub fn validation(routine: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, routine, message)
    }

    pub fn io(routine: &'static str, err: &std::io::Error, path: &str) -> Self {
        Self::new(ErrorKind::Io, routine, format!("({}) {}", path, err))
    }

    pub fn memory(routine: &'static str) -> Self {
        Self::new(ErrorKind::Memory, routine, "unable to grow list")
    }

    /// Security rejections are reported separately from malformed input.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

pub type Result<T> = std::result::Result<T, MapfileError>;

/// What a single partial update did to the map.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Applied,
    /// The map is unchanged: unknown path or keyword, or an index out of range.
    Ignored(String),
}

/// One request of a batch and its result.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEntry {
    pub path: String,
    pub value: String,
    pub result: Result<UpdateOutcome>,
}

/// Results of a batch of partial updates, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    entries: Vec<UpdateEntry>,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &str, value: &str, result: Result<UpdateOutcome>) {
        self.entries.push(UpdateEntry {
            path: path.to_string(),
            value: value.to_string(),
            result,
        });
    }

    pub fn entries(&self) -> &[UpdateEntry] {
        &self.entries
    }

    pub fn applied(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.result == Ok(UpdateOutcome::Applied))
            .count()
    }

    pub fn ignored(&self) -> impl Iterator<Item = &UpdateEntry> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.result, Ok(UpdateOutcome::Ignored(_))))
    }

    pub fn errors(&self) -> impl Iterator<Item = (&UpdateEntry, &MapfileError)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().err().map(|err| (entry, err)))
    }

    /// Values refused by `templatepattern` or `datapattern`.
    pub fn rejections(&self) -> impl Iterator<Item = (&UpdateEntry, &MapfileError)> {
        self.errors().filter(|(_, err)| err.is_validation())
    }

    /// Every request was applied.
    pub fn is_clean(&self) -> bool {
        self.applied() == self.entries.len()
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.result {
                Ok(UpdateOutcome::Applied) => writeln!(f, "applied  {} = {}", entry.path, entry.value)?,
                Ok(UpdateOutcome::Ignored(reason)) => {
                    writeln!(f, "ignored  {} = {}: {}", entry.path, entry.value, reason)?
                }
                Err(err) if err.is_validation() => {
                    writeln!(f, "rejected {} = {}: {}", entry.path, entry.value, err)?
                }
                Err(err) => writeln!(f, "failed   {} = {}: {}", entry.path, entry.value, err)?,
            }
        }
        Ok(())
    }
}

/// Grow a list by one element, reporting allocation failure as an error.
pub(crate) fn push_checked<T>(list: &mut Vec<T>, value: T, routine: &'static str) -> Result<()> {
    list.try_reserve(1)
        .map_err(|_| MapfileError::memory(routine))?;
    list.push(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_routine_kind_and_line() {
        let err = MapfileError::new(ErrorKind::Identifier, "parse_layer", "Parsing error near (FOO)")
            .at_line(Some(12));
        assert_eq!(
            err.to_string(),
            "parse_layer(): unknown identifier: Parsing error near (FOO) (line 12)"
        );
    }

    #[test]
    fn display_omits_missing_line() {
        let err = MapfileError::end_of_input("parse_class");
        assert_eq!(
            err.to_string(),
            "parse_class(): unexpected end of input: unexpected end of document"
        );
    }

    #[test]
    fn first_line_wins() {
        let err = MapfileError::misc("parse_map", "x")
            .at_line(Some(3))
            .at_line(Some(9));
        assert_eq!(err.line, Some(3));
    }

    #[test]
    fn validation_is_distinct() {
        assert!(MapfileError::validation("update_web", "rejected").is_validation());
        assert!(!MapfileError::misc("update_web", "rejected").is_validation());
    }

    #[test]
    fn report_sorts_outcomes() {
        let mut report = UpdateReport::new();
        report.record("map layer 0 name", "roads", Ok(UpdateOutcome::Applied));
        report.record("map layer 9 name", "x", Ok(UpdateOutcome::Ignored("no layer 9".into())));
        report.record(
            "map web template",
            "/etc/passwd",
            Err(MapfileError::validation("update_web", "rejected")),
        );
        assert_eq!(report.applied(), 1);
        assert_eq!(report.ignored().count(), 1);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.rejections().count(), 1);
        assert!(!report.is_clean());
        assert!(report.to_string().starts_with("applied  map layer 0 name = roads\n"));
    }

    #[test]
    fn push_checked_appends() {
        let mut list = vec![1];
        push_checked(&mut list, 2, "test").unwrap();
        assert_eq!(list, vec![1, 2]);
    }
}
