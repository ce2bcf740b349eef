//! Classes: selection rules and their styling

use super::enums::{LayerType, Status};
use super::expression::Expression;
use super::metadata::Metadata;
use super::style::{Label, Style};
use crate::mapfile::error::{MapfileError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub name: Option<String>,
    pub title: Option<String>,
    pub status: Status,
    pub debug: bool,
    pub expression: Option<Expression>,
    pub text: Option<Expression>,
    pub template: Option<String>,
    pub keyimage: Option<String>,
    /// Absent unless a LABEL block was given.
    pub label: Option<Label>,
    /// Geometry type. Set from the owning layer when not given.
    pub class_type: Option<LayerType>,
    pub metadata: Metadata,
    pub min_scale: f64,
    pub max_scale: f64,
    pub styles: Vec<Style>,
    /// Index of the owning layer.
    #[serde(skip)]
    pub layer: usize,
}

impl Default for Class {
    fn default() -> Self {
        Self {
            name: None,
            title: None,
            status: Status::On,
            debug: false,
            expression: None,
            text: None,
            template: None,
            keyimage: None,
            label: None,
            class_type: None,
            metadata: Metadata::new(),
            min_scale: -1.0,
            max_scale: -1.0,
            styles: Vec::new(),
            layer: 0,
        }
    }
}

impl Class {
    pub fn new(layer: usize) -> Self {
        Self {
            layer,
            ..Self::default()
        }
    }

    /// Style at `index`, creating default styles up to it.
    ///
    /// `limit` is the styles-per-class capacity.
    pub fn style_at(&mut self, index: usize, limit: usize, routine: &'static str) -> Result<&mut Style> {
        if index >= limit {
            return Err(MapfileError::capacity(
                routine,
                format!("Too many styles defined in class, only {} allowed.", limit),
            ));
        }
        while self.styles.len() <= index {
            self.styles.push(Style::default());
        }
        Ok(&mut self.styles[index])
    }

    /// Append a style, enforcing the styles-per-class capacity.
    pub fn push_style(&mut self, style: Style, limit: usize, routine: &'static str) -> Result<()> {
        let index = self.styles.len();
        *self.style_at(index, limit, routine)? = style;
        Ok(())
    }

    pub fn label_mut(&mut self) -> &mut Label {
        self.label.get_or_insert_with(Label::default)
    }
}
