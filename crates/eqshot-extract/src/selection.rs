use crate::equations::EquationKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building an [`EquationSelection`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown equation category '{0}' (expected all, block, display or inline)")]
    UnknownCategory(String),
    #[error("at least one equation category must be selected")]
    Empty,
}

/// A user-facing equation category, including the `all` wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Block,
    Display,
    Inline,
}

impl FromStr for Category {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Category::All),
            "block" => Ok(Category::Block),
            "display" => Ok(Category::Display),
            "inline" => Ok(Category::Inline),
            _ => Err(SelectionError::UnknownCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::All => "all",
            Category::Block => "block",
            Category::Display => "display",
            Category::Inline => "inline",
        };
        f.write_str(name)
    }
}

/// Which equation shapes an extraction pass should look for.
///
/// Always non-empty when built through [`EquationSelection::from_categories`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquationSelection {
    pub block: bool,
    pub display: bool,
    pub inline: bool,
}

impl Default for EquationSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl EquationSelection {
    pub const fn all() -> Self {
        Self {
            block: true,
            display: true,
            inline: true,
        }
    }

    pub const fn only(kind: EquationKind) -> Self {
        Self {
            block: matches!(kind, EquationKind::Block),
            display: matches!(kind, EquationKind::Display),
            inline: matches!(kind, EquationKind::Inline),
        }
    }

    /// Folds a list of categories into a selection. `All` anywhere in the list
    /// selects every shape.
    pub fn from_categories(categories: &[Category]) -> Result<Self, SelectionError> {
        if categories.is_empty() {
            return Err(SelectionError::Empty);
        }
        if categories.contains(&Category::All) {
            return Ok(Self::all());
        }
        Ok(Self {
            block: categories.contains(&Category::Block),
            display: categories.contains(&Category::Display),
            inline: categories.contains(&Category::Inline),
        })
    }

    pub fn includes(&self, kind: EquationKind) -> bool {
        match kind {
            EquationKind::Block => self.block,
            EquationKind::Display => self.display,
            EquationKind::Inline => self.inline,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.block || self.display || self.inline)
    }
}
