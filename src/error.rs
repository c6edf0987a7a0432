use std::fmt;

use thiserror::Error;

/// Fatal failures of a render call. Nothing is drawn when one of these is
/// returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    #[error("input is not tabular: {0}")]
    InvalidInput(String),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: {reason}")]
    InvalidRectangle { row: usize, reason: String },
    #[error("table has no `group` column")]
    NoGroupColumn,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelCategory {
    Label,
    Group,
}

impl fmt::Display for LabelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelCategory::Label => f.write_str("label"),
            LabelCategory::Group => f.write_str("group.label"),
        }
    }
}

/// Non-fatal diagnostics. They are collected on the scene (or on the loaded
/// config) so callers can surface them.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderWarning {
    /// A fixed size and a non-default factor were both given; the fixed size
    /// is used and the factor is reset to 1.
    ConflictingSizeConfig {
        category: LabelCategory,
        factor: f64,
        fixed: f64,
    },
    /// Label text with no characters. It is kept with size 0 and hidden.
    DegenerateLabel {
        category: LabelCategory,
        row: Option<usize>,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::ConflictingSizeConfig {
                category,
                factor,
                fixed,
            } => write!(
                f,
                "{category}.size.fixed = {fixed} overrides {category}.size.factor = {factor}; factor reset to 1"
            ),
            RenderWarning::DegenerateLabel { category, row } => match row {
                Some(row) => write!(f, "{category} on row {row} is empty; hidden"),
                None => write!(f, "empty {category} text; hidden"),
            },
        }
    }
}

impl RenderWarning {
    pub(crate) fn emit(&self) {
        tracing::warn!("{self}");
    }
}
