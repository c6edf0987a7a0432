use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Value that drives rectangle colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Number(f64),
    Category(String),
}

impl FillValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FillValue::Number(v) => Some(*v),
            FillValue::Category(_) => None,
        }
    }

    pub fn as_key(&self) -> String {
        match self {
            FillValue::Number(v) => format!("{v}"),
            FillValue::Category(s) => s.clone(),
        }
    }
}

/// One input row: an axis-aligned rectangle in layout coordinates.
///
/// Layout coordinates grow upward on the y axis, so `ymax` is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub fill: FillValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Rect {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, fill: FillValue) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
            fill,
            group: None,
            label: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// The tabular input of one render call.
///
/// `has_group` / `has_label` record whether the column exists at all; a
/// present column may still hold `None` for individual rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreemapTable {
    pub rows: Vec<Rect>,
    pub has_group: bool,
    pub has_label: bool,
    pub fill_name: String,
}

impl TreemapTable {
    pub fn new(fill_name: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            has_group: false,
            has_label: false,
            fill_name: fill_name.into(),
        }
    }

    /// Builds a table from rows, deriving the column flags from the data.
    pub fn from_rows(rows: Vec<Rect>, fill_name: impl Into<String>) -> Self {
        let has_group = rows.iter().any(|r| r.group.is_some());
        let has_label = rows.iter().any(|r| r.label.is_some());
        Self {
            rows,
            has_group,
            has_label,
            fill_name: fill_name.into(),
        }
    }

    pub fn push(&mut self, rect: Rect) {
        self.has_group |= rect.group.is_some();
        self.has_label |= rect.label.is_some();
        self.rows.push(rect);
    }

    pub fn is_numeric_fill(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|r| r.fill.as_number().is_some())
    }

    /// Checks the guarantees the layout engine owes us: at least one row and
    /// finite, non-degenerate rectangles.
    pub fn validate(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(RenderError::InvalidInput("table has no rows".to_string()));
        }
        for (row, rect) in self.rows.iter().enumerate() {
            let coords = [rect.xmin, rect.xmax, rect.ymin, rect.ymax];
            if coords.iter().any(|v| !v.is_finite()) {
                return Err(RenderError::InvalidRectangle {
                    row,
                    reason: "coordinates must be finite".to_string(),
                });
            }
            if rect.xmin >= rect.xmax || rect.ymin >= rect.ymax {
                return Err(RenderError::InvalidRectangle {
                    row,
                    reason: format!(
                        "degenerate rectangle x=[{}, {}] y=[{}, {}]",
                        rect.xmin, rect.xmax, rect.ymin, rect.ymax
                    ),
                });
            }
        }
        Ok(())
    }
}
