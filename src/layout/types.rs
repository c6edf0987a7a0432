use serde::Serialize;

use crate::error::{LabelCategory, RenderWarning};
use crate::ir::Rect;

/// Axis-aligned bounds in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    pub fn of_rect(rect: &Rect) -> Self {
        Self {
            xmin: rect.xmin,
            xmax: rect.xmax,
            ymin: rect.ymin,
            ymax: rect.ymax,
        }
    }

    /// Union of all rectangles; `None` for an empty slice.
    pub fn enclosing(rects: &[Rect]) -> Option<Self> {
        let mut iter = rects.iter();
        let first = Self::of_rect(iter.next()?);
        Some(iter.fold(first, |acc, rect| acc.union(&Self::of_rect(rect))))
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            xmin: self.xmin.min(other.xmin),
            xmax: self.xmax.max(other.xmax),
            ymin: self.ymin.min(other.ymin),
            ymax: self.ymax.max(other.ymax),
        }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.xmin <= other.xmin
            && self.xmax >= other.xmax
            && self.ymin <= other.ymin
            && self.ymax >= other.ymax
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupBox {
    pub group: String,
    pub bounds: Bounds,
    pub members: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
}

/// Which edge of the text sits on the anchor. With `Bottom` the text grows
/// upward, with `Top` it hangs below the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Bottom,
}

/// A fully resolved text label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSpec {
    pub kind: LabelCategory,
    pub text: String,
    /// Source row for individual labels.
    pub row: Option<usize>,
    pub x: f64,
    pub y: f64,
    /// Geometry-derived size before any factor, fixed size or scale.
    pub base_size: f64,
    pub font_size: f64,
    pub visible: bool,
    pub colour: String,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl LabelSpec {
    pub fn alpha(&self) -> f64 {
        if self.visible { 1.0 } else { 0.0 }
    }
}

/// Output of the planning stages, before any drawing decisions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapLayout {
    pub extent: Bounds,
    pub groups: Vec<GroupBox>,
    pub group_labels: Vec<LabelSpec>,
    pub labels: Vec<LabelSpec>,
    pub warnings: Vec<RenderWarning>,
}
