//! Scene composition: turns a treemap table into an ordered list of draw
//! instructions.
//!
//! Paint order (later over earlier):
//!
//! 1. filled rectangles, coloured by `fill`
//! 2. thin rectangle borders
//! 3. group borders and the panel border, when grouped
//! 4. group labels
//! 5. individual labels
//!
//! The scene has no axes; the legend describes the fill dimension.

pub mod legend;

pub use legend::{FillScale, Legend, LegendEntry};

use serde::Serialize;

use crate::config::RenderConfig;
use crate::error::{RenderWarning, Result};
use crate::ir::TreemapTable;
use crate::layout::{Bounds, GroupBox, LabelSpec, TreemapLayout, compute_layout};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeRole {
    Rect,
    Group,
    Panel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect {
        bounds: Bounds,
        color: String,
    },
    StrokeRect {
        bounds: Bounds,
        color: String,
        width: f32,
        role: StrokeRole,
    },
    Text(LabelSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub extent: Bounds,
    pub ops: Vec<DrawOp>,
    pub groups: Vec<GroupBox>,
    pub group_labels: Vec<LabelSpec>,
    pub labels: Vec<LabelSpec>,
    pub legend: Legend,
    pub axes_hidden: bool,
    pub warnings: Vec<RenderWarning>,
}

impl Scene {
    pub fn texts(&self) -> impl Iterator<Item = &LabelSpec> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(label) => Some(label),
            _ => None,
        })
    }
}

pub fn compose_scene(table: &TreemapTable, config: &RenderConfig, theme: &Theme) -> Result<Scene> {
    let layout = compute_layout(table, config)?;
    Ok(build_scene(table, layout, theme))
}

fn build_scene(table: &TreemapTable, layout: TreemapLayout, theme: &Theme) -> Scene {
    let TreemapLayout {
        extent,
        groups,
        group_labels,
        labels,
        warnings,
    } = layout;
    let fill_scale = FillScale::from_table(table, theme);

    let mut builder = SceneBuilder::with_capacity(
        table.rows.len() * 2 + groups.len() + 1 + group_labels.len() + labels.len(),
    );
    for rect in &table.rows {
        builder.fill(Bounds::of_rect(rect), fill_scale.color(&rect.fill));
    }
    for rect in &table.rows {
        builder.stroke(
            Bounds::of_rect(rect),
            &theme.border_color,
            theme.rect_border_width,
            StrokeRole::Rect,
        );
    }
    if table.has_group {
        for group in &groups {
            builder.stroke(
                group.bounds,
                &theme.border_color,
                theme.group_border_width,
                StrokeRole::Group,
            );
        }
        builder.stroke(
            extent,
            &theme.border_color,
            theme.panel_border_width,
            StrokeRole::Panel,
        );
    }
    for label in group_labels.iter().chain(&labels) {
        builder.text(label.clone());
    }

    tracing::debug!(ops = builder.ops.len(), "composed scene");

    Scene {
        extent,
        ops: builder.finish(),
        groups,
        group_labels,
        labels,
        legend: fill_scale.legend(&table.fill_name),
        axes_hidden: true,
        warnings,
    }
}

#[derive(Debug, Default)]
struct SceneBuilder {
    ops: Vec<DrawOp>,
}

impl SceneBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    fn fill(&mut self, bounds: Bounds, color: String) {
        self.ops.push(DrawOp::FillRect { bounds, color });
    }

    fn stroke(&mut self, bounds: Bounds, color: &str, width: f32, role: StrokeRole) {
        self.ops.push(DrawOp::StrokeRect {
            bounds,
            color: color.to_string(),
            width,
            role,
        });
    }

    fn text(&mut self, label: LabelSpec) {
        self.ops.push(DrawOp::Text(label));
    }

    fn finish(self) -> Vec<DrawOp> {
        self.ops
    }
}
