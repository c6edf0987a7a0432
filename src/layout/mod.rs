mod groups;
mod labels;
pub mod scale;
mod types;

pub use groups::reduce_groups;
pub use labels::{plan_group_labels, plan_labels};
pub use types::*;

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::ir::TreemapTable;

/// Runs the geometry reducer and both label passes.
///
/// The group pass runs only for grouped tables with group labels enabled;
/// the individual pass only when the table has a label column.
pub fn compute_layout(table: &TreemapTable, config: &RenderConfig) -> Result<TreemapLayout> {
    table.validate()?;
    config.validate()?;

    let extent = Bounds::enclosing(&table.rows)
        .ok_or_else(|| RenderError::InvalidInput("table has no rows".to_string()))?;

    let mut warnings = config.warnings.clone();
    let groups = if table.has_group {
        reduce_groups(table)?
    } else {
        Vec::new()
    };
    let group_labels = if table.has_group && config.label_groups {
        plan_group_labels(&groups, table.has_label, config, &mut warnings)
    } else {
        Vec::new()
    };
    let labels = if table.has_label {
        plan_labels(table, config, &mut warnings)
    } else {
        Vec::new()
    };

    tracing::debug!(
        rows = table.rows.len(),
        groups = groups.len(),
        group_labels = group_labels.len(),
        labels = labels.len(),
        "computed treemap layout"
    );

    Ok(TreemapLayout {
        extent,
        groups,
        group_labels,
        labels,
        warnings,
    })
}
