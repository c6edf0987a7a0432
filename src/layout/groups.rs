use std::collections::BTreeMap;

use crate::error::{RenderError, Result};
use crate::ir::TreemapTable;

use super::{Bounds, GroupBox};

/// One bounding box per distinct group value, ordered by group name.
///
/// Rows whose group is missing do not contribute to any box.
pub fn reduce_groups(table: &TreemapTable) -> Result<Vec<GroupBox>> {
    if !table.has_group {
        return Err(RenderError::NoGroupColumn);
    }
    let mut boxes: BTreeMap<&str, (Bounds, usize)> = BTreeMap::new();
    for rect in &table.rows {
        let Some(group) = rect.group.as_deref() else {
            continue;
        };
        let bounds = Bounds::of_rect(rect);
        boxes
            .entry(group)
            .and_modify(|(acc, count)| {
                *acc = acc.union(&bounds);
                *count += 1;
            })
            .or_insert((bounds, 1));
    }
    Ok(boxes
        .into_iter()
        .map(|(group, (bounds, members))| GroupBox {
            group: group.to_string(),
            bounds,
            members,
        })
        .collect())
}
