use crate::error::RenderWarning;
use crate::layout::{Bounds, GroupBox, HAlign, LabelSpec, VAlign};
use crate::scene::{Legend, Scene};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON view of the resolved labels of one scene, for inspection and
/// regression fixtures.
#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub extent: Bounds,
    pub ops: usize,
    pub groups: Vec<GroupDump>,
    pub group_labels: Vec<LabelDump>,
    pub labels: Vec<LabelDump>,
    pub legend: Legend,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GroupDump {
    pub group: String,
    pub members: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub row: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub base_size: f64,
    pub font_size: f64,
    pub alpha: f64,
    pub colour: String,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl SceneDump {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            extent: scene.extent,
            ops: scene.ops.len(),
            groups: scene.groups.iter().map(GroupDump::from).collect(),
            group_labels: scene.group_labels.iter().map(LabelDump::from).collect(),
            labels: scene.labels.iter().map(LabelDump::from).collect(),
            legend: scene.legend.clone(),
            warnings: scene.warnings.iter().map(RenderWarning::to_string).collect(),
        }
    }
}

impl From<&GroupBox> for GroupDump {
    fn from(group: &GroupBox) -> Self {
        Self {
            group: group.group.clone(),
            members: group.members,
            xmin: group.bounds.xmin,
            xmax: group.bounds.xmax,
            ymin: group.bounds.ymin,
            ymax: group.bounds.ymax,
        }
    }
}

impl From<&LabelSpec> for LabelDump {
    fn from(label: &LabelSpec) -> Self {
        Self {
            text: label.text.clone(),
            row: label.row,
            x: label.x,
            y: label.y,
            base_size: label.base_size,
            font_size: label.font_size,
            alpha: label.alpha(),
            colour: label.colour.clone(),
            h_align: label.h_align,
            v_align: label.v_align,
        }
    }
}

pub fn write_scene_dump(path: &Path, scene: &Scene) -> anyhow::Result<()> {
    let dump = SceneDump::from_scene(scene);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
