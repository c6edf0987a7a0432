// Label planning for group boxes and individual rectangles. Everything here
// is pure geometry; colours and alignment are carried through for the
// scene composer.

use super::scale::SizeScale;
use super::{GroupBox, HAlign, LabelSpec, VAlign};
use crate::config::RenderConfig;
use crate::error::{LabelCategory, RenderWarning};
use crate::ir::TreemapTable;

/// Inset of individual labels from the top-left corner of their rectangle.
const LABEL_INSET: f64 = 1.0;
/// Lift of group labels above the group's bottom edge when individual labels
/// share the box.
const GROUP_LABEL_LIFT: f64 = 2.0;
const LABEL_SCALE_RANGE: (f64, f64) = (1.0, 8.0);

/// Width available per character; `None` for empty text.
fn base_size(width: f64, text: &str) -> Option<f64> {
    let chars = text.chars().count();
    if chars == 0 {
        return None;
    }
    Some(width / chars as f64)
}

fn passes_threshold(size: f64, threshold: Option<f64>) -> bool {
    threshold.is_none_or(|t| size >= t)
}

/// Group label pass.
///
/// When individual labels are drawn too, group labels sit just above the
/// bottom edge of the box so they stay clear of the top-left corners where
/// individual labels hang.
pub fn plan_group_labels(
    groups: &[GroupBox],
    with_individual: bool,
    config: &RenderConfig,
    warnings: &mut Vec<RenderWarning>,
) -> Vec<LabelSpec> {
    let mode = config.group_label_size;
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        let b = &group.bounds;
        let x = b.xmax - 0.5 * b.width();
        let y = if with_individual {
            b.ymin + GROUP_LABEL_LIFT
        } else {
            b.ymax - 0.5 * b.height()
        };
        let (base, font_size, visible) = match base_size(b.width(), &group.group) {
            Some(base) => {
                let size = mode.fixed().unwrap_or(base * mode.factor());
                (
                    base,
                    size,
                    passes_threshold(size, config.group_label_size_threshold),
                )
            }
            None => {
                let warning = RenderWarning::DegenerateLabel {
                    category: LabelCategory::Group,
                    row: None,
                };
                warning.emit();
                warnings.push(warning);
                (0.0, 0.0, false)
            }
        };
        out.push(LabelSpec {
            kind: LabelCategory::Group,
            text: group.group.clone(),
            row: None,
            x,
            y,
            base_size: base,
            font_size,
            visible,
            colour: config.group_label_colour.clone(),
            h_align: HAlign::Center,
            v_align: VAlign::Bottom,
        });
    }
    tracing::debug!(
        count = out.len(),
        hidden = out.iter().filter(|l| !l.visible).count(),
        "planned group labels"
    );
    out
}

/// Individual label pass over every row that carries a label.
///
/// Sizes go through a [`SizeScale`] whose range is `[1, 8] * factor`, or
/// `[1, fixed]` with every label pinned to the fixed size. The threshold is
/// checked against `base * factor`, not against the scaled size.
pub fn plan_labels(
    table: &TreemapTable,
    config: &RenderConfig,
    warnings: &mut Vec<RenderWarning>,
) -> Vec<LabelSpec> {
    let mode = config.label_size;
    let factor = mode.factor();
    let (lo, hi) = LABEL_SCALE_RANGE;

    let bases: Vec<(usize, &str, Option<f64>)> = table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(row, rect)| {
            let text = rect.label.as_deref()?;
            Some((row, text, base_size(rect.width(), text)))
        })
        .collect();

    let mut scale = match mode.fixed() {
        Some(fixed) => SizeScale::new(lo, fixed),
        None => SizeScale::new(lo * factor, hi * factor),
    };
    let scale_input = |base: f64| mode.fixed().unwrap_or(base);
    scale.train(bases.iter().filter_map(|(_, _, base)| base.map(scale_input)));

    let mut out = Vec::with_capacity(bases.len());
    for (row, text, base) in bases {
        let rect = &table.rows[row];
        let (base, font_size, visible) = match base {
            Some(base) => (
                base,
                scale.map(scale_input(base)),
                passes_threshold(base * factor, config.label_size_threshold),
            ),
            None => {
                let warning = RenderWarning::DegenerateLabel {
                    category: LabelCategory::Label,
                    row: Some(row),
                };
                warning.emit();
                warnings.push(warning);
                (0.0, 0.0, false)
            }
        };
        out.push(LabelSpec {
            kind: LabelCategory::Label,
            text: text.to_string(),
            row: Some(row),
            x: rect.xmin + LABEL_INSET,
            y: rect.ymax - LABEL_INSET,
            base_size: base,
            font_size,
            visible,
            colour: config.label_colour.clone(),
            h_align: HAlign::Left,
            v_align: VAlign::Top,
        });
    }
    tracing::debug!(
        count = out.len(),
        hidden = out.iter().filter(|l| !l.visible).count(),
        "planned individual labels"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SizeMode;
    use crate::ir::{FillValue, Rect};
    use crate::layout::Bounds;

    fn group(name: &str, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> GroupBox {
        GroupBox {
            group: name.to_string(),
            bounds: Bounds {
                xmin,
                xmax,
                ymin,
                ymax,
            },
            members: 1,
        }
    }

    fn labelled(xmin: f64, xmax: f64, ymin: f64, ymax: f64, label: &str) -> Rect {
        Rect::new(xmin, xmax, ymin, ymax, FillValue::Category("x".into())).with_label(label)
    }

    #[test]
    fn group_label_centred_without_individual_labels() {
        let mut warnings = Vec::new();
        let labels = plan_group_labels(
            &[group("A", 0.0, 100.0, 0.0, 100.0)],
            false,
            &RenderConfig::default(),
            &mut warnings,
        );
        let label = &labels[0];
        assert_eq!((label.x, label.y), (50.0, 50.0));
        assert_eq!(label.base_size, 100.0);
        assert_eq!(label.font_size, 100.0);
        assert!(label.visible);
        assert_eq!(label.h_align, HAlign::Center);
        assert_eq!(label.v_align, VAlign::Bottom);
        assert!(warnings.is_empty());
    }

    #[test]
    fn group_label_moves_to_bottom_edge_with_individual_labels() {
        let labels = plan_group_labels(
            &[group("West", 20.0, 60.0, 10.0, 90.0)],
            true,
            &RenderConfig::default(),
            &mut Vec::new(),
        );
        assert_eq!((labels[0].x, labels[0].y), (40.0, 12.0));
        assert_eq!(labels[0].base_size, 10.0);
    }

    #[test]
    fn group_factor_and_fixed() {
        let groups = [group("AB", 0.0, 40.0, 0.0, 10.0)];
        let factor = RenderConfig::default().with_group_label_size(Some(0.5), None);
        assert_eq!(
            plan_group_labels(&groups, false, &factor, &mut Vec::new())[0].font_size,
            10.0
        );
        let fixed = RenderConfig::default().with_group_label_size(Some(0.5), Some(7.0));
        assert_eq!(fixed.group_label_size, SizeMode::Fixed(7.0));
        assert_eq!(
            plan_group_labels(&groups, false, &fixed, &mut Vec::new())[0].font_size,
            7.0
        );
    }

    #[test]
    fn group_threshold_hides_but_keeps_label() {
        // width 30 over two characters gives 15
        let config = RenderConfig::default().with_group_label_threshold(20.0);
        let labels = plan_group_labels(
            &[group("AB", 0.0, 30.0, 0.0, 10.0), group("C", 0.0, 20.0, 0.0, 10.0)],
            false,
            &config,
            &mut Vec::new(),
        );
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].font_size, 15.0);
        assert!(!labels[0].visible);
        assert_eq!(labels[0].alpha(), 0.0);
        // exactly at the threshold stays visible
        assert_eq!(labels[1].font_size, 20.0);
        assert!(labels[1].visible);
    }

    #[test]
    fn group_threshold_uses_factored_size() {
        let config = RenderConfig::default()
            .with_group_label_size(Some(2.0), None)
            .with_group_label_threshold(20.0);
        let labels = plan_group_labels(
            &[group("AB", 0.0, 30.0, 0.0, 10.0)],
            false,
            &config,
            &mut Vec::new(),
        );
        assert_eq!(labels[0].font_size, 30.0);
        assert!(labels[0].visible);
    }

    #[test]
    fn empty_group_name_is_hidden_with_warning() {
        let mut warnings = Vec::new();
        let labels = plan_group_labels(
            &[group("", 0.0, 10.0, 0.0, 10.0)],
            false,
            &RenderConfig::default(),
            &mut warnings,
        );
        assert_eq!(labels[0].font_size, 0.0);
        assert!(!labels[0].visible);
        assert_eq!(
            warnings,
            vec![RenderWarning::DegenerateLabel {
                category: LabelCategory::Group,
                row: None
            }]
        );
    }

    #[test]
    fn individual_label_anchor_and_base() {
        let table =
            TreemapTable::from_rows(vec![labelled(10.0, 60.0, 10.0, 60.0, "Sales")], "fill");
        let config = RenderConfig::default().with_label_size(Some(0.5), None);
        let labels = plan_labels(&table, &config, &mut Vec::new());
        let label = &labels[0];
        assert_eq!((label.x, label.y), (11.0, 59.0));
        assert_eq!(label.base_size, 10.0);
        assert!(label.font_size >= 0.5 && label.font_size <= 4.0);
        assert_eq!(label.h_align, HAlign::Left);
        assert_eq!(label.v_align, VAlign::Top);
        assert_eq!(label.row, Some(0));
    }

    #[test]
    fn individual_sizes_span_scaled_range() {
        let table = TreemapTable::from_rows(
            vec![
                labelled(0.0, 10.0, 0.0, 10.0, "ab"),
                labelled(10.0, 90.0, 0.0, 10.0, "ab"),
            ],
            "fill",
        );
        let config = RenderConfig::default().with_label_size(Some(0.5), None);
        let labels = plan_labels(&table, &config, &mut Vec::new());
        assert!((labels[0].font_size - 0.5).abs() < 1e-12);
        assert!((labels[1].font_size - 4.0).abs() < 1e-12);
    }

    #[test]
    fn fixed_size_applies_to_every_label() {
        let table = TreemapTable::from_rows(
            vec![
                labelled(0.0, 10.0, 0.0, 10.0, "a"),
                labelled(10.0, 90.0, 0.0, 10.0, "a much longer label"),
                labelled(90.0, 91.0, 0.0, 10.0, "tiny"),
            ],
            "fill",
        );
        let config = RenderConfig::default().with_label_size(None, Some(5.0));
        let labels = plan_labels(&table, &config, &mut Vec::new());
        assert!(labels.iter().all(|l| l.font_size == 5.0));
    }

    #[test]
    fn individual_threshold_multiplies_base_by_factor() {
        // base 10, factor 0.5: tested value 5
        let table =
            TreemapTable::from_rows(vec![labelled(0.0, 50.0, 0.0, 10.0, "Sales")], "fill");
        let at = RenderConfig::default()
            .with_label_size(Some(0.5), None)
            .with_label_threshold(5.0);
        assert!(plan_labels(&table, &at, &mut Vec::new())[0].visible);
        let above = RenderConfig::default()
            .with_label_size(Some(0.5), None)
            .with_label_threshold(5.01);
        let hidden = plan_labels(&table, &above, &mut Vec::new());
        assert_eq!(hidden.len(), 1);
        assert!(!hidden[0].visible);
    }

    #[test]
    fn fixed_individual_threshold_ignores_displaced_factor() {
        // base 10; the displaced factor 0.5 would test 5 against 9
        let table =
            TreemapTable::from_rows(vec![labelled(0.0, 50.0, 0.0, 10.0, "Sales")], "fill");
        let config = RenderConfig::default()
            .with_label_size(Some(0.5), Some(6.0))
            .with_label_threshold(9.0);
        let labels = plan_labels(&table, &config, &mut Vec::new());
        assert_eq!(labels[0].font_size, 6.0);
        assert!(labels[0].visible);

        // the fixed size itself is not what gets tested
        let above_base = config.with_label_threshold(10.5);
        assert!(!plan_labels(&table, &above_base, &mut Vec::new())[0].visible);
    }

    #[test]
    fn fixed_group_size_is_what_the_threshold_sees() {
        // base 100 clears the threshold but the fixed size 7 does not
        let config = RenderConfig::default()
            .with_group_label_size(None, Some(7.0))
            .with_group_label_threshold(8.0);
        let labels = plan_group_labels(
            &[group("A", 0.0, 100.0, 0.0, 10.0)],
            false,
            &config,
            &mut Vec::new(),
        );
        assert_eq!(labels[0].base_size, 100.0);
        assert_eq!(labels[0].font_size, 7.0);
        assert!(!labels[0].visible);
    }

    #[test]
    fn unlabelled_rows_are_skipped_and_empty_labels_warn() {
        let table = TreemapTable::from_rows(
            vec![
                labelled(0.0, 10.0, 0.0, 10.0, ""),
                Rect::new(10.0, 20.0, 0.0, 10.0, FillValue::Number(1.0)),
                labelled(20.0, 30.0, 0.0, 10.0, "ok"),
            ],
            "fill",
        );
        let mut warnings = Vec::new();
        let labels = plan_labels(&table, &RenderConfig::default(), &mut warnings);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].font_size, 0.0);
        assert!(!labels[0].visible);
        assert_eq!(labels[1].row, Some(2));
        assert_eq!(labels[1].font_size, 8.0);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(base_size(10.0, "żółw"), Some(2.5));
        assert_eq!(base_size(10.0, ""), None);
    }
}
