use std::path::{Path, PathBuf};

use treemap_labels::layout::Bounds;
use treemap_labels::{
    FillValue, LabelCategory, OutputConfig, Rect, RenderConfig, RenderError, RenderWarning,
    Theme, TreemapTable, compose_scene, load_table, render_svg,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["grouped.json", "numeric.csv"];
    for rel in candidates {
        let path = fixture(rel);
        assert!(path.exists(), "fixture missing: {rel}");
        let table = load_table(&path).expect("fixture load failed");
        let scene = compose_scene(&table, &RenderConfig::default(), &Theme::default())
            .expect("compose failed");
        let svg = render_svg(&scene, &Theme::default(), &OutputConfig::default());
        assert!(svg.contains("<svg"), "{rel}: missing <svg tag");
        assert!(svg.contains("</svg>"), "{rel}: missing </svg tag");
        assert!(scene.axes_hidden, "{rel}: axes should be hidden");
    }
}

#[test]
fn grouped_fixture_places_group_labels_near_bottom_edge() {
    let table = load_table(&fixture("grouped.json")).unwrap();
    let scene = compose_scene(&table, &RenderConfig::default(), &Theme::default()).unwrap();
    assert_eq!(scene.legend.title(), "Continent");
    assert_eq!(scene.groups.len(), 2);

    let east = &scene.group_labels[0];
    assert_eq!(east.text, "East");
    assert_eq!((east.x, east.y), (30.0, 2.0));
    assert_eq!(east.base_size, 15.0);

    let west = &scene.group_labels[1];
    assert_eq!((west.x, west.y), (80.0, 2.0));
    assert_eq!(west.base_size, 10.0);

    assert_eq!(scene.labels.len(), 6);
    let chile = scene.labels.iter().find(|l| l.text == "Chile").unwrap();
    assert_eq!((chile.x, chile.y), (81.0, 19.0));
    assert_eq!(chile.base_size, 4.0);
}

#[test]
fn csv_fixture_builds_numeric_legend() {
    let table = load_table(&fixture("numeric.csv")).unwrap();
    assert!(table.is_numeric_fill());
    let scene = compose_scene(&table, &RenderConfig::default(), &Theme::default()).unwrap();
    assert_eq!(scene.labels.len(), 2);
    assert_eq!(
        scene.groups[1].bounds,
        Bounds {
            xmin: 50.0,
            xmax: 100.0,
            ymin: 60.0,
            ymax: 100.0
        }
    );
    let svg = render_svg(&scene, &Theme::default(), &OutputConfig::default());
    assert!(svg.contains("url(#fill-gradient)"));
}

#[test]
fn non_tabular_input_is_rejected() {
    let err = load_table(&fixture("not_tabular.json")).unwrap_err();
    let err = err.downcast::<RenderError>().unwrap();
    assert!(matches!(err, RenderError::InvalidInput(_)));
}

#[test]
fn single_group_scenario() {
    let table = TreemapTable::from_rows(
        vec![
            Rect::new(0.0, 50.0, 0.0, 100.0, FillValue::Category("x".into())).with_group("A"),
            Rect::new(50.0, 100.0, 0.0, 100.0, FillValue::Category("y".into())).with_group("A"),
        ],
        "fill",
    );
    let scene = compose_scene(&table, &RenderConfig::default(), &Theme::default()).unwrap();
    assert_eq!(
        scene.groups[0].bounds,
        Bounds {
            xmin: 0.0,
            xmax: 100.0,
            ymin: 0.0,
            ymax: 100.0
        }
    );
    let label = &scene.group_labels[0];
    assert_eq!((label.x, label.y), (50.0, 50.0));
    assert_eq!(label.base_size, 100.0);
    assert!(scene.labels.is_empty());
}

#[test]
fn sales_label_scenario() {
    let table = TreemapTable::from_rows(
        vec![
            Rect::new(10.0, 60.0, 10.0, 60.0, FillValue::Number(1.0)).with_label("Sales"),
        ],
        "fill",
    );
    let config = RenderConfig::default().with_label_size(Some(0.5), None);
    let scene = compose_scene(&table, &config, &Theme::default()).unwrap();
    let label = &scene.labels[0];
    assert_eq!((label.x, label.y), (11.0, 59.0));
    assert_eq!(label.base_size, 10.0);
    assert!((0.5..=4.0).contains(&label.font_size));
}

#[test]
fn fixed_size_overrides_every_individual_label() {
    let table = load_table(&fixture("grouped.json")).unwrap();
    let config = RenderConfig::default().with_label_size(Some(3.0), Some(6.0));
    let scene = compose_scene(&table, &config, &Theme::default()).unwrap();
    assert!(scene.labels.iter().all(|l| l.font_size == 6.0));
    assert!(scene.warnings.contains(&RenderWarning::ConflictingSizeConfig {
        category: LabelCategory::Label,
        factor: 3.0,
        fixed: 6.0,
    }));
}

#[test]
fn render_is_pure() {
    let table = load_table(&fixture("grouped.json")).unwrap();
    let config = RenderConfig::default()
        .with_label_threshold(3.0)
        .with_group_label_size(Some(0.8), None);
    let first = compose_scene(&table, &config, &Theme::default()).unwrap();
    let second = compose_scene(&table, &config, &Theme::default()).unwrap();
    assert_eq!(first, second);
}
