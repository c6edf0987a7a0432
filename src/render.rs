use crate::config::OutputConfig;
use crate::layout::{Bounds, HAlign, LabelSpec, VAlign};
use crate::scene::{DrawOp, Legend, Scene};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const PANEL_MARGIN: f32 = 10.0;
const LEGEND_KEY_SIZE: f32 = 14.0;
const LEGEND_ROW_GAP: f32 = 6.0;
const LEGEND_BAR_HEIGHT: f32 = 120.0;

/// Maps layout coordinates (y up) onto the SVG panel (y down).
///
/// The axes scale independently: the extent fills the panel and a non-square
/// extent stretches with it.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    extent: Bounds,
    left: f32,
    top: f32,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(extent: Bounds, width: f32, height: f32) -> Self {
        let sx = width / extent.width().max(1e-9) as f32;
        let sy = height / extent.height().max(1e-9) as f32;
        Self {
            extent,
            left: PANEL_MARGIN,
            top: PANEL_MARGIN,
            sx,
            sy,
        }
    }

    fn x(&self, x: f64) -> f32 {
        self.left + (x - self.extent.xmin) as f32 * self.sx
    }

    fn y(&self, y: f64) -> f32 {
        self.top + (self.extent.ymax - y) as f32 * self.sy
    }

    /// (x, y, w, h) in SVG space.
    fn rect(&self, b: &Bounds) -> (f32, f32, f32, f32) {
        let x = self.x(b.xmin);
        let y = self.y(b.ymax);
        (x, y, self.x(b.xmax) - x, self.y(b.ymin) - y)
    }
}

pub fn render_svg(scene: &Scene, theme: &Theme, output: &OutputConfig) -> String {
    let width = output.width.max(200.0);
    let height = output.height.max(200.0);
    let legend_width = output.legend_width.max(0.0);
    let panel_w = (width - legend_width - PANEL_MARGIN * 2.0).max(1.0);
    let panel_h = (height - PANEL_MARGIN * 2.0).max(1.0);
    let view = Viewport::new(scene.extent, panel_w, panel_h);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&output.background)
    ));
    if let Legend::Gradient { low, high, .. } = &scene.legend {
        svg.push_str(&format!(
            "<defs><linearGradient id=\"fill-gradient\" x1=\"0\" y1=\"1\" x2=\"0\" y2=\"0\"><stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/></linearGradient></defs>",
            escape_xml(low),
            escape_xml(high)
        ));
    }

    // Clip to the panel so oversized labels do not spill over the legend.
    svg.push_str(&format!(
        "<clipPath id=\"panel\"><rect x=\"{PANEL_MARGIN}\" y=\"{PANEL_MARGIN}\" width=\"{panel_w:.2}\" height=\"{panel_h:.2}\"/></clipPath><g clip-path=\"url(#panel)\">"
    ));
    for op in &scene.ops {
        match op {
            DrawOp::FillRect { bounds, color } => {
                let (x, y, w, h) = view.rect(bounds);
                svg.push_str(&format!(
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" fill=\"{}\"/>",
                    escape_xml(color)
                ));
            }
            DrawOp::StrokeRect {
                bounds,
                color,
                width: stroke_width,
                ..
            } => {
                let (x, y, w, h) = view.rect(bounds);
                svg.push_str(&format!(
                    "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width}\"/>",
                    escape_xml(color)
                ));
            }
            DrawOp::Text(label) => {
                svg.push_str(&text_svg(label, &view, theme, output.size_unit));
            }
        }
    }
    svg.push_str("</g>");

    svg.push_str(&legend_svg(
        &scene.legend,
        width - legend_width + PANEL_MARGIN,
        theme,
    ));
    svg.push_str("</svg>");
    svg
}

fn text_svg(label: &LabelSpec, view: &Viewport, theme: &Theme, size_unit: f32) -> String {
    let x = view.x(label.x);
    let y = view.y(label.y);
    let anchor = match label.h_align {
        HAlign::Left => "start",
        HAlign::Center => "middle",
    };
    let baseline = match label.v_align {
        VAlign::Top => "hanging",
        VAlign::Bottom => "text-after-edge",
    };
    let font_size = label.font_size as f32 * size_unit;
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\" font-family=\"{}\" font-size=\"{font_size:.2}\" fill=\"{}\" fill-opacity=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        escape_xml(&label.colour),
        label.alpha(),
        escape_xml(&label.text)
    )
}

fn legend_svg(legend: &Legend, left: f32, theme: &Theme) -> String {
    let font = escape_xml(&theme.font_family);
    let size = theme.legend_font_size;
    let color = escape_xml(&theme.legend_text_color);
    let mut svg = String::new();
    let mut y = PANEL_MARGIN + size;
    svg.push_str(&format!(
        "<text x=\"{left:.2}\" y=\"{y:.2}\" font-family=\"{font}\" font-size=\"{size}\" font-weight=\"bold\" fill=\"{color}\">{}</text>",
        escape_xml(legend.title())
    ));
    y += LEGEND_ROW_GAP;
    match legend {
        Legend::Discrete { entries, .. } => {
            for entry in entries {
                svg.push_str(&format!(
                    "<rect x=\"{left:.2}\" y=\"{y:.2}\" width=\"{LEGEND_KEY_SIZE}\" height=\"{LEGEND_KEY_SIZE}\" fill=\"{}\"/>",
                    escape_xml(&entry.color)
                ));
                let text_x = left + LEGEND_KEY_SIZE + LEGEND_ROW_GAP;
                let text_y = y + LEGEND_KEY_SIZE / 2.0;
                svg.push_str(&format!(
                    "<text x=\"{text_x:.2}\" y=\"{text_y:.2}\" dominant-baseline=\"middle\" font-family=\"{font}\" font-size=\"{size}\" fill=\"{color}\">{}</text>",
                    escape_xml(&entry.label)
                ));
                y += LEGEND_KEY_SIZE + LEGEND_ROW_GAP;
            }
        }
        Legend::Gradient { min, max, .. } => {
            svg.push_str(&format!(
                "<rect x=\"{left:.2}\" y=\"{y:.2}\" width=\"{LEGEND_KEY_SIZE}\" height=\"{LEGEND_BAR_HEIGHT}\" fill=\"url(#fill-gradient)\"/>"
            ));
            let text_x = left + LEGEND_KEY_SIZE + LEGEND_ROW_GAP;
            svg.push_str(&format!(
                "<text x=\"{text_x:.2}\" y=\"{y:.2}\" dominant-baseline=\"hanging\" font-family=\"{font}\" font-size=\"{size}\" fill=\"{color}\">{}</text>",
                format_value(*max)
            ));
            let bottom = y + LEGEND_BAR_HEIGHT;
            svg.push_str(&format!(
                "<text x=\"{text_x:.2}\" y=\"{bottom:.2}\" font-family=\"{font}\" font-size=\"{size}\" fill=\"{color}\">{}</text>",
                format_value(*min)
            ));
        }
    }
    svg
}

fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if (rounded - rounded.round()).abs() < 0.001 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.2}", rounded)
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &OutputConfig) -> Result<()> {
    let mut opt = usvg::Options {
        default_size: usvg::Size::from_wh(render_cfg.width, render_cfg.height)
            .or_else(|| usvg::Size::from_wh(800.0, 600.0))
            .ok_or_else(|| anyhow::anyhow!("Invalid output size"))?,
        ..usvg::Options::default()
    };
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &OutputConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
