use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::{FillValue, TreemapTable};
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Legend {
    Discrete {
        title: String,
        entries: Vec<LegendEntry>,
    },
    Gradient {
        title: String,
        min: f64,
        max: f64,
        low: String,
        high: String,
    },
}

impl Legend {
    pub fn title(&self) -> &str {
        match self {
            Legend::Discrete { title, .. } | Legend::Gradient { title, .. } => title,
        }
    }
}

/// Maps fill values to colours: palette cycling for categories, a linear
/// two-colour gradient for numbers.
#[derive(Debug, Clone)]
pub enum FillScale {
    Discrete(BTreeMap<String, String>),
    Gradient {
        min: f64,
        max: f64,
        low: String,
        high: String,
    },
}

impl FillScale {
    pub fn from_table(table: &TreemapTable, theme: &Theme) -> Self {
        if table.is_numeric_fill() {
            let (min, max) = table
                .rows
                .iter()
                .filter_map(|r| r.fill.as_number())
                .filter(|v| v.is_finite())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
            let (min, max) = if min <= max { (min, max) } else { (0.0, 0.0) };
            return FillScale::Gradient {
                min,
                max,
                low: theme.gradient_low.clone(),
                high: theme.gradient_high.clone(),
            };
        }
        let mut levels: BTreeMap<String, String> = table
            .rows
            .iter()
            .map(|r| (r.fill.as_key(), String::new()))
            .collect();
        for (idx, color) in levels.values_mut().enumerate() {
            *color = theme.palette_color(idx).to_string();
        }
        FillScale::Discrete(levels)
    }

    pub fn color(&self, value: &FillValue) -> String {
        match self {
            FillScale::Discrete(levels) => levels
                .get(&value.as_key())
                .cloned()
                .unwrap_or_else(|| "#808080".to_string()),
            FillScale::Gradient {
                min,
                max,
                low,
                high,
            } => {
                let v = value.as_number().unwrap_or(*min);
                let span = max - min;
                let t = if span.abs() < 1e-12 {
                    0.5
                } else {
                    ((v - min) / span).clamp(0.0, 1.0)
                };
                mix_hex(low, high, t).unwrap_or_else(|| high.clone())
            }
        }
    }

    pub fn legend(&self, title: &str) -> Legend {
        match self {
            FillScale::Discrete(levels) => Legend::Discrete {
                title: title.to_string(),
                entries: levels
                    .iter()
                    .map(|(label, color)| LegendEntry {
                        label: label.clone(),
                        color: color.clone(),
                    })
                    .collect(),
            },
            FillScale::Gradient {
                min,
                max,
                low,
                high,
            } => Legend::Gradient {
                title: title.to_string(),
                min: *min,
                max: *max,
                low: low.clone(),
                high: high.clone(),
            },
        }
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn mix_hex(low: &str, high: &str, t: f64) -> Option<String> {
    let a = parse_hex(low)?;
    let b = parse_hex(high)?;
    let mix = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * t).round() as u8;
    Some(format!("#{:02X}{:02X}{:02X}", mix(0), mix(1), mix(2)))
}
