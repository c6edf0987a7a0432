use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{RenderError, Result};
use crate::ir::{FillValue, Rect, TreemapTable};

const COORD_COLUMNS: [&str; 4] = ["xmin", "xmax", "ymin", "ymax"];
const DEFAULT_FILL_NAME: &str = "fill";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Json,
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv { Self::Csv } else { Self::Json }
    }
}

pub fn parse_table(input: &str, format: TableFormat) -> Result<TreemapTable> {
    match format {
        TableFormat::Json => parse_table_json(input),
        TableFormat::Csv => parse_table_csv(input, DEFAULT_FILL_NAME),
    }
}

pub fn load_table(path: &Path) -> anyhow::Result<TreemapTable> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_table(&contents, TableFormat::from_path(path))?)
}

/// Accepts `{ "fillName": "...", "rows": [ {...}, ... ] }` or a bare array of
/// row objects.
pub fn parse_table_json(input: &str) -> Result<TreemapTable> {
    let value: Value =
        serde_json::from_str(input).map_err(|err| RenderError::InvalidInput(err.to_string()))?;
    let (rows, fill_name) = match value {
        Value::Array(rows) => (rows, DEFAULT_FILL_NAME.to_string()),
        Value::Object(mut obj) => {
            let fill_name = obj
                .get("fillName")
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_FILL_NAME)
                .to_string();
            match obj.remove("rows") {
                Some(Value::Array(rows)) => (rows, fill_name),
                Some(_) => {
                    return Err(RenderError::InvalidInput(
                        "`rows` must be an array of objects".to_string(),
                    ));
                }
                None => {
                    return Err(RenderError::InvalidInput(
                        "expected an array of rows or an object with `rows`".to_string(),
                    ));
                }
            }
        }
        other => {
            return Err(RenderError::InvalidInput(format!(
                "expected an array of rows, got {}",
                json_kind(&other)
            )));
        }
    };

    let mut objects = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match row {
            Value::Object(obj) => objects.push(obj),
            other => {
                return Err(RenderError::InvalidInput(format!(
                    "row {idx} is {}, expected an object",
                    json_kind(&other)
                )));
            }
        }
    }

    let has_group = objects.iter().any(|obj| obj.contains_key("group"));
    let has_label = objects.iter().any(|obj| obj.contains_key("label"));

    let mut parsed = Vec::with_capacity(objects.len());
    for (row, obj) in objects.iter().enumerate() {
        parsed.push(json_row(row, obj)?);
    }
    normalize_fill(&mut parsed);

    Ok(TreemapTable {
        rows: parsed,
        has_group,
        has_label,
        fill_name,
    })
}

fn json_row(row: usize, obj: &Map<String, Value>) -> Result<Rect> {
    let mut coords = [0.0_f64; 4];
    for (slot, column) in coords.iter_mut().zip(COORD_COLUMNS) {
        let value = obj.get(column).ok_or(RenderError::MissingColumn(column))?;
        *slot = json_number(value).ok_or_else(|| RenderError::InvalidRectangle {
            row,
            reason: format!("`{column}` is not a number"),
        })?;
    }
    let fill = match obj.get("fill") {
        Some(Value::Number(n)) => FillValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) => FillValue::Category(s.clone()),
        Some(Value::Bool(b)) => FillValue::Category(b.to_string()),
        Some(_) => {
            return Err(RenderError::InvalidRectangle {
                row,
                reason: "`fill` must be a string or a number".to_string(),
            });
        }
        None => return Err(RenderError::MissingColumn("fill")),
    };
    Ok(Rect {
        xmin: coords[0],
        xmax: coords[1],
        ymin: coords[2],
        ymax: coords[3],
        fill,
        group: obj.get("group").and_then(json_text),
        label: obj.get("label").and_then(json_text),
    })
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// CSV with a header row. Empty `group`/`label` cells are missing values.
pub fn parse_table_csv(input: &str, fill_name: &str) -> Result<TreemapTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());
    let headers = reader
        .headers()
        .map_err(|err| RenderError::InvalidInput(err.to_string()))?
        .clone();
    let column = |name: &'static str| headers.iter().position(|h| h == name);

    let mut coord_idx = [0usize; 4];
    for (slot, name) in coord_idx.iter_mut().zip(COORD_COLUMNS) {
        *slot = column(name).ok_or(RenderError::MissingColumn(name))?;
    }
    let fill_idx = column("fill").ok_or(RenderError::MissingColumn("fill"))?;
    let group_idx = column("group");
    let label_idx = column("label");

    let mut rows = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|err| RenderError::InvalidInput(err.to_string()))?;
        let mut coords = [0.0_f64; 4];
        for ((slot, idx), name) in coords.iter_mut().zip(coord_idx).zip(COORD_COLUMNS) {
            let cell = record.get(idx).unwrap_or("");
            *slot = cell
                .parse::<f64>()
                .map_err(|_| RenderError::InvalidRectangle {
                    row,
                    reason: format!("`{name}` value `{cell}` is not a number"),
                })?;
        }
        let fill_cell = record.get(fill_idx).unwrap_or("");
        let fill = match fill_cell.parse::<f64>() {
            Ok(v) => FillValue::Number(v),
            Err(_) => FillValue::Category(fill_cell.to_string()),
        };
        let text_cell = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
        };
        rows.push(Rect {
            xmin: coords[0],
            xmax: coords[1],
            ymin: coords[2],
            ymax: coords[3],
            fill,
            group: text_cell(group_idx),
            label: text_cell(label_idx),
        });
    }
    normalize_fill(&mut rows);

    Ok(TreemapTable {
        rows,
        has_group: group_idx.is_some(),
        has_label: label_idx.is_some(),
        fill_name: fill_name.to_string(),
    })
}

// A fill column that mixes numbers and text is categorical.
fn normalize_fill(rows: &mut [Rect]) {
    let all_numeric = rows.iter().all(|r| r.fill.as_number().is_some());
    if all_numeric {
        return;
    }
    for rect in rows.iter_mut() {
        if let FillValue::Number(_) = rect.fill {
            rect.fill = FillValue::Category(rect.fill.as_key());
        }
    }
}
