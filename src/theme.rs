use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub border_color: String,
    pub rect_border_width: f32,
    pub group_border_width: f32,
    pub panel_border_width: f32,
    pub legend_text_color: String,
    pub legend_font_size: f32,
    pub palette: Vec<String>,
    pub gradient_low: String,
    pub gradient_high: String,
}

impl Theme {
    pub fn treemap_default() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            border_color: "#BEBEBE".to_string(),
            rect_border_width: 0.5,
            group_border_width: 2.0,
            panel_border_width: 3.0,
            legend_text_color: "#333333".to_string(),
            legend_font_size: 11.0,
            palette: [
                "#F8766D", "#DE8C00", "#B79F00", "#7CAE00", "#00BA38", "#00C08B", "#00BFC4",
                "#00B4F0", "#619CFF", "#C77CFF", "#F564E3", "#FF64B0",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            gradient_low: "#132B43".to_string(),
            gradient_high: "#56B1F7".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            border_color: "#C7D2E5".to_string(),
            rect_border_width: 0.6,
            group_border_width: 1.6,
            panel_border_width: 2.0,
            legend_text_color: "#1C2430".to_string(),
            legend_font_size: 12.0,
            palette: [
                "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1",
                "#FF9DA7", "#9C755F", "#BAB0AC",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            gradient_low: "#EEF2F8".to_string(),
            gradient_high: "#1C4E80".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" | "base" => Some(Self::treemap_default()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }

    pub fn palette_color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return self.gradient_high.as_str();
        }
        self.palette[index % self.palette.len()].as_str()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::treemap_default()
    }
}
