use crate::error::{LabelCategory, RenderError, RenderWarning, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// ggplot-style size units are millimetres; SVG text is sized in points.
pub const MM_TO_PT: f32 = 72.27 / 25.4;

pub const DEFAULT_LABEL_COLOUR: &str = "#FFFFFF";
pub const DEFAULT_GROUP_LABEL_COLOUR: &str = "#A9A9A9";

/// How a label category derives its final size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum SizeMode {
    #[default]
    Unset,
    Factor(f64),
    Fixed(f64),
}

impl SizeMode {
    /// Combines the optional factor and fixed values of one category.
    ///
    /// A fixed size always wins. When it displaces a factor other than 1 the
    /// override is reported.
    pub fn resolve(
        category: LabelCategory,
        factor: Option<f64>,
        fixed: Option<f64>,
    ) -> (Self, Option<RenderWarning>) {
        match (factor, fixed) {
            (_, None) => (factor.map_or(SizeMode::Unset, SizeMode::Factor), None),
            (None, Some(fixed)) => (SizeMode::Fixed(fixed), None),
            (Some(factor), Some(fixed)) => {
                let warning = if factor != 1.0 {
                    Some(RenderWarning::ConflictingSizeConfig {
                        category,
                        factor,
                        fixed,
                    })
                } else {
                    None
                };
                (SizeMode::Fixed(fixed), warning)
            }
        }
    }

    /// Effective multiplier; neutral when unset or fixed.
    pub fn factor(self) -> f64 {
        match self {
            SizeMode::Factor(f) => f,
            SizeMode::Unset | SizeMode::Fixed(_) => 1.0,
        }
    }

    pub fn fixed(self) -> Option<f64> {
        match self {
            SizeMode::Fixed(v) => Some(v),
            _ => None,
        }
    }

    fn validate(self, category: LabelCategory) -> Result<()> {
        let (name, value) = match self {
            SizeMode::Unset => return Ok(()),
            SizeMode::Factor(v) => ("factor", v),
            SizeMode::Fixed(v) => ("fixed", v),
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(RenderError::InvalidConfig(format!(
                "{category}.size.{name} must be a positive number, got {value}"
            )));
        }
        Ok(())
    }
}

/// Label options for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub label_colour: String,
    pub label_size: SizeMode,
    pub label_size_threshold: Option<f64>,
    pub label_groups: bool,
    pub group_label_colour: String,
    pub group_label_size: SizeMode,
    pub group_label_size_threshold: Option<f64>,
    /// Overrides recorded while the config was assembled.
    pub warnings: Vec<RenderWarning>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            label_colour: DEFAULT_LABEL_COLOUR.to_string(),
            label_size: SizeMode::Unset,
            label_size_threshold: None,
            label_groups: true,
            group_label_colour: DEFAULT_GROUP_LABEL_COLOUR.to_string(),
            group_label_size: SizeMode::Unset,
            group_label_size_threshold: None,
            warnings: Vec::new(),
        }
    }
}

impl RenderConfig {
    pub fn with_label_size(mut self, factor: Option<f64>, fixed: Option<f64>) -> Self {
        self.label_size = self.resolve_size(LabelCategory::Label, factor, fixed);
        self
    }

    pub fn with_group_label_size(mut self, factor: Option<f64>, fixed: Option<f64>) -> Self {
        self.group_label_size = self.resolve_size(LabelCategory::Group, factor, fixed);
        self
    }

    /// Resolves one category's size, replacing any conflict reported by an
    /// earlier call for the same category.
    fn resolve_size(
        &mut self,
        category: LabelCategory,
        factor: Option<f64>,
        fixed: Option<f64>,
    ) -> SizeMode {
        let (mode, warning) = SizeMode::resolve(category, factor, fixed);
        self.warnings.retain(|w| {
            !matches!(w, RenderWarning::ConflictingSizeConfig { category: c, .. } if *c == category)
        });
        self.warnings.extend(warning);
        mode
    }

    pub fn with_label_threshold(mut self, threshold: f64) -> Self {
        self.label_size_threshold = Some(threshold);
        self
    }

    pub fn with_group_label_threshold(mut self, threshold: f64) -> Self {
        self.group_label_size_threshold = Some(threshold);
        self
    }

    pub fn with_label_groups(mut self, enabled: bool) -> Self {
        self.label_groups = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.label_size.validate(LabelCategory::Label)?;
        self.group_label_size.validate(LabelCategory::Group)?;
        for (category, threshold) in [
            (LabelCategory::Label, self.label_size_threshold),
            (LabelCategory::Group, self.group_label_size_threshold),
        ] {
            if let Some(t) = threshold
                && !t.is_finite()
            {
                return Err(RenderError::InvalidConfig(format!(
                    "{category}.size.threshold must be finite"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    /// Points per label size unit.
    pub size_unit: f32,
    pub legend_width: f32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background: "#FFFFFF".to_string(),
            size_unit: MM_TO_PT,
            legend_width: 160.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::treemap_default();
        let output = OutputConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            render: RenderConfig::default(),
            output,
        }
    }
}

impl Config {
    pub fn warnings(&self) -> &[RenderWarning] {
        &self.render.warnings
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    label_colour: Option<String>,
    label_size_factor: Option<f64>,
    label_size_threshold: Option<f64>,
    label_size_fixed: Option<f64>,
    label_groups: Option<bool>,
    group_label_colour: Option<String>,
    group_label_size_factor: Option<f64>,
    group_label_size_threshold: Option<f64>,
    group_label_size_fixed: Option<f64>,
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON5 config document and overlays it on the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(name) = parsed.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme `{name}`"))?;
        config.output.background = config.theme.background.clone();
    }

    let mut render = RenderConfig::default()
        .with_label_size(parsed.label_size_factor, parsed.label_size_fixed)
        .with_group_label_size(parsed.group_label_size_factor, parsed.group_label_size_fixed);
    if let Some(v) = parsed.label_colour {
        render.label_colour = v;
    }
    if let Some(v) = parsed.group_label_colour {
        render.group_label_colour = v;
    }
    render.label_size_threshold = parsed.label_size_threshold;
    render.group_label_size_threshold = parsed.group_label_size_threshold;
    if let Some(v) = parsed.label_groups {
        render.label_groups = v;
    }
    render.validate()?;
    for warning in &render.warnings {
        warning.emit();
    }
    config.render = render;

    if let Some(v) = parsed.width {
        config.output.width = v;
    }
    if let Some(v) = parsed.height {
        config.output.height = v;
    }
    if let Some(v) = parsed.background {
        config.output.background = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_overrides_factor_with_warning() {
        let (mode, warning) = SizeMode::resolve(LabelCategory::Label, Some(0.5), Some(6.0));
        assert_eq!(mode, SizeMode::Fixed(6.0));
        assert_eq!(mode.factor(), 1.0);
        assert_eq!(
            warning,
            Some(RenderWarning::ConflictingSizeConfig {
                category: LabelCategory::Label,
                factor: 0.5,
                fixed: 6.0,
            })
        );
    }

    #[test]
    fn rebuilding_a_size_drops_its_stale_conflict() {
        let config = RenderConfig::default()
            .with_group_label_size(Some(2.0), Some(5.0))
            .with_label_size(Some(2.0), Some(3.0))
            .with_label_size(None, Some(3.0));
        assert_eq!(config.label_size, SizeMode::Fixed(3.0));
        assert_eq!(
            config.warnings,
            vec![RenderWarning::ConflictingSizeConfig {
                category: LabelCategory::Group,
                factor: 2.0,
                fixed: 5.0,
            }]
        );

        let config = config.with_group_label_size(Some(1.0), Some(5.0));
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn neutral_factor_with_fixed_is_silent() {
        let (mode, warning) = SizeMode::resolve(LabelCategory::Group, Some(1.0), Some(4.0));
        assert_eq!(mode, SizeMode::Fixed(4.0));
        assert!(warning.is_none());
    }

    #[test]
    fn parses_json5_overlay() {
        let config = parse_config(
            r#"{
                // comments are allowed
                theme: "modern",
                labelSizeFactor: 0.5,
                groupLabelSizeThreshold: 20,
                labelGroups: false,
                width: 1024,
            }"#,
        )
        .unwrap();
        assert_eq!(config.render.label_size, SizeMode::Factor(0.5));
        assert_eq!(config.render.group_label_size_threshold, Some(20.0));
        assert!(!config.render.label_groups);
        assert_eq!(config.output.width, 1024.0);
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn config_file_conflict_is_kept_as_warning() {
        let config =
            parse_config(r#"{ groupLabelSizeFactor: 2, groupLabelSizeFixed: 9 }"#).unwrap();
        assert_eq!(config.render.group_label_size, SizeMode::Fixed(9.0));
        assert_eq!(config.warnings().len(), 1);
    }

    #[test]
    fn rejects_non_positive_sizes() {
        assert!(parse_config(r#"{ labelSizeFixed: 0 }"#).is_err());
        let config = RenderConfig::default().with_group_label_size(Some(-1.0), None);
        assert!(matches!(
            config.validate(),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(parse_config(r#"{ theme: "neon" }"#).is_err());
    }
}
