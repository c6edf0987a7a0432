#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod render;
pub mod scene;
pub mod scene_dump;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, OutputConfig, RenderConfig, SizeMode, load_config};
pub use error::{LabelCategory, RenderError, RenderWarning};
pub use ir::{FillValue, Rect, TreemapTable};
pub use layout::{GroupBox, LabelSpec, compute_layout, reduce_groups};
pub use parser::{load_table, parse_table_csv, parse_table_json};
pub use render::render_svg;
pub use scene::{DrawOp, Scene, compose_scene};
pub use theme::Theme;
