use crate::config::load_config;
use crate::ir::TreemapTable;
use crate::parser::{TableFormat, parse_table};
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::scene::compose_scene;
use crate::scene_dump::write_scene_dump;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "tmlabel",
    version,
    about = "Render a precomputed treemap layout with adaptive labels"
)]
pub struct Args {
    /// Input table (.json or .csv) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Input format; inferred from the file extension when omitted
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<InputFormat>,

    /// Legend title for the fill column (overrides the table's own)
    #[arg(long = "fill-name")]
    pub fill_name: Option<String>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Write the resolved labels as JSON to this path
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum InputFormat {
    Json,
    Csv,
}

impl From<InputFormat> for TableFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Json => TableFormat::Json,
            InputFormat::Csv => TableFormat::Csv,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.output.width = width;
    }
    if let Some(height) = args.height {
        config.output.height = height;
    }

    let table = read_table(args.input.as_deref(), args.format, args.fill_name.as_deref())?;
    let scene = compose_scene(&table, &config.render, &config.theme)?;
    if let Some(path) = args.dump.as_deref() {
        write_scene_dump(path, &scene)?;
    }

    let svg = render_svg(&scene, &config.theme, &config.output);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.output)?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("treemap_labels=warn"));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn read_table(
    path: Option<&Path>,
    format: Option<InputFormat>,
    fill_name: Option<&str>,
) -> Result<TreemapTable> {
    let (contents, inferred) = match path {
        Some(path) if path != Path::new("-") => {
            (std::fs::read_to_string(path)?, TableFormat::from_path(path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            (buf, TableFormat::Json)
        }
    };
    let format = format.map(TableFormat::from).unwrap_or(inferred);
    let mut table = parse_table(&contents, format)?;
    if let Some(name) = fill_name {
        table.fill_name = name.to_string();
    }
    Ok(table)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
