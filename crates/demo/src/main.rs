// File: crates/demo/src/main.rs
// Summary: Demo loads a series CSV and renders the streamgraph to PNG, with optional hover tooltip and SVG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use stream_core::{theme, ChartConfig, Streamgraph};
use stream_render_skia::{render_to_png, RenderOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "streamgraph-demo", version, about = "Render a streamgraph from a CSV file")]
struct Cli {
    /// Input CSV with a date column and one numeric column per series.
    #[arg(default_value = "crates/demo/data/models.csv")]
    input: PathBuf,

    /// Series columns in stack order (comma separated). Defaults to the reference model list.
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Name of the date column.
    #[arg(long, default_value = "Date")]
    date_field: String,

    /// Series colors as #rrggbb, parallel to the keys (comma separated).
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Theme preset (light, dark).
    #[arg(long, default_value = "light")]
    theme: String,

    /// Also render a second PNG with this series hovered.
    #[arg(long)]
    hover: Option<String>,

    /// Pointer position used for the hover render.
    #[arg(long, default_value_t = 120.0)]
    hover_x: f64,
    #[arg(long, default_value_t = 60.0)]
    hover_y: f64,

    /// Write the chart scene as SVG next to the PNG.
    #[arg(long, default_value_t = false)]
    svg: bool,

    /// Skip text (axis and legend labels).
    #[arg(long, default_value_t = false)]
    no_labels: bool,

    /// Output directory.
    #[arg(long, default_value = "target/out")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let (path, used_alt) = resolve_path(&cli.input)?;
    if used_alt {
        tracing::info!(path = %path.display(), "extension swapped between .csv/.cvs");
    }

    let raw = stream_core::read_csv_path(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    tracing::info!(rows = raw.len(), path = %path.display(), "loaded csv");

    let config = build_config(&cli)?;
    let graph = Streamgraph::build(config, &raw)
        .context("failed to lay out dataset")?
        .with_theme(theme::find(&cli.theme));
    if graph.records.is_empty() {
        tracing::warn!("no rows loaded; rendering an empty chart");
    }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("streamgraph");
    let opts = RenderOptions { draw_labels: !cli.no_labels, hover: None };

    let png = cli.out.join(format!("{stem}.png"));
    render_to_png(&graph, &opts, &png)?;
    tracing::info!(path = %png.display(), "wrote chart");

    if let Some(key) = &cli.hover {
        let hover_opts = RenderOptions { hover: Some((key.clone(), cli.hover_x, cli.hover_y)), ..opts.clone() };
        let png = cli.out.join(format!("{stem}_hover_{}.png", file_safe(key)));
        render_to_png(&graph, &hover_opts, &png)?;
        tracing::info!(path = %png.display(), %key, "wrote hover chart");
    }

    if cli.svg {
        let svg = cli.out.join(format!("{stem}.svg"));
        std::fs::create_dir_all(&cli.out)?;
        std::fs::write(&svg, graph.scene().to_svg()).with_context(|| format!("writing {}", svg.display()))?;
        tracing::info!(path = %svg.display(), "wrote svg");
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<ChartConfig> {
    let mut config = if cli.keys.is_empty() { ChartConfig::default() } else { ChartConfig::for_keys(cli.keys.clone()) };
    if !cli.colors.is_empty() {
        let colors: Vec<&str> = cli.colors.iter().map(String::as_str).collect();
        config = config.with_hex_colors(&colors)?;
    }
    let config = config.with_size(cli.width, cli.height).with_date_field(cli.date_field.clone());
    config.validate()?;
    Ok(config)
}

fn file_safe(s: &str) -> String {
    s.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

/// Use `p` as given, or with its extension swapped between `.csv` and `.cvs` if only that exists.
fn resolve_path(p: &Path) -> Result<(PathBuf, bool)> {
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    let alt = match p.extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case("csv") => Some(p.with_extension("cvs")),
        Some(e) if e.eq_ignore_ascii_case("cvs") => Some(p.with_extension("csv")),
        _ => None,
    };
    match alt {
        Some(alt) if alt.exists() => Ok((alt, true)),
        _ => anyhow::bail!("input file not found: {}", p.display()),
    }
}
