//! # Onyx Paint CLI
//!
//! Headless host for the paint canvas. Replays an interaction script against
//! a fresh canvas, places imported images and exports the result as PNG.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p paint-cli -- --script session.json --output design.png
//! ```
//!
//! ## With images:
//!
//! ```bash
//! cargo run -p paint-cli -- --import photo.jpg --import logo.png --svg design.svg
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod script;

pub use script::{Script, ScriptError, ScriptStep};

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use paint_core::scene::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use paint_core::{Color, PaintState};
use paint_renderer::export::export_file_name;
use paint_renderer::{ExportConfig, ImageImporter, Renderer, RendererConfig, SceneExporter};

/// Command-line arguments for onyx-paint.
#[derive(Debug, Clone, Parser)]
#[command(name = "onyx-paint")]
#[command(about = "Replay a paint session and export it as PNG")]
#[command(version)]
pub struct CliArgs {
    /// JSON interaction script to replay
    #[arg(long, env = "ONYX_PAINT_SCRIPT")]
    pub script: Option<PathBuf>,

    /// PNG output path (defaults to onyx-design-<timestamp>.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also write the exported frame as SVG
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Canvas background color (e.g., #0a0a0a)
    #[arg(long, env = "ONYX_PAINT_BACKGROUND")]
    pub background: Option<Color>,

    /// Export scale factor
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,

    /// Image files to place before the script runs
    #[arg(long = "import", value_name = "PATH")]
    pub imports: Vec<PathBuf>,
}

/// Paint host configuration.
#[derive(Debug, Clone)]
pub struct PaintConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Script to replay.
    pub script: Option<PathBuf>,
    /// PNG output path; `None` picks a timestamped name.
    pub output: Option<PathBuf>,
    /// Optional SVG output path.
    pub svg_output: Option<PathBuf>,
    /// Images placed before the script runs.
    pub imports: Vec<PathBuf>,
    /// Renderer settings.
    pub renderer: RendererConfig,
    /// Export settings.
    pub export: ExportConfig,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            script: None,
            output: None,
            svg_output: None,
            imports: Vec::new(),
            renderer: RendererConfig::default(),
            export: ExportConfig::default(),
        }
    }

    /// The PNG path to write, naming it after the current time if unset.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            PathBuf::from(export_file_name(now))
        })
    }
}

impl From<CliArgs> for PaintConfig {
    fn from(args: CliArgs) -> Self {
        let mut renderer = RendererConfig::default();
        if let Some(background) = args.background {
            renderer.background = background;
        }
        Self {
            width: args.width,
            height: args.height,
            script: args.script,
            output: args.output,
            svg_output: args.svg,
            imports: args.imports,
            renderer,
            export: ExportConfig { scale: args.scale },
        }
    }
}

/// Build the canvas: place command-line imports, then replay the script.
///
/// # Errors
///
/// Returns an error if the script cannot be loaded.
pub async fn run(config: &PaintConfig) -> anyhow::Result<PaintState> {
    let script = config
        .script
        .as_deref()
        .map(Script::load)
        .transpose()
        .context("Failed to load script")?;

    let mut state = PaintState::new(config.width, config.height);
    let mut importer = ImageImporter::new();

    for path in &config.imports {
        importer.import_path(path.clone());
    }
    let placed = importer.finish(&mut state).await;
    if !config.imports.is_empty() {
        tracing::info!("Placed {placed} of {} images", config.imports.len());
    }

    if let Some(script) = script {
        tracing::info!("Replaying {} steps", script.steps().len());
        script.replay(&mut state, &mut importer).await;
    }
    importer.finish(&mut state).await;

    Ok(state)
}

/// Export the committed scene to the configured outputs. Returns the PNG path.
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn export(state: &PaintState, config: &PaintConfig) -> anyhow::Result<PathBuf> {
    let exporter = SceneExporter::new(Renderer::new(config.renderer.clone()), config.export);

    let png_path = config.output_path();
    let png = exporter.render_to_png(state.scene())?;
    write_file(&png_path, &png)?;
    tracing::info!("Wrote {}", png_path.display());

    if let Some(svg_path) = &config.svg_output {
        let svg = exporter.render_to_svg(state.scene())?;
        write_file(svg_path, svg.as_bytes())?;
        tracing::info!("Wrote {}", svg_path.display());
    }

    Ok(png_path)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
