//! # Onyx Paint Renderer
//!
//! Full-redraw renderer for paint scenes.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────┐
//! │   Scene   │───▶│  SVG frame   │───▶│ usvg / resvg │───▶│  Pixmap  │
//! │ + pending │    │ (svg module) │    │  rasterize   │    │  (RGBA)  │
//! └───────────┘    └──────────────┘    └──────────────┘    └──────────┘
//! ```
//!
//! Every state change redraws the whole canvas. The renderer only reads the
//! scene.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod export;
pub mod image;
pub mod import;
pub mod svg;

use std::sync::{Arc, Mutex, PoisonError};

pub use cache::{CacheStats, ImageUriCache};
pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, SceneExporter};
pub use import::ImageImporter;

use paint_core::{Color, Element, PaintState, Scene};
use tiny_skia::Pixmap;

use crate::svg::FrameStyle;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Canvas clear color, also painted by the eraser.
    pub background: Color,
    /// Color of the dashed selection outline.
    pub selection_color: Color,
    /// Font family list for text elements.
    pub font_family: String,
    /// Load system fonts so text elements are rasterized.
    pub load_system_fonts: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x0a, 0x0a, 0x0a),
            selection_color: Color::rgb(0xa8, 0x55, 0xf7),
            font_family: "Inter, sans-serif".to_string(),
            load_system_fonts: true,
        }
    }
}

/// Turns scenes into pixel buffers.
pub struct Renderer {
    config: RendererConfig,
    options: usvg::Options<'static>,
    images: Mutex<ImageUriCache>,
}

impl Renderer {
    /// Create a renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let mut options = usvg::Options::default();
        if config.load_system_fonts {
            let mut fonts = usvg::fontdb::Database::new();
            fonts.load_system_fonts();
            tracing::debug!("Loaded {} font faces", fonts.len());
            options.fontdb = Arc::new(fonts);
        }
        Self {
            config,
            options,
            images: Mutex::new(ImageUriCache::new()),
        }
    }

    /// Create a renderer with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(RendererConfig::default())
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render a frame: committed elements, the in-progress element and the
    /// selection outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be rasterized.
    pub fn render(&self, scene: &Scene, in_progress: Option<&Element>) -> RenderResult<Pixmap> {
        let svg = self.render_svg(scene, in_progress)?;
        self.rasterize(&svg)
    }

    /// Render the current frame of an interactive session.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be rasterized.
    pub fn render_state(&self, state: &PaintState) -> RenderResult<Pixmap> {
        self.render(state.scene(), state.in_progress())
    }

    /// Write the frame [`Renderer::render`] would draw as SVG.
    ///
    /// # Errors
    ///
    /// Returns an error if a placed image cannot be encoded.
    pub fn render_svg(&self, scene: &Scene, in_progress: Option<&Element>) -> RenderResult<String> {
        self.write_frame(scene, in_progress, 1.0, true)
    }

    /// Statistics of the placed-image cache.
    #[must_use]
    pub fn image_cache_stats(&self) -> CacheStats {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stats()
    }

    pub(crate) fn write_frame(
        &self,
        scene: &Scene,
        in_progress: Option<&Element>,
        scale: f32,
        show_selection: bool,
    ) -> RenderResult<String> {
        let style = FrameStyle {
            background: self.config.background,
            selection_color: self.config.selection_color,
            font_family: &self.config.font_family,
            scale,
            show_selection,
        };
        let mut images = self.images.lock().unwrap_or_else(PoisonError::into_inner);
        svg::frame_to_svg(scene, in_progress, &style, &mut images)
    }

    /// Rasterize an SVG document to a pixmap.
    ///
    /// # Errors
    ///
    /// Returns an error if the SVG cannot be parsed or the pixmap allocated.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rasterize(&self, svg: &str) -> RenderResult<Pixmap> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| RenderError::Render(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().ceil() as u32;
        let px_h = tree.size().height().ceil() as u32;

        let mut pixmap = Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Render("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
