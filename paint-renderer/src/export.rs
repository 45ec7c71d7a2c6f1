//! Scene export.
//!
//! Exports capture committed elements only: no selection outline and no
//! in-progress drawing.

use paint_core::Scene;

use crate::error::{RenderError, RenderResult};
use crate::Renderer;

/// Export configuration.
#[derive(Debug, Clone, Copy)]
pub struct ExportConfig {
    /// Output pixels per canvas pixel.
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// File name offered for a PNG export taken at `timestamp_ms`.
#[must_use]
pub fn export_file_name(timestamp_ms: u128) -> String {
    format!("onyx-design-{timestamp_ms}.png")
}

/// Exports a scene to PNG or SVG.
#[derive(Debug)]
pub struct SceneExporter {
    renderer: Renderer,
    config: ExportConfig,
}

impl SceneExporter {
    /// Create an exporter around a renderer.
    #[must_use]
    pub fn new(renderer: Renderer, config: ExportConfig) -> Self {
        Self { renderer, config }
    }

    /// Create an exporter with default renderer and export settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Renderer::with_defaults(), ExportConfig::default())
    }

    /// The renderer used for exports.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Export the scene as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if the scale is not positive or
    /// encoding fails.
    pub fn render_to_png(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let svg = self.render_to_svg(scene)?;
        let pixmap = self.renderer.rasterize(&svg)?;

        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;

        tracing::info!(
            "Exported {} elements as {}x{} PNG ({} bytes)",
            scene.len(),
            pixmap.width(),
            pixmap.height(),
            png.len()
        );
        Ok(png)
    }

    /// Export the scene as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if the scale is not positive, or an
    /// error if a placed image cannot be encoded.
    pub fn render_to_svg(&self, scene: &Scene) -> RenderResult<String> {
        if !(self.config.scale > 0.0 && self.config.scale.is_finite()) {
            return Err(RenderError::Export(format!(
                "Invalid export scale: {}",
                self.config.scale
            )));
        }
        self.renderer.write_frame(scene, None, self.config.scale, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RendererConfig;
    use paint_core::{Element, Point, Shape, Style, Vector};

    fn exporter(scale: f32) -> SceneExporter {
        let renderer = Renderer::new(RendererConfig {
            load_system_fonts: false,
            ..RendererConfig::default()
        });
        SceneExporter::new(renderer, ExportConfig { scale })
    }

    fn scene_with_selected_rect() -> Scene {
        let mut scene = Scene::new(120, 80);
        let id = scene.append(Element::new(
            Shape::Rectangle {
                origin: Point::new(20.0, 20.0),
                extent: Vector::new(40.0, 30.0),
            },
            Style::default(),
        ));
        scene.select(Some(id));
        scene
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name(1_700_000_000_123), "onyx-design-1700000000123.png");
    }

    #[test]
    fn test_png_has_signature_and_size() {
        let png = exporter(1.0).render_to_png(&scene_with_selected_rect()).expect("export");
        assert_eq!(&png[..4], &[137, 80, 78, 71]);

        let decoded = image::load_from_memory(&png).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn test_export_leaves_out_selection() {
        let scene = scene_with_selected_rect();
        let mut unselected = scene.clone();
        unselected.select(None);

        let e = exporter(1.0);
        assert_eq!(
            e.render_to_png(&scene).expect("export"),
            e.render_to_png(&unselected).expect("export")
        );
        assert!(!e.render_to_svg(&scene).expect("svg").contains("stroke-dasharray"));
    }

    #[test]
    fn test_scaled_export() {
        let png = exporter(2.0).render_to_png(&scene_with_selected_rect()).expect("export");
        let decoded = image::load_from_memory(&png).expect("decode");
        assert_eq!((decoded.width(), decoded.height()), (240, 160));
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let scene = Scene::new(10, 10);
        assert!(matches!(exporter(0.0).render_to_png(&scene), Err(RenderError::Export(_))));
        assert!(matches!(exporter(f32::NAN).render_to_svg(&scene), Err(RenderError::Export(_))));
    }
}
