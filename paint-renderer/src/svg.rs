//! SVG projection of a paint scene.
//!
//! A frame is written as one SVG document: background, every element in paint
//! order, the in-progress element last, and a dashed outline right after the
//! selected element. The document is then rasterized by [`crate::Renderer`].

use std::fmt::Write;

use paint_core::{Bounds, Color, Element, Point, Scene, Shape};

use crate::cache::ImageUriCache;
use crate::error::RenderResult;

/// Padding between an element's bounds and its selection outline.
pub const SELECTION_PADDING: f32 = 10.0;

/// Selection outline stroke width.
const SELECTION_STROKE: f32 = 2.0;

/// Selection outline dash pattern.
const SELECTION_DASH: &str = "8 4";

/// How a frame is written.
#[derive(Debug, Clone)]
pub struct FrameStyle<'a> {
    /// Canvas clear color; also the eraser color.
    pub background: Color,
    /// Selection outline color.
    pub selection_color: Color,
    /// Font family list for text.
    pub font_family: &'a str,
    /// Output pixels per canvas pixel.
    pub scale: f32,
    /// Whether to draw the selection outline.
    pub show_selection: bool,
}

/// Write a full frame as an SVG document. Placed images are taken from
/// `images`, which is pruned to the images of this frame.
///
/// # Errors
///
/// Returns an error if a placed image cannot be encoded.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn frame_to_svg(
    scene: &Scene,
    in_progress: Option<&Element>,
    style: &FrameStyle<'_>,
    images: &mut ImageUriCache,
) -> RenderResult<String> {
    let view_w = scene.width.max(1);
    let view_h = scene.height.max(1);
    let out_w = ((view_w as f32 * style.scale) as u32).max(1);
    let out_h = ((view_h as f32 * style.scale) as u32).max(1);

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
    );

    let _ = write!(
        svg,
        "<rect width=\"{view_w}\" height=\"{view_h}\"{}/>",
        paint("fill", style.background),
    );

    let selected = if style.show_selection {
        scene.selected()
    } else {
        None
    };

    images.begin_frame();
    for element in scene.elements().iter().chain(in_progress) {
        render_element_svg(&mut svg, element, style, images)?;
        if Some(element.id) == selected {
            render_selection_svg(&mut svg, element, style.selection_color);
        }
    }

    images.end_frame();

    svg.push_str("</svg>");
    Ok(svg)
}

/// Render a single element to SVG.
fn render_element_svg(
    svg: &mut String,
    element: &Element,
    style: &FrameStyle<'_>,
    images: &mut ImageUriCache,
) -> RenderResult<()> {
    let el_style = &element.style;
    let width = el_style.stroke_width;
    let primary = el_style.primary;

    tracing::trace!("Render {:?} element {}", element.kind(), element.id);

    match &element.shape {
        Shape::Freehand { points } => polyline(svg, points, primary, width),
        Shape::Eraser { points } => polyline(svg, points, style.background, width),

        Shape::Line { origin, extent } => {
            let end = origin.offset(*extent);
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{} stroke-width=\"{width}\" stroke-linecap=\"round\"/>",
                origin.x,
                origin.y,
                end.x,
                end.y,
                paint("stroke", primary),
            );
        }

        Shape::Rectangle { origin, extent } => {
            let b = Bounds::from_extent(*origin, *extent);
            if b.width < f32::EPSILON || b.height < f32::EPSILON {
                // A flat box has no area; its outline still draws as a bar.
                let end = origin.offset(*extent);
                let _ = write!(
                    svg,
                    "<path d=\"M{},{} L{},{}\" fill=\"none\"{} stroke-width=\"{width}\" stroke-linecap=\"square\"/>",
                    origin.x,
                    origin.y,
                    end.x,
                    end.y,
                    paint("stroke", primary),
                );
                return Ok(());
            }
            let fill = fill_attrs(svg, element, *origin, origin.offset(*extent));
            let _ = write!(
                svg,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{fill}{} stroke-width=\"{width}\" stroke-linejoin=\"round\"/>",
                b.x,
                b.y,
                b.width,
                b.height,
                paint("stroke", primary),
            );
        }

        Shape::Circle { center, extent } => {
            let fill = fill_attrs(svg, element, *center, center.offset(*extent));
            let _ = write!(
                svg,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"{fill}{} stroke-width=\"{width}\"/>",
                center.x,
                center.y,
                extent.length(),
                paint("stroke", primary),
            );
        }

        Shape::Text { origin, content } => {
            let font_size = el_style.font_size();
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" font-size=\"{font_size}\" font-weight=\"bold\" font-family=\"{}\"{}>{}</text>",
                origin.x,
                origin.y + font_size,
                escape_xml(style.font_family),
                paint("fill", primary),
                escape_xml(content),
            );
        }

        Shape::Image {
            origin,
            size,
            raster,
        } => {
            let href = images.data_uri(element.id, raster)?;
            let _ = write!(
                svg,
                "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" href=\"{href}\"/>",
                origin.x, origin.y, size.dx, size.dy,
            );
        }
    }
    Ok(())
}

/// Dashed outline around an element's bounds.
fn render_selection_svg(svg: &mut String, element: &Element, color: Color) {
    let b = element.bounds().expand(SELECTION_PADDING);
    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\"{} stroke-width=\"{SELECTION_STROKE}\" stroke-dasharray=\"{SELECTION_DASH}\"/>",
        b.x,
        b.y,
        b.width,
        b.height,
        paint("stroke", color),
    );
}

/// Round-capped polyline through stroke samples.
///
/// A single sample becomes a zero-length segment, which round caps draw as a dot.
fn polyline(svg: &mut String, points: &[Point], color: Color, width: f32) {
    let Some(first) = points.first() else {
        return;
    };
    let mut d = format!("M{},{}", first.x, first.y);
    if points.len() == 1 {
        let _ = write!(d, " L{},{}", first.x, first.y);
    }
    for p in &points[1..] {
        let _ = write!(d, " L{},{}", p.x, p.y);
    }
    let _ = write!(
        svg,
        "<path d=\"{d}\" fill=\"none\"{} stroke-width=\"{width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
        paint("stroke", color),
    );
}

/// Fill attributes for a shape, emitting a gradient definition if needed.
fn fill_attrs(svg: &mut String, element: &Element, from: Point, to: Point) -> String {
    if !element.fills_with_gradient() {
        return paint("fill", element.style.primary);
    }
    let id = format!("grad-{}", element.id);
    let _ = write!(
        svg,
        "<defs><linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">\
         <stop offset=\"0\"{}/><stop offset=\"1\"{}/></linearGradient></defs>",
        from.x,
        from.y,
        to.x,
        to.y,
        paint_with("stop-color", "stop-opacity", element.style.primary),
        paint_with("stop-color", "stop-opacity", element.style.secondary),
    );
    format!(" fill=\"url(#{id})\"")
}

/// A paint attribute, plus an opacity attribute for translucent colors.
fn paint(attr: &str, color: Color) -> String {
    paint_with(attr, &format!("{attr}-opacity"), color)
}

fn paint_with(attr: &str, opacity_attr: &str, color: Color) -> String {
    let rgb = format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
    if color.a == u8::MAX {
        format!(" {attr}=\"{rgb}\"")
    } else {
        format!(" {attr}=\"{rgb}\" {opacity_attr}=\"{}\"", color.opacity())
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
