//! Paint elements - the drawable units of a scene.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Bounds, Point, Vector};
use crate::{CanvasError, CanvasResult};

/// Width of the box a text element occupies for selection purposes.
pub const TEXT_BOX_WIDTH: f32 = 300.0;

/// Fallback width/height for elements with no extent along an axis.
pub const MIN_BOX_EXTENT: f32 = 40.0;

/// Font size is the stroke width times this factor.
pub const FONT_SCALE: f32 = 4.0;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Create an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidColor`] for any other input.
    pub fn from_hex(input: &str) -> CanvasResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CanvasError::InvalidColor(input.to_string()));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| CanvasError::InvalidColor(input.to_string()))
        };

        match hex.len() {
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Ok(Self {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
                a: channel(&hex[6..8])?,
            }),
            _ => Err(CanvasError::InvalidColor(input.to_string())),
        }
    }

    /// Alpha as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> CanvasResult<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = CanvasError;

    fn try_from(value: String) -> CanvasResult<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Paint styling shared by every element kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Stroke color, and fill color when no gradient is used.
    pub primary: Color,
    /// Gradient end color.
    pub secondary: Color,
    /// Fill shapes with a primary→secondary linear gradient.
    pub use_gradient: bool,
    /// Stroke thickness in pixels; for text, the font size divided by [`FONT_SCALE`].
    pub stroke_width: f32,
}

impl Style {
    /// Font size used when this style is applied to text.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.stroke_width * FONT_SCALE
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            primary: Color::rgb(0xa8, 0x55, 0xf7),
            secondary: Color::rgb(0xff, 0xff, 0xff),
            use_gradient: false,
            stroke_width: 5.0,
        }
    }
}

/// A decoded raster image, RGBA8 with straight alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap decoded pixels.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidOperation`] if the buffer length does not
    /// match `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> CanvasResult<Self> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if pixels.len() as u64 != expected {
            return Err(CanvasError::InvalidOperation(format!(
                "raster {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Tag naming the kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Freehand brush stroke.
    Freehand,
    /// Stroke painted in the background color.
    Eraser,
    /// Straight line segment.
    Line,
    /// Axis-aligned rectangle.
    Rectangle,
    /// Circle defined by center and drag vector.
    Circle,
    /// Text label.
    Text,
    /// Imported raster image.
    Image,
}

impl ElementKind {
    /// Whether this kind is drawn from a point sequence.
    #[must_use]
    pub fn is_stroke(self) -> bool {
        matches!(self, Self::Freehand | Self::Eraser)
    }

    /// Whether a gradient fill applies to this kind.
    #[must_use]
    pub fn accepts_gradient(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle)
    }
}

/// Geometry of an element, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Freehand stroke through `points` (never empty).
    Freehand {
        /// Samples in the order they were drawn.
        points: Vec<Point>,
    },
    /// Eraser stroke through `points` (never empty).
    Eraser {
        /// Samples in the order they were drawn.
        points: Vec<Point>,
    },
    /// Segment from `origin` to `origin + extent`.
    Line {
        /// Start point.
        origin: Point,
        /// Offset of the end point.
        extent: Vector,
    },
    /// Box spanned by `origin` and `origin + extent`.
    Rectangle {
        /// Corner where the drag started.
        origin: Point,
        /// Signed size.
        extent: Vector,
    },
    /// Circle of radius `|extent|` around `center`.
    Circle {
        /// Center, where the drag started.
        center: Point,
        /// Drag vector; its length is the radius.
        extent: Vector,
    },
    /// Text whose box starts at `origin`.
    Text {
        /// Top-left of the text box.
        origin: Point,
        /// Text content.
        content: String,
    },
    /// Raster scaled into the box `origin`, `size`.
    Image {
        /// Top-left corner.
        origin: Point,
        /// Displayed width/height.
        size: Vector,
        /// The owned decoded image.
        raster: RasterImage,
    },
}

impl Shape {
    /// The kind tag for this shape.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Freehand { .. } => ElementKind::Freehand,
            Self::Eraser { .. } => ElementKind::Eraser,
            Self::Line { .. } => ElementKind::Line,
            Self::Rectangle { .. } => ElementKind::Rectangle,
            Self::Circle { .. } => ElementKind::Circle,
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
        }
    }

    /// Anchor point: the origin, or the first sample of a stroke.
    #[must_use]
    pub fn anchor(&self) -> Point {
        match self {
            Self::Freehand { points } | Self::Eraser { points } => {
                points.first().copied().unwrap_or_default()
            }
            Self::Line { origin, .. }
            | Self::Rectangle { origin, .. }
            | Self::Text { origin, .. }
            | Self::Image { origin, .. } => *origin,
            Self::Circle { center, .. } => *center,
        }
    }

    /// Stroke samples, for stroke kinds.
    #[must_use]
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Self::Freehand { points } | Self::Eraser { points } => Some(points),
            _ => None,
        }
    }
}

/// A paint element with geometry and style.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Kind-specific geometry.
    pub shape: Shape,
    /// Colors and stroke width.
    pub style: Style,
}

impl Element {
    /// Create a new element with a fresh id.
    #[must_use]
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            id: ElementId::new(),
            shape,
            style,
        }
    }

    /// Start a stroke of the given kind at `at`.
    ///
    /// Any kind other than [`ElementKind::Eraser`] yields a freehand stroke.
    #[must_use]
    pub fn stroke(kind: ElementKind, at: Point, style: Style) -> Self {
        let points = vec![at];
        let shape = if kind == ElementKind::Eraser {
            Shape::Eraser { points }
        } else {
            Shape::Freehand { points }
        };
        Self::new(shape, style)
    }

    /// The kind tag.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    /// Whether a gradient fill should be used when drawing.
    #[must_use]
    pub fn fills_with_gradient(&self) -> bool {
        self.style.use_gradient && self.kind().accepts_gradient()
    }

    /// Box used for hit-testing and the selection outline.
    ///
    /// Strokes are anchored at their first sample. Axes with no extent fall
    /// back to [`MIN_BOX_EXTENT`] so point-like elements stay selectable.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let raw = match &self.shape {
            Shape::Freehand { .. } | Shape::Eraser { .. } => {
                Bounds::from_extent(self.shape.anchor(), Vector::ZERO)
            }
            Shape::Line { origin, extent } | Shape::Rectangle { origin, extent } => {
                Bounds::from_extent(*origin, *extent)
            }
            Shape::Circle { center, extent } => Bounds::from_extent(*center, *extent),
            Shape::Text { origin, .. } => Bounds::from_extent(
                *origin,
                Vector::new(TEXT_BOX_WIDTH, self.style.font_size()),
            ),
            Shape::Image { origin, size, .. } => Bounds::from_extent(*origin, *size),
        };
        raw.with_min_extent(MIN_BOX_EXTENT)
    }

    /// Translate the element by `delta`: every point of a stroke, or the origin.
    pub fn translate(&mut self, delta: Vector) {
        match &mut self.shape {
            Shape::Freehand { points } | Shape::Eraser { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(delta);
                }
            }
            Shape::Line { origin, .. }
            | Shape::Rectangle { origin, .. }
            | Shape::Text { origin, .. }
            | Shape::Image { origin, .. } => *origin = origin.offset(delta),
            Shape::Circle { center, .. } => *center = center.offset(delta),
        }
    }

    /// Apply the set fields of a patch. Returns `true` if anything changed.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let before = self.style;
        patch.apply_to_style(&mut self.style);
        let mut changed = self.style != before;
        if let (Some(text), Shape::Text { content, .. }) = (&patch.text, &mut self.shape) {
            if content != text {
                content.clone_from(text);
                changed = true;
            }
        }
        changed
    }
}

/// Partial update for an element. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New primary color.
    pub primary: Option<Color>,
    /// New secondary color.
    pub secondary: Option<Color>,
    /// New gradient flag.
    pub use_gradient: Option<bool>,
    /// New stroke width.
    pub stroke_width: Option<f32>,
    /// New text content; ignored for non-text elements.
    pub text: Option<String>,
}

impl ElementPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the style fields of this patch to a [`Style`].
    pub fn apply_to_style(&self, style: &mut Style) {
        if let Some(primary) = self.primary {
            style.primary = primary;
        }
        if let Some(secondary) = self.secondary {
            style.secondary = secondary;
        }
        if let Some(use_gradient) = self.use_gradient {
            style.use_gradient = use_gradient;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
    }
}
