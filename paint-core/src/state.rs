//! Pointer interaction state machine.
//!
//! [`PaintState`] owns the [`Scene`] and is the only thing that mutates it in
//! response to input. Every handler runs to completion synchronously and
//! reports whether the scene (or the in-progress element) changed, so the
//! host knows to redraw.

use serde::{Deserialize, Serialize};

use crate::element::{ElementPatch, RasterImage, Shape, Style};
use crate::event::{InputEvent, PointerPhase, TouchPhase};
use crate::geometry::{Point, Vector};
use crate::{Element, ElementId, ElementKind, Scene};

/// Margin added around element bounds when picking with the select tool.
pub const HIT_MARGIN: f32 = 20.0;

/// Content of a freshly placed text element.
pub const TEXT_PLACEHOLDER: &str = "New Text";

/// Where imported images are placed.
pub const IMAGE_ORIGIN: Point = Point::new(100.0, 100.0);

/// Display width of imported images; height follows the aspect ratio.
pub const DEFAULT_IMAGE_WIDTH: f32 = 500.0;

/// The active drawing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pick and drag existing elements.
    Select,
    /// Freehand strokes.
    #[default]
    Brush,
    /// Straight lines.
    Line,
    /// Rectangles.
    Rectangle,
    /// Circles, dragged out from the center.
    Circle,
    /// Strokes in the background color.
    Eraser,
    /// Click to place a text label.
    Text,
}

impl Tool {
    /// Seed the element a drag with this tool starts from.
    ///
    /// Returns `None` for tools that do not draw by dragging.
    fn seed(self, at: Point, style: Style) -> Option<Element> {
        let shape = match self {
            Self::Brush => return Some(Element::stroke(ElementKind::Freehand, at, style)),
            Self::Eraser => return Some(Element::stroke(ElementKind::Eraser, at, style)),
            Self::Line => Shape::Line {
                origin: at,
                extent: Vector::ZERO,
            },
            Self::Rectangle => Shape::Rectangle {
                origin: at,
                extent: Vector::ZERO,
            },
            Self::Circle => Shape::Circle {
                center: at,
                extent: Vector::ZERO,
            },
            Self::Select | Self::Text => return None,
        };
        Some(Element::new(shape, style))
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Interaction {
    /// No button held.
    #[default]
    Idle,
    /// Dragging out a new element that is not yet in the scene.
    Drawing {
        /// The uncommitted element.
        element: Element,
        /// Where the drag started.
        start: Point,
    },
    /// Dragging the selected element.
    MovingSelection {
        /// Element being moved.
        id: ElementId,
        /// Last pointer sample; the next move translates relative to it.
        last: Point,
    },
}

/// The complete paint state: scene, tool, style and interaction.
#[derive(Debug, Clone, Default)]
pub struct PaintState {
    scene: Scene,
    tool: Tool,
    style: Style,
    interaction: Interaction,
}

impl PaintState {
    /// Create a state with an empty canvas of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(width, height),
            ..Self::default()
        }
    }

    /// The committed scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct access to the scene store.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The style new elements are created with.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The current interaction.
    #[must_use]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// The element being drawn, if a drag is in progress.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Element> {
        match &self.interaction {
            Interaction::Drawing { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Switch tools. Any tool other than select drops the selection.
    pub fn set_tool(&mut self, tool: Tool) -> bool {
        let mut changed = self.finish_interaction();
        if tool != Tool::Select && self.scene.selected().is_some() {
            self.scene.select(None);
            changed = true;
        }
        tracing::debug!("Tool {:?} -> {tool:?}", self.tool);
        self.tool = tool;
        changed
    }

    /// Dispatch an input event. Returns `true` if a redraw is needed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Pointer { phase, x, y } => {
                let at = Point::new(*x, *y);
                match phase {
                    PointerPhase::Down => self.pointer_down(at),
                    PointerPhase::Move => self.pointer_move(at),
                    PointerPhase::Up => self.pointer_up(),
                }
            }
            InputEvent::Touch(touch) => match touch.phase {
                TouchPhase::Start | TouchPhase::Move if touch.is_multi_touch() => {
                    tracing::trace!("Ignoring {}-finger touch", touch.touches.len());
                    false
                }
                TouchPhase::Start => touch
                    .primary_touch()
                    .is_some_and(|t| self.pointer_down(t.position())),
                TouchPhase::Move => touch
                    .primary_touch()
                    .is_some_and(|t| self.pointer_move(t.position())),
                TouchPhase::End => self.pointer_up(),
                TouchPhase::Cancel => self.cancel(),
            },
        }
    }

    /// Press at `at`.
    pub fn pointer_down(&mut self, at: Point) -> bool {
        let finished = self.finish_interaction();

        let changed = match self.tool {
            Tool::Select => self.pick(at),
            Tool::Text => {
                self.place_text(at);
                true
            }
            tool => match tool.seed(at, self.style) {
                Some(element) => {
                    tracing::debug!("Start drawing {:?} at ({}, {})", element.kind(), at.x, at.y);
                    self.interaction = Interaction::Drawing { element, start: at };
                    true
                }
                None => false,
            },
        };
        finished || changed
    }

    /// Move to `at`.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Drawing { element, start } => {
                match &mut element.shape {
                    Shape::Freehand { points } | Shape::Eraser { points } => points.push(at),
                    Shape::Line { extent, .. }
                    | Shape::Rectangle { extent, .. }
                    | Shape::Circle { extent, .. } => *extent = at - *start,
                    Shape::Text { .. } | Shape::Image { .. } => return false,
                }
                true
            }
            Interaction::MovingSelection { id, last } => {
                let delta = at - *last;
                *last = at;
                let id = *id;
                match self.scene.get_mut(id) {
                    Some(element) => {
                        element.translate(delta);
                        true
                    }
                    None => {
                        // Deleted mid-drag.
                        self.interaction = Interaction::Idle;
                        false
                    }
                }
            }
        }
    }

    /// Release the pointer, committing any element being drawn.
    pub fn pointer_up(&mut self) -> bool {
        self.finish_interaction()
    }

    /// Abort the current interaction. An element being drawn is discarded.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { element, .. } => {
                tracing::debug!("Discarding uncommitted {:?}", element.kind());
                true
            }
            Interaction::MovingSelection { .. } | Interaction::Idle => false,
        }
    }

    /// Remove the most recently added element.
    pub fn undo(&mut self) -> Option<Element> {
        self.scene.delete_last()
    }

    /// Clear the whole canvas if `confirm` agrees.
    pub fn clear(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if self.scene.is_empty() || !confirm() {
            return false;
        }
        self.interaction = Interaction::Idle;
        self.scene.clear_all();
        true
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<Element> {
        let id = self.scene.selected()?;
        self.scene.delete_by_id(id)
    }

    /// Update the current style and, if there is one, the selected element.
    /// Returns `true` only if the style or the selection actually changed.
    ///
    /// Text content in the patch only affects a selected text element.
    pub fn apply_style(&mut self, patch: &ElementPatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let before = self.style;
        patch.apply_to_style(&mut self.style);
        let mut changed = self.style != before;
        if let Some(element) = self.scene.selected().and_then(|id| self.scene.get_mut(id)) {
            changed |= element.apply(patch);
        }
        changed
    }

    /// Place a decoded image, select it and switch to the select tool.
    ///
    /// The image is shown [`DEFAULT_IMAGE_WIDTH`] wide with its aspect ratio
    /// kept. Empty rasters are not placed.
    #[allow(clippy::cast_precision_loss)]
    pub fn place_image(&mut self, raster: RasterImage) -> Option<ElementId> {
        if raster.width() == 0 || raster.height() == 0 {
            tracing::warn!("Refusing to place empty {}x{} image", raster.width(), raster.height());
            return None;
        }
        let ratio = raster.height() as f32 / raster.width() as f32;
        let element = Element::new(
            Shape::Image {
                origin: IMAGE_ORIGIN,
                size: Vector::new(DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_WIDTH * ratio),
                raster,
            },
            self.style,
        );
        let id = self.scene.append(element);
        self.scene.select(Some(id));
        self.tool = Tool::Select;
        Some(id)
    }

    /// Hit-test at `at`, selecting the topmost element under it.
    fn pick(&mut self, at: Point) -> bool {
        let hit = self.scene.element_at(at, HIT_MARGIN);
        let changed = hit != self.scene.selected();
        self.scene.select(hit);
        if let Some(id) = hit {
            tracing::debug!("Picked element {id}");
            self.interaction = Interaction::MovingSelection { id, last: at };
        }
        changed
    }

    fn place_text(&mut self, at: Point) {
        let element = Element::new(
            Shape::Text {
                origin: at,
                content: TEXT_PLACEHOLDER.to_string(),
            },
            self.style,
        );
        let id = self.scene.append(element);
        self.scene.select(Some(id));
        self.tool = Tool::Select;
    }

    /// End the current interaction, committing a drawn element.
    fn finish_interaction(&mut self) -> bool {
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { element, .. } => {
                tracing::debug!("Commit {:?} element {}", element.kind(), element.id);
                self.scene.append(element);
                true
            }
            Interaction::MovingSelection { .. } | Interaction::Idle => false,
        }
    }
}
