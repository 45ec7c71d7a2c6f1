//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer (mouse or pen) event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
}

impl TouchPoint {
    /// Position of this contact.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event with the contacts currently on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Pointer (mouse) event.
    Pointer {
        /// Phase of the event.
        phase: PointerPhase,
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },

    /// Raw touch event.
    Touch(TouchEvent),
}

impl InputEvent {
    /// Shorthand for a pointer event.
    #[must_use]
    pub fn pointer(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::Pointer { phase, x, y }
    }

    /// Shorthand for a single-contact touch event.
    #[must_use]
    pub fn touch(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self::Touch(TouchEvent::new(phase, vec![TouchPoint { id: 0, x, y }]))
    }
}
