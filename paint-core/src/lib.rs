//! # Onyx Paint Core
//!
//! Retained-mode paint model: drawable elements, the scene store and the
//! pointer interaction state machine. Rendering lives in `paint-renderer`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 paint-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Scene Store      │  Interaction            │
//! │  - Elements       │  - Pointer/touch events │
//! │  - Paint order    │  - Draw / move / pick   │
//! │  - Selection      │  - Tools and style      │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod scene;
pub mod state;

pub use element::{
    Color, Element, ElementId, ElementKind, ElementPatch, RasterImage, Shape, Style,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{InputEvent, PointerPhase, TouchEvent, TouchPhase, TouchPoint};
pub use geometry::{Bounds, Point, Vector};
pub use scene::Scene;
pub use state::{Interaction, PaintState, Tool};

/// Paint core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
