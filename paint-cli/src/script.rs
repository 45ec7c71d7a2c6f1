//! Interaction scripts.
//!
//! A script is a JSON array of steps, each tagged like an input event:
//!
//! ```json
//! [
//!   {"type": "tool", "data": "rectangle"},
//!   {"type": "pointer", "data": {"phase": "down", "x": 10.0, "y": 10.0}},
//!   {"type": "pointer", "data": {"phase": "move", "x": 110.0, "y": 60.0}},
//!   {"type": "pointer", "data": {"phase": "up", "x": 110.0, "y": 60.0}},
//!   {"type": "style", "data": {"primary": "#ff0000"}},
//!   {"type": "undo"}
//! ]
//! ```

use std::path::{Path, PathBuf};

use paint_core::{ElementPatch, InputEvent, PaintState, PointerPhase, TouchEvent, Tool};
use paint_renderer::ImageImporter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Script loading errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("Failed to read script {path}: {source}")]
    Read {
        /// Script path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The script is not a valid step list.
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scripted host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Pick a tool from the toolbar.
    Tool(Tool),
    /// Mouse or pen input.
    Pointer {
        /// Phase of the pointer event.
        phase: PointerPhase,
        /// X in canvas coordinates.
        x: f32,
        /// Y in canvas coordinates.
        y: f32,
    },
    /// Touch input.
    Touch(TouchEvent),
    /// Change colors, gradient, stroke width or text of the selection.
    Style(ElementPatch),
    /// Queue an image file for import.
    Import(PathBuf),
    /// Wait until every queued import has been placed.
    Wait,
    /// Remove the most recent element.
    Undo,
    /// Remove the selected element.
    DeleteSelected,
    /// Clear the canvas; `confirm` answers the confirmation prompt.
    Clear {
        /// Answer to "clear the canvas?".
        confirm: bool,
    },
    /// Drop the selection.
    SelectNone,
}

/// A parsed script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] if the JSON is not a step list.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let steps: Vec<ScriptStep> = serde_json::from_str(json)?;
        Ok(Self { steps })
    }

    /// Load a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The steps in order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Replay every step against `state`. Finished imports are placed after
    /// each step, as a host would between input events.
    pub async fn replay(&self, state: &mut PaintState, importer: &mut ImageImporter) {
        for (index, step) in self.steps.iter().enumerate() {
            tracing::trace!("Step {index}: {step:?}");
            if let ScriptStep::Wait = step {
                importer.finish(state).await;
            } else {
                apply_step(state, importer, step);
            }
            importer.drain(state);
        }
    }
}

/// Apply one synchronous step. Returns `true` if a redraw is needed.
pub fn apply_step(state: &mut PaintState, importer: &mut ImageImporter, step: &ScriptStep) -> bool {
    match step {
        ScriptStep::Tool(tool) => state.set_tool(*tool),
        ScriptStep::Pointer { phase, x, y } => {
            state.handle_event(&InputEvent::pointer(*phase, *x, *y))
        }
        ScriptStep::Touch(touch) => state.handle_event(&InputEvent::Touch(touch.clone())),
        ScriptStep::Style(patch) => state.apply_style(patch),
        ScriptStep::Import(path) => {
            importer.import_path(path.clone());
            false
        }
        ScriptStep::Wait => false,
        ScriptStep::Undo => state.undo().is_some(),
        ScriptStep::DeleteSelected => state.delete_selected().is_some(),
        ScriptStep::Clear { confirm } => state.clear(|| *confirm),
        ScriptStep::SelectNone => {
            let had = state.scene().selected().is_some();
            state.scene_mut().select(None);
            had
        }
    }
}
