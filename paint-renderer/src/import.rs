//! Asynchronous image import.
//!
//! Files are read and decoded off the interaction path. Each finished decode
//! is placed on the canvas when it is drained; the order is completion order,
//! not request order. A failed import leaves the scene untouched.

use std::path::PathBuf;

use paint_core::{ElementId, PaintState, RasterImage};
use tokio::task::{JoinError, JoinSet};

use crate::error::{RenderError, RenderResult};
use crate::image::load_image_from_bytes;

type Decoded = (String, RenderResult<RasterImage>);

/// Queue of in-flight image imports.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct ImageImporter {
    tasks: JoinSet<Decoded>,
}

impl ImageImporter {
    /// Create an empty importer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of imports that have not been placed yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Decode already-loaded file bytes. `label` names the import in logs.
    pub fn import_bytes(&mut self, label: impl Into<String>, bytes: Vec<u8>) {
        let label = label.into();
        tracing::debug!("Queued import {label} ({} bytes)", bytes.len());
        self.tasks.spawn(async move {
            let result = decode(bytes).await;
            (label, result)
        });
    }

    /// Read and decode an image file.
    pub fn import_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let label = path.display().to_string();
        tracing::debug!("Queued import {label}");
        self.tasks.spawn(async move {
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => decode(bytes).await,
                Err(e) => Err(RenderError::Io(e)),
            };
            (label, result)
        });
    }

    /// Place every import that has already finished. Returns how many images
    /// were added to the scene.
    pub fn drain(&mut self, state: &mut PaintState) -> usize {
        let mut placed = 0;
        while let Some(joined) = self.tasks.try_join_next() {
            placed += usize::from(place(state, joined).is_some());
        }
        placed
    }

    /// Wait for every outstanding import and place it. Returns how many
    /// images were added to the scene.
    pub async fn finish(&mut self, state: &mut PaintState) -> usize {
        let mut placed = 0;
        while let Some(joined) = self.tasks.join_next().await {
            placed += usize::from(place(state, joined).is_some());
        }
        placed
    }
}

async fn decode(bytes: Vec<u8>) -> RenderResult<RasterImage> {
    tokio::task::spawn_blocking(move || load_image_from_bytes(&bytes))
        .await
        .map_err(|e| RenderError::Resource(format!("Decode task failed: {e}")))?
}

fn place(state: &mut PaintState, joined: Result<Decoded, JoinError>) -> Option<ElementId> {
    match joined {
        Ok((label, Ok(raster))) => {
            let id = state.place_image(raster)?;
            tracing::info!("Placed image {label} as {id}");
            Some(id)
        }
        Ok((label, Err(e))) => {
            tracing::warn!("Image import {label} failed: {e}");
            None
        }
        Err(e) => {
            tracing::warn!("Image import task failed: {e}");
            None
        }
    }
}
