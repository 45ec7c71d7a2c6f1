//! Encoded image cache.
//!
//! Placed images are embedded in every frame as PNG data URIs. Each image is
//! encoded once and reused for as long as its element stays on the canvas.
//! The raster of a placed image never changes, so the element id is the key.

use std::collections::HashMap;
use std::sync::Arc;

use paint_core::{ElementId, RasterImage};

use crate::error::RenderResult;
use crate::image::to_data_uri;

/// Entry in the image cache.
#[derive(Debug)]
struct CacheEntry {
    /// Encoded `data:image/png;base64,` URI.
    uri: Arc<str>,
    /// Last frame that drew this image.
    last_frame: u64,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (encodes).
    pub misses: u64,
    /// Number of entries dropped because their element was not drawn.
    pub evictions: u64,
}

/// Data URIs of placed images, keyed by element.
///
/// Entries not drawn in the latest frame are evicted when it ends.
#[derive(Debug, Default)]
pub struct ImageUriCache {
    entries: HashMap<ElementId, CacheEntry>,
    frame: u64,
    stats: CacheStats,
}

impl ImageUriCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Data URI for an image element, encoding it on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn data_uri(&mut self, id: ElementId, raster: &RasterImage) -> RenderResult<Arc<str>> {
        let frame = self.frame;
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.last_frame = frame;
            self.stats.hits += 1;
            return Ok(Arc::clone(&entry.uri));
        }

        let uri: Arc<str> = to_data_uri(raster)?.into();
        self.stats.misses += 1;
        tracing::debug!("Encoded image {id} ({} bytes)", uri.len());
        self.entries.insert(
            id,
            CacheEntry {
                uri: Arc::clone(&uri),
                last_frame: frame,
            },
        );
        Ok(uri)
    }

    /// Finish the frame, dropping images that were not drawn in it.
    pub fn end_frame(&mut self) {
        let frame = self.frame;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.last_frame == frame);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!("Evicted {evicted} cached images");
            self.stats.evictions += evicted as u64;
        }
    }

    /// Number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
