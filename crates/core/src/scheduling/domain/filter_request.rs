use std::sync::Arc;
use std::time::Instant;

use crate::filtering::domain::intensity::Intensity;
use crate::shared::raster_image::RasterImage;

/// One "filter this source at this intensity" intent. Immutable once created.
#[derive(Clone, Debug)]
pub struct FilterRequest {
    source: Arc<RasterImage>,
    intensity: Intensity,
    requested_at: Instant,
}

impl FilterRequest {
    pub fn new(source: Arc<RasterImage>, intensity: Intensity, requested_at: Instant) -> Self {
        Self {
            source,
            intensity,
            requested_at,
        }
    }

    pub fn source(&self) -> &Arc<RasterImage> {
        &self.source
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn requested_at(&self) -> Instant {
        self.requested_at
    }
}

/// Instruction to invoke the filter engine, tagged with its generation.
#[derive(Clone, Debug)]
pub struct Dispatch {
    pub generation: u64,
    pub request: FilterRequest,
    /// How many `request` calls were folded into this invocation.
    pub coalesced: usize,
}
