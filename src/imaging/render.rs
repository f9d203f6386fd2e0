/// Recompute pipeline
///
/// Rebuilds the rendered image by replaying a parameter set against the
/// original: non-default scalar filters in `Field::REPLAY_ORDER`, then
/// every transform in the order it was committed.

use image::RgbaImage;
use std::fmt;
use std::sync::Arc;
use tokio::task;

use super::filters::{Filter, FilterEngine};
use crate::error::ViewerError;
use crate::state::edit::EditParams;

/// Ordered filter list for a parameter set
pub fn pipeline(params: &EditParams) -> Vec<Filter> {
    params
        .active_adjustments()
        .filter_map(Filter::from_adjustment)
        .chain(params.transforms.iter().map(|&op| Filter::from(op)))
        .collect()
}

/// Replay `params` against `original`
pub fn render(
    engine: &dyn FilterEngine,
    original: &RgbaImage,
    params: &EditParams,
) -> Result<RgbaImage, ViewerError> {
    let mut rendered = original.clone();
    for filter in pipeline(params) {
        rendered = engine.apply(&rendered, &filter)?;
    }
    Ok(rendered)
}

/// A recompute request that owns everything it reads
///
/// The parameters are a private copy, so the UI can keep mutating its
/// session while the job runs on a blocking thread.
pub struct RenderJob {
    pub generation: u64,
    original: Arc<RgbaImage>,
    params: EditParams,
    engine: Arc<dyn FilterEngine>,
}

impl fmt::Debug for RenderJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderJob")
            .field("generation", &self.generation)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Result of a render job, tagged with the generation that produced it
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub generation: u64,
    pub result: Result<RgbaImage, ViewerError>,
}

impl RenderJob {
    pub fn new(
        generation: u64,
        original: Arc<RgbaImage>,
        params: EditParams,
        engine: Arc<dyn FilterEngine>,
    ) -> Self {
        Self {
            generation,
            original,
            params,
            engine,
        }
    }

    pub fn params(&self) -> &EditParams {
        &self.params
    }

    /// Render on the current thread
    pub fn run(self) -> RenderOutput {
        let result = render(self.engine.as_ref(), &self.original, &self.params);
        RenderOutput {
            generation: self.generation,
            result,
        }
    }

    /// Render on tokio's blocking pool
    pub async fn run_async(self) -> RenderOutput {
        let generation = self.generation;
        task::spawn_blocking(move || self.run())
            .await
            .unwrap_or_else(|e| RenderOutput {
                generation,
                result: Err(ViewerError::Recompute(format!("render task failed: {}", e))),
            })
    }
}
