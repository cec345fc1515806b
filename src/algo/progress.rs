//! Progress reporting for subdivision runs.
//!
//! A [`Progress`] wraps a callback that receives `(current, total, message)`
//! updates. Subdivision reports once per stage of every iteration, so the
//! total is `iterations * Stage::COUNT`.
//!
//! # Example
//!
//! ```
//! use quadsmooth::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(0, 4, "starting");
//! ```

use std::fmt;

/// The stages of one subdivision pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building the adjacency model.
    Topology,
    /// Computing face points.
    FacePoints,
    /// Computing edge points.
    EdgePoints,
    /// Repositioning original vertices.
    VertexPoints,
    /// Emitting the refined quads.
    Retessellate,
}

impl Stage {
    /// Number of stages per pass.
    pub const COUNT: usize = 5;

    /// Zero-based position of this stage within a pass.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Topology => "building topology",
            Stage::FacePoints => "face points",
            Stage::EdgePoints => "edge points",
            Stage::VertexPoints => "vertex points",
            Stage::Retessellate => "re-tessellating",
        }
    }
}

/// A progress callback that receives updates during long-running operations.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report that `stage` of pass `iteration` (zero-based) is starting.
    pub fn report_stage(&self, iteration: usize, iterations: usize, stage: Stage) {
        let current = iteration * Stage::COUNT + stage.ordinal();
        let total = iterations * Stage::COUNT;
        let message = format!("pass {}/{}: {}", iteration + 1, iterations, stage.label());
        self.report(current, total, &message);
    }

    /// Report that all `iterations` passes are done.
    pub fn report_done(&self, iterations: usize) {
        let total = iterations * Stage::COUNT;
        self.report(total, total, "done");
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
