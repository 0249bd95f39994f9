//! PNG snapshots of chart panels.
//!
//! Snapshot export is best effort: it never returns an error to the
//! caller. Instead every attempt ends in a [`SnapshotOutcome`] the
//! dashboard can report.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use super::DownloadSink;
use super::svg::{ChartRegion, render_region};

/// Pixel density of exported images.
pub const SNAPSHOT_SCALE: f32 = 2.0;

/// Why a snapshot could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not parse chart markup: {0}")]
    Parse(String),

    #[error("could not allocate a {width}x{height} image")]
    Allocate { width: u32, height: u32 },

    #[error("could not encode PNG: {0}")]
    Encode(String),

    #[error("could not save snapshot: {0}")]
    Save(String),
}

impl From<usvg::Error> for SnapshotError {
    fn from(err: usvg::Error) -> Self {
        SnapshotError::Parse(err.to_string())
    }
}

impl From<crate::NokeyError> for SnapshotError {
    fn from(err: crate::NokeyError) -> Self {
        SnapshotError::Save(err.to_string())
    }
}

/// Result of one snapshot attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The image was written to this path.
    Saved(PathBuf),
    /// No rasterizer is configured.
    Unavailable,
    /// Rasterizing or saving failed.
    Failed(String),
}

/// Turns SVG markup into encoded PNG bytes.
pub trait Rasterizer: Send + Sync {
    /// Rasterizes `svg` at `scale` times its logical size.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] when the markup cannot be parsed,
    /// rendered, or encoded.
    fn rasterize(&self, svg: &str, scale: f32) -> Result<Vec<u8>, SnapshotError>;
}

/// [`Rasterizer`] built on `resvg`.
///
/// System fonts are loaded once, on construction.
#[derive(Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self {
            fontdb: Arc::new(db),
        }
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("fonts", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, svg: &str, scale: f32) -> Result<Vec<u8>, SnapshotError> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(svg, &options)?;

        let size = tree.size();
        let width = (size.width() * scale).ceil() as u32;
        let height = (size.height() * scale).ceil() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(SnapshotError::Allocate { width, height })?;

        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );
        pixmap
            .encode_png()
            .map_err(|e| SnapshotError::Encode(e.to_string()))
    }
}

/// Rasterizes chart regions and hands the PNG to a [`DownloadSink`].
#[derive(Clone)]
pub struct SnapshotExporter {
    rasterizer: Option<Arc<dyn Rasterizer>>,
    sink: Arc<dyn DownloadSink>,
}

impl SnapshotExporter {
    /// `rasterizer` may be `None`, in which case every export reports
    /// [`SnapshotOutcome::Unavailable`].
    pub fn new(rasterizer: Option<Arc<dyn Rasterizer>>, sink: Arc<dyn DownloadSink>) -> Self {
        Self { rasterizer, sink }
    }

    /// Captures `region` and saves it as `filename`.
    pub async fn export(&self, region: &ChartRegion<'_>, filename: &str) -> SnapshotOutcome {
        self.export_markup(render_region(region), filename.to_string())
            .await
    }

    /// Rasterizes prepared markup off the async runtime and saves it.
    pub async fn export_markup(&self, svg: String, filename: String) -> SnapshotOutcome {
        let Some(rasterizer) = self.rasterizer.clone() else {
            warn!(%filename, "snapshot skipped: no rasterizer available");
            return SnapshotOutcome::Unavailable;
        };
        let sink = Arc::clone(&self.sink);

        let task = tokio::task::spawn_blocking(move || -> Result<PathBuf, SnapshotError> {
            let png = rasterizer.rasterize(&svg, SNAPSHOT_SCALE)?;
            Ok(sink.save(&filename, &png)?)
        });

        match task.await {
            Ok(Ok(path)) => {
                info!(path = %path.display(), "snapshot saved");
                SnapshotOutcome::Saved(path)
            }
            Ok(Err(err)) => {
                warn!(error = %err, "snapshot failed");
                SnapshotOutcome::Failed(err.to_string())
            }
            Err(err) => {
                warn!(error = %err, "snapshot task aborted");
                SnapshotOutcome::Failed("snapshot task aborted".to_string())
            }
        }
    }
}
