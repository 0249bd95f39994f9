//! Export subsystem: CSV tables and PNG chart snapshots.
//!
//! Exporters never touch the filesystem directly; they hand a filename and
//! a byte payload to an injected [`DownloadSink`].

pub mod download;
pub mod snapshot;
pub mod svg;
pub mod table;

pub use download::{DirectorySink, DownloadSink};
pub use snapshot::{
    Rasterizer, SNAPSHOT_SCALE, SnapshotError, SnapshotExporter, SnapshotOutcome, SvgRasterizer,
};
pub use svg::{ChartRegion, render_region};
pub use table::{TableRecord, build_csv, export_table};
