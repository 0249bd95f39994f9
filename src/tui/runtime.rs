//! Runs the dashboard: wires the data service and exporters to the
//! event loop and carries out the [`Action`]s that `update` returns.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::export::{
    DirectorySink, DownloadSink, Rasterizer, SnapshotExporter, SvgRasterizer, export_table,
};
use crate::service::{DataService, HttpDataService};
use crate::{NokeyError, Result};

use super::app::App;
use super::event::{Action, Message, spawn_event_reader, spawn_tick_timer, update};
use super::terminal::{Tui, restore_terminal, setup_terminal};
use super::ui::render;

/// Tick interval for housekeeping such as clearing old statuses.
const TICK_MS: u64 = 250;

/// Executes actions and reports their results as [`Message`]s.
#[derive(Clone)]
pub struct Runtime {
    service: Arc<dyn DataService>,
    sink: Arc<dyn DownloadSink>,
    snapshots: SnapshotExporter,
    tx: mpsc::UnboundedSender<Message>,
}

impl Runtime {
    pub fn new(
        service: Arc<dyn DataService>,
        sink: Arc<dyn DownloadSink>,
        rasterizer: Option<Arc<dyn Rasterizer>>,
        tx: mpsc::UnboundedSender<Message>,
    ) -> Self {
        let snapshots = SnapshotExporter::new(rasterizer, Arc::clone(&sink));
        Self {
            service,
            sink,
            snapshots,
            tx,
        }
    }

    /// Checks service health in the background.
    pub fn check_health(&self) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let online = match service.health().await {
                Ok(online) => online,
                Err(err) => {
                    warn!(error = %err, "health check failed");
                    false
                }
            };
            let _ = tx.send(Message::Health(online));
        });
    }

    /// Carries out `action`. Network and rasterizing work runs in the
    /// background; its result arrives later as a [`Message`].
    pub fn dispatch(&self, action: Action) {
        match action {
            Action::Load(pending) => {
                let service = Arc::clone(&self.service);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = service.fetch_ohlcv(&pending.query).await;
                    let _ = tx.send(Message::Loaded {
                        id: pending.id,
                        result,
                    });
                });
            }
            Action::ExportTable { response, filename } => {
                let result = export_table(&response.rows, &filename, self.sink.as_ref());
                if let Err(ref err) = result {
                    warn!(error = %err, %filename, "CSV export failed");
                }
                let _ = self.tx.send(Message::TableExported(result));
            }
            Action::ExportSnapshot {
                kind,
                svg,
                filename,
            } => {
                let snapshots = self.snapshots.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let outcome = snapshots.export_markup(svg, filename).await;
                    let _ = tx.send(Message::SnapshotExported(kind, outcome));
                });
            }
        }
    }
}

/// Runs the dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the HTTP client or the terminal cannot be set up.
pub async fn run(config: AppConfig) -> Result<()> {
    let service = Arc::new(HttpDataService::new(&config.api)?);
    let sink = Arc::new(DirectorySink::new(config.export.dir.clone()));
    let rasterizer: Arc<dyn Rasterizer> = Arc::new(SvgRasterizer::new());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let runtime = Runtime::new(service, sink, Some(rasterizer), tx.clone());

    let mut terminal = setup_terminal()?;
    info!(api = %config.api.base_url, exports = %config.export.dir.display(), "dashboard started");

    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx.clone(), TICK_MS);
    spawn_quit_on_signal(tx);
    runtime.check_health();

    let mut app = App::new();
    let result = event_loop(&mut terminal, &mut app, &runtime, &mut rx).await;
    restore_terminal(&mut terminal)?;
    info!("dashboard stopped");
    result
}

async fn event_loop(
    terminal: &mut Tui,
    app: &mut App,
    runtime: &Runtime,
    rx: &mut mpsc::UnboundedReceiver<Message>,
) -> Result<()> {
    while !app.should_quit {
        terminal
            .draw(|frame| render(frame, app))
            .map_err(|e| NokeyError::Terminal(e.to_string()))?;

        let Some(message) = rx.recv().await else {
            break;
        };
        if let Some(action) = update(app, message) {
            runtime.dispatch(action);
        }
        // Drain whatever else is queued before redrawing.
        while let Ok(message) = rx.try_recv() {
            if let Some(action) = update(app, message) {
                runtime.dispatch(action);
            }
        }
    }
    Ok(())
}

fn spawn_quit_on_signal(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Message::Quit);
        }
    });
}
