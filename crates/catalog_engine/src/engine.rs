use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use crate::client::{CatalogApi, ReqwestCatalogApi};
use crate::debounce::DebounceTimer;
use crate::store::StoreCatalogApi;
use crate::{
    CatalogSettings, EngineError, EngineEvent, ListQuery, ProjectStore, RequestId,
    SpreadsheetFile, TimerId, UploadId,
};

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        query: ListQuery,
    },
    Upload {
        upload_id: UploadId,
        file: SpreadsheetFile,
    },
    ScheduleSearch {
        timer_id: TimerId,
        delay: Duration,
    },
    CancelSearch,
}

/// Runs network calls and the search timer on a background tokio runtime.
///
/// Commands are fire-and-forget; outcomes come back as [`EngineEvent`]s.
/// In-flight requests are never cancelled.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: &CatalogSettings) -> Result<Self, EngineError> {
        if settings.offline {
            let store = ProjectStore::seeded();
            catalog_info!("Offline mode: serving {} demo projects", store.len());
            return Self::with_api(Arc::new(StoreCatalogApi::new(store)));
        }
        let api = ReqwestCatalogApi::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn CatalogApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let mut timer = DebounceTimer::new(runtime.handle().clone());
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::ScheduleSearch { timer_id, delay } => {
                        let event_tx = event_tx.clone();
                        timer.schedule(delay, move || {
                            let _ = event_tx.send(EngineEvent::SearchTimerElapsed { timer_id });
                        });
                    }
                    EngineCommand::CancelSearch => {
                        if timer.cancel() {
                            catalog_debug!("Cancelled pending search timer");
                        }
                    }
                    command => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_request(api.as_ref(), command, event_tx).await;
                        });
                    }
                }
            }
            // Timer tasks must be aborted before the runtime shuts down.
            drop(timer);
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_projects(&self, request_id: RequestId, query: ListQuery) {
        self.send(EngineCommand::Fetch { request_id, query });
    }

    pub fn upload(&self, upload_id: UploadId, file: SpreadsheetFile) {
        self.send(EngineCommand::Upload { upload_id, file });
    }

    pub fn schedule_search(&self, timer_id: TimerId, delay: Duration) {
        self.send(EngineCommand::ScheduleSearch { timer_id, delay });
    }

    pub fn cancel_search(&self) {
        self.send(EngineCommand::CancelSearch);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            catalog_warn!("Engine worker has stopped; dropping command");
        }
    }
}

async fn handle_request(
    api: &dyn CatalogApi,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Fetch { request_id, query } => EngineEvent::ProjectsLoaded {
            request_id,
            result: api.list_projects(&query).await,
        },
        EngineCommand::Upload { upload_id, file } => EngineEvent::UploadCompleted {
            upload_id,
            result: api.upload_spreadsheet(file).await,
        },
        EngineCommand::ScheduleSearch { .. } | EngineCommand::CancelSearch => return,
    };
    let _ = event_tx.send(event);
}
