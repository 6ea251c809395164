use catalog_core::{Effect, Msg, Pagination, Project, SelectedFile, UploadFailure, UploadStats};
use catalog_engine::{
    ApiError, EngineEvent, EngineHandle, FailureKind, ListQuery, ProjectPage, SpreadsheetFile,
};
use catalog_logging::{catalog_debug, catalog_info};

pub struct EffectRunner {
    engine: EngineHandle,
    page_size: u32,
}

/// Host-side work an effect asks for that the engine cannot do.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HostRequests {
    pub focus_search: bool,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, page_size: u32) -> Self {
        Self { engine, page_size }
    }

    pub fn run(&self, effects: Vec<Effect>) -> HostRequests {
        let mut host = HostRequests::default();
        for effect in effects {
            match effect {
                Effect::FetchProjects { request_id, query } => {
                    catalog_info!(
                        "FetchProjects request_id={} page={} keyword={:?}",
                        request_id,
                        query.page,
                        query.keyword
                    );
                    self.engine.fetch_projects(
                        request_id,
                        ListQuery {
                            page: query.page,
                            page_size: self.page_size,
                            keyword: query.keyword,
                        },
                    );
                }
                Effect::ScheduleSearch { timer_id, delay } => {
                    catalog_debug!("ScheduleSearch timer_id={} delay={:?}", timer_id, delay);
                    self.engine.schedule_search(timer_id, delay);
                }
                Effect::CancelSearch => self.engine.cancel_search(),
                Effect::FocusSearchInput => host.focus_search = true,
                Effect::UploadSpreadsheet { upload_id, file } => {
                    catalog_info!(
                        "UploadSpreadsheet upload_id={} name={} bytes={}",
                        upload_id,
                        file.name,
                        file.bytes.len()
                    );
                    self.engine.upload(upload_id, to_spreadsheet(file));
                }
            }
        }
        host
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProjectsLoaded { request_id, result } => match result {
            Ok(page) => {
                let (projects, pagination) = map_page(page);
                Msg::ProjectsLoaded {
                    request_id,
                    projects,
                    pagination,
                }
            }
            Err(err) => Msg::ProjectsFailed {
                request_id,
                reason: err.to_string(),
            },
        },
        EngineEvent::UploadCompleted { upload_id, result } => Msg::UploadFinished {
            upload_id,
            result: result
                .map(|stats| UploadStats {
                    total: stats.total,
                    added: stats.added,
                    updated: stats.updated,
                })
                .map_err(map_upload_error),
        },
        EngineEvent::SearchTimerElapsed { timer_id } => Msg::SearchTimerElapsed { timer_id },
    }
}

/// Error statuses carry the server's message; anything else is a failed request.
fn map_upload_error(err: ApiError) -> UploadFailure {
    match err.kind {
        FailureKind::HttpStatus(_) => UploadFailure::Rejected(err.message),
        _ => UploadFailure::Failed(err.message),
    }
}

fn map_page(page: ProjectPage) -> (Vec<Project>, Pagination) {
    let projects = page
        .data
        .into_iter()
        .map(|project| Project {
            id: project.id,
            name: project.name,
        })
        .collect();
    let info = page.pagination;
    let pagination = Pagination {
        page: info.page,
        page_size: info.page_size,
        total_count: info.total_count,
        total_pages: info.total_pages,
    };
    (projects, pagination)
}

fn to_spreadsheet(file: SelectedFile) -> SpreadsheetFile {
    SpreadsheetFile {
        file_name: file.name,
        content_type: file.content_type,
        bytes: file.bytes,
    }
}
