use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use crate::view_model::{AppViewModel, ListingView, TableBody, UploadView};
use crate::{
    page_links, Effect, Pagination, Project, ProjectQuery, SelectedFile, UploadFailure,
    UploadStats, SKELETON_ROWS,
};

pub type RequestId = u64;
pub type TimerId = u64;
pub type UploadId = u64;

/// Quiet period after the last keystroke before a search is issued.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(600);

/// Non-empty search terms shorter than this (after trimming) never hit the API.
pub const MIN_KEYWORD_CHARS: usize = 2;

pub const ACCEPTED_SPREADSHEET_TYPES: [&str; 2] = [
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

const MSG_NO_FILE: &str = "Please select an Excel file to upload first";
const MSG_BAD_TYPE: &str = "Please upload a valid Excel file (.xls or .xlsx)";
const MSG_UPLOADING: &str = "Uploading and processing data...";
const MSG_UPLOADED: &str = "Data imported successfully!";
const MSG_UPLOAD_REJECTED: &str = "Upload failed";
const MSG_UPLOAD_ERROR: &str = "An error occurred during upload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlightQuery {
    request_id: RequestId,
    /// Keyword committed once this query completes.
    keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSearch {
    timer_id: TimerId,
    term: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ListingState {
    projects: Vec<Project>,
    pagination: Pagination,
    loading: bool,
    in_flight: Option<InFlightQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct SearchState {
    keyword: String,
    pending_input: String,
    is_composing: bool,
    pending_timer: Option<PendingSearch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct UploadState {
    file: Option<SelectedFile>,
    phase: UploadPhase,
    message: String,
    stats: Option<UploadStats>,
    /// Upload whose completion is still awaited.
    in_flight: Option<UploadId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    listing: ListingState,
    search: SearchState,
    upload: UploadState,
    debounce_delay: Duration,
    next_request_id: RequestId,
    next_timer_id: TimerId,
    next_upload_id: UploadId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            listing: ListingState::default(),
            search: SearchState::default(),
            upload: UploadState::default(),
            debounce_delay: DEBOUNCE_DELAY,
            next_request_id: 1,
            next_timer_id: 1,
            next_upload_id: 1,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            listing: self.listing_view(),
            upload: self.upload_view(),
            dirty: self.dirty,
        }
    }

    /// Committed search term applied to the listing.
    pub fn keyword(&self) -> &str {
        &self.search.keyword
    }

    /// Live search box text.
    pub fn pending_input(&self) -> &str {
        &self.search.pending_input
    }

    pub fn is_composing(&self) -> bool {
        self.search.is_composing
    }

    pub fn is_loading(&self) -> bool {
        self.listing.loading
    }

    pub fn has_pending_search(&self) -> bool {
        self.search.pending_timer.is_some()
    }

    pub fn upload_phase(&self) -> UploadPhase {
        self.upload.phase
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn current_page(&self) -> u32 {
        self.listing.pagination.page
    }

    pub(crate) fn total_pages(&self) -> u32 {
        self.listing.pagination.total_pages
    }

    pub(crate) fn set_pending_input(&mut self, value: String) {
        self.search.pending_input = value;
        self.mark_dirty();
    }

    pub(crate) fn set_composing(&mut self, composing: bool) {
        self.search.is_composing = composing;
    }

    pub(crate) fn clear_search(&mut self) {
        self.search.pending_input.clear();
        self.search.keyword.clear();
        self.mark_dirty();
    }

    /// Issues a listing query for `page` and `term`, or nothing for a
    /// non-empty term that is too short to search on.
    pub(crate) fn fetch_page(&mut self, page: u32, term: &str) -> Option<Effect> {
        let trimmed_len = term.trim().chars().count();
        let query = if trimmed_len == 0 && page == 1 {
            ProjectQuery::unfiltered(1)
        } else if trimmed_len > 0 && trimmed_len < MIN_KEYWORD_CHARS {
            catalog_debug!("Skipping search for short term {:?}", term);
            return None;
        } else {
            ProjectQuery::with_keyword(page, term)
        };

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.listing.in_flight = Some(InFlightQuery {
            request_id,
            keyword: query.keyword.clone().unwrap_or_default(),
        });
        self.listing.loading = true;
        self.mark_dirty();
        Some(Effect::FetchProjects { request_id, query })
    }

    fn is_latest_request(&self, request_id: RequestId) -> bool {
        self.listing
            .in_flight
            .as_ref()
            .is_some_and(|query| query.request_id == request_id)
    }

    pub(crate) fn apply_projects(
        &mut self,
        request_id: RequestId,
        projects: Vec<Project>,
        pagination: Pagination,
    ) {
        if !self.is_latest_request(request_id) {
            catalog_debug!("Discarding stale listing response {}", request_id);
            return;
        }
        let Some(query) = self.listing.in_flight.take() else {
            return;
        };
        self.listing.projects = projects;
        self.listing.pagination = pagination;
        self.listing.loading = false;
        self.search.keyword = query.keyword;
        self.mark_dirty();
    }

    pub(crate) fn apply_projects_failed(&mut self, request_id: RequestId, reason: &str) {
        if !self.is_latest_request(request_id) {
            catalog_debug!("Discarding stale listing failure {}: {}", request_id, reason);
            return;
        }
        catalog_warn!("Error fetching projects: {}", reason);
        self.listing.in_flight = None;
        self.listing.loading = false;
        self.mark_dirty();
    }

    /// Starts a fresh debounce window for `term`, superseding any pending one.
    pub(crate) fn schedule_search(&mut self, term: String) -> Effect {
        let timer_id = self.next_timer_id;
        self.next_timer_id += 1;
        self.search.pending_timer = Some(PendingSearch { timer_id, term });
        Effect::ScheduleSearch {
            timer_id,
            delay: self.debounce_delay,
        }
    }

    pub(crate) fn cancel_search(&mut self) -> Option<Effect> {
        self.search
            .pending_timer
            .take()
            .map(|_| Effect::CancelSearch)
    }

    /// Claims the pending search term if `timer_id` is the live timer.
    pub(crate) fn take_elapsed_search(&mut self, timer_id: TimerId) -> Option<String> {
        match &self.search.pending_timer {
            Some(pending) if pending.timer_id == timer_id => {
                self.search.pending_timer.take().map(|pending| pending.term)
            }
            _ => {
                catalog_debug!("Ignoring superseded search timer {}", timer_id);
                None
            }
        }
    }

    pub(crate) fn select_file(&mut self, file: Option<SelectedFile>) {
        self.upload = UploadState {
            file,
            ..UploadState::default()
        };
        self.mark_dirty();
    }

    pub(crate) fn begin_upload(&mut self) -> Option<Effect> {
        if self.upload.phase == UploadPhase::Uploading {
            return None;
        }
        self.mark_dirty();
        let Some(file) = self.upload.file.as_ref() else {
            self.fail_upload(MSG_NO_FILE.to_string());
            return None;
        };
        if !ACCEPTED_SPREADSHEET_TYPES.contains(&file.content_type.as_str()) {
            catalog_info!(
                "Rejected upload of {} with type {:?}",
                file.name,
                file.content_type
            );
            self.fail_upload(MSG_BAD_TYPE.to_string());
            return None;
        }

        let file = file.clone();
        let upload_id = self.next_upload_id;
        self.next_upload_id += 1;
        self.upload.in_flight = Some(upload_id);
        self.upload.phase = UploadPhase::Uploading;
        self.upload.message = MSG_UPLOADING.to_string();
        Some(Effect::UploadSpreadsheet { upload_id, file })
    }

    pub(crate) fn finish_upload(
        &mut self,
        upload_id: UploadId,
        result: Result<UploadStats, UploadFailure>,
    ) {
        if self.upload.in_flight != Some(upload_id) {
            catalog_debug!("Dropping result of superseded upload {}", upload_id);
            return;
        }
        self.upload.in_flight = None;
        match result {
            Ok(stats) => {
                self.upload.phase = UploadPhase::Success;
                self.upload.message = MSG_UPLOADED.to_string();
                self.upload.stats = Some(stats);
            }
            Err(failure) => {
                catalog_warn!("Upload error: {:?}", failure);
                let (message, fallback) = match failure {
                    UploadFailure::Rejected(message) => (message, MSG_UPLOAD_REJECTED),
                    UploadFailure::Failed(message) => (message, MSG_UPLOAD_ERROR),
                };
                let message = if message.trim().is_empty() {
                    fallback.to_string()
                } else {
                    message
                };
                self.fail_upload(message);
            }
        }
        self.mark_dirty();
    }

    fn fail_upload(&mut self, message: String) {
        self.upload.phase = UploadPhase::Error;
        self.upload.message = message;
    }

    fn listing_view(&self) -> ListingView {
        let listing = &self.listing;
        let pagination = listing.pagination;
        let body = if listing.projects.is_empty() {
            if listing.loading {
                TableBody::Skeleton(SKELETON_ROWS)
            } else {
                TableBody::Empty
            }
        } else {
            TableBody::Rows(listing.projects.clone())
        };

        ListingView {
            body,
            pagination,
            loading: listing.loading,
            keyword: self.search.keyword.clone(),
            search_input: self.search.pending_input.clone(),
            show_clear_button: !self.search.pending_input.is_empty(),
            show_spinner: listing.loading && self.search.pending_input.is_empty(),
            result_count: (!self.search.keyword.is_empty()).then_some(pagination.total_count),
            page_links: page_links(pagination.page, pagination.total_pages),
            can_go_previous: pagination.page > 1,
            can_go_next: pagination.page < pagination.total_pages,
        }
    }

    fn upload_view(&self) -> UploadView {
        let upload = &self.upload;
        let uploading = upload.phase == UploadPhase::Uploading;
        UploadView {
            selected_file: upload.file.as_ref().map(|file| file.name.clone()),
            phase: upload.phase,
            message: upload.message.clone(),
            stats: upload.stats,
            can_upload: upload.file.is_some() && !uploading,
            button_label: if uploading {
                "Processing...".to_string()
            } else {
                "Upload and import".to_string()
            },
        }
    }
}
