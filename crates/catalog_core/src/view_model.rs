use crate::{PageLink, Pagination, Project, UploadPhase, UploadStats};

/// Placeholder rows shown while the very first page is loading.
pub const SKELETON_ROWS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub listing: ListingView,
    pub upload: UploadView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TableBody {
    Skeleton(usize),
    #[default]
    Empty,
    Rows(Vec<Project>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingView {
    pub body: TableBody,
    pub pagination: Pagination,
    pub loading: bool,
    pub keyword: String,
    pub search_input: String,
    pub show_clear_button: bool,
    pub show_spinner: bool,
    /// Total matches, shown only while a keyword is applied.
    pub result_count: Option<u64>,
    pub page_links: Vec<PageLink>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub selected_file: Option<String>,
    pub phase: UploadPhase,
    pub message: String,
    pub stats: Option<UploadStats>,
    pub can_upload: bool,
    pub button_label: String,
}
