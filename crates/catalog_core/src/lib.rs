//! Catalog core: pure state machine, page-number renderer and view-model helpers.
mod effect;
mod msg;
mod pagination;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::{Effect, ProjectQuery};
pub use msg::Msg;
pub use pagination::{page_links, PageLink, PAGE_LINK_SLOTS};
pub use state::{
    AppState, RequestId, TimerId, UploadId, UploadPhase, ACCEPTED_SPREADSHEET_TYPES,
    DEBOUNCE_DELAY, MIN_KEYWORD_CHARS,
};
pub use types::{
    Pagination, Project, SelectedFile, UploadFailure, UploadStats, DEFAULT_PAGE_SIZE,
};
pub use update::update;
pub use view_model::{AppViewModel, ListingView, TableBody, UploadView, SKELETON_ROWS};
