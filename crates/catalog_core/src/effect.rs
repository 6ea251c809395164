use std::time::Duration;

use crate::{RequestId, SelectedFile, TimerId, UploadId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue a listing query; the response must be tagged with `request_id`.
    FetchProjects {
        request_id: RequestId,
        query: ProjectQuery,
    },
    /// (Re)start the search debounce timer, replacing any pending one.
    ScheduleSearch { timer_id: TimerId, delay: Duration },
    /// Drop the pending debounce timer without firing it.
    CancelSearch,
    /// Return keyboard focus to the search box.
    FocusSearchInput,
    /// Post the file; the completion must be tagged with `upload_id`.
    UploadSpreadsheet {
        upload_id: UploadId,
        file: SelectedFile,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub page: u32,
    /// `None` for the unfiltered listing.
    pub keyword: Option<String>,
}

impl ProjectQuery {
    pub fn unfiltered(page: u32) -> Self {
        Self {
            page,
            keyword: None,
        }
    }

    pub fn with_keyword(page: u32, keyword: impl Into<String>) -> Self {
        Self {
            page,
            keyword: Some(keyword.into()),
        }
    }
}
