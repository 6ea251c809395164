use crate::{
    Pagination, Project, RequestId, SelectedFile, TimerId, UploadFailure, UploadId, UploadStats,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Listing view mounted; load the first unfiltered page.
    Started,
    /// User edited the search box.
    SearchInputChanged(String),
    /// An IME composition session began in the search box.
    CompositionStarted,
    /// An IME composition session ended with the finalized text.
    CompositionEnded(String),
    /// User pressed Enter in the search box.
    EnterPressed,
    /// User clicked the search icon.
    SearchIconClicked,
    /// User clicked the clear button.
    ClearClicked,
    /// User clicked a page link.
    PageSelected(u32),
    PreviousPageClicked,
    NextPageClicked,
    /// The debounce timer scheduled as `timer_id` expired.
    SearchTimerElapsed { timer_id: TimerId },
    /// Listing query completed.
    ProjectsLoaded {
        request_id: RequestId,
        projects: Vec<Project>,
        pagination: Pagination,
    },
    /// Listing query failed in transport or decoding.
    ProjectsFailed { request_id: RequestId, reason: String },
    /// User picked a file, or cleared the picker.
    FileSelected(Option<SelectedFile>),
    /// User clicked the upload button.
    UploadClicked,
    /// The upload issued as `upload_id` completed.
    UploadFinished {
        upload_id: UploadId,
        result: Result<UploadStats, UploadFailure>,
    },
}
