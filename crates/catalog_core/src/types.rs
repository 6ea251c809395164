pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_count: 0,
            total_pages: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadStats {
    pub total: u64,
    pub added: u64,
    pub updated: u64,
}

/// Why an upload produced no stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// The server answered with an error status; carries its message.
    Rejected(String),
    /// The request never completed or the reply was unreadable.
    Failed(String),
}

/// A file picked by the user, with the MIME type the host reported for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
