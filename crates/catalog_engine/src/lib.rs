//! Catalog engine: HTTP client, debounce timer, effect execution and the
//! in-memory project store.
mod client;
mod debounce;
mod engine;
mod settings;
mod store;
mod types;

pub use client::{CatalogApi, ReqwestCatalogApi};
pub use debounce::DebounceTimer;
pub use engine::EngineHandle;
pub use settings::{
    load_settings, CatalogSettings, SettingsError, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE,
};
pub use store::{ProjectStore, StoreCatalogApi};
pub use types::{
    ApiError, EngineError, EngineEvent, FailureKind, ListQuery, PaginationInfo, Project,
    ProjectPage, RequestId, SpreadsheetFile, TimerId, UploadId, UploadStats,
};
