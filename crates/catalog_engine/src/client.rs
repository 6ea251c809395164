use catalog_logging::catalog_debug;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::{
    ApiError, CatalogSettings, FailureKind, ListQuery, ProjectPage, SpreadsheetFile, UploadStats,
};

const PROJECTS_PATH: &str = "api/projects";
const UPLOAD_PATH: &str = "api/admin/upload";
const UPLOAD_FAILED: &str = "Upload failed";

#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_projects(&self, query: &ListQuery) -> Result<ProjectPage, ApiError>;

    async fn upload_spreadsheet(&self, file: SpreadsheetFile) -> Result<UploadStats, ApiError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    stats: UploadStats,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestCatalogApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestCatalogApi {
    pub fn new(settings: &CatalogSettings) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Endpoints are joined relative to the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    pub fn projects_url(&self, query: &ListQuery) -> Result<Url, ApiError> {
        let mut url = self.endpoint(PROJECTS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &query.page.to_string());
            pairs.append_pair("pageSize", &query.page_size.to_string());
            if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.is_empty()) {
                pairs.append_pair("keyword", keyword);
            }
        }
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CatalogApi for ReqwestCatalogApi {
    async fn list_projects(&self, query: &ListQuery) -> Result<ProjectPage, ApiError> {
        let url = self.projects_url(query)?;
        catalog_debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))
    }

    async fn upload_spreadsheet(&self, file: SpreadsheetFile) -> Result<UploadStats, ApiError> {
        let url = self.endpoint(UPLOAD_PATH)?;
        catalog_debug!(
            "POST {} file={} bytes={}",
            url,
            file.file_name,
            file.bytes.len()
        );

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|err| ApiError::new(FailureKind::InvalidRequest, err.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(|error| error.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| UPLOAD_FAILED.to_string());
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        serde_json::from_slice::<UploadResponse>(&body)
            .map(|response| response.stats)
            .map_err(|err| ApiError::new(FailureKind::InvalidResponse, err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
