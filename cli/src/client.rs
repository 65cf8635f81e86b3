use std::{collections::HashSet, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use filectl_core::types::{DeletionStatus, FileList, FileRecord};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// The two operations the commands need from the remote file store.
#[async_trait]
pub trait FileStore {
    /// Every file in the store, in the order the service returns them.
    async fn list(&self) -> Result<Vec<FileRecord>>;

    async fn delete(&self, id: &str) -> Result<DeletionStatus>;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("API error (HTTP {status}): {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

pub struct FilesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl FilesClient {
    pub fn new(base_url: &str, api_key: &str, page_size: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(60))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            page_size: page_size.max(1),
        })
    }

    /// GET /files, following `has_more` until the last page or until the
    /// service hands back a cursor that was already requested.
    pub async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut after: Option<String> = None;

        loop {
            let page = self.list_page(after.as_deref()).await?;
            let next = page.next_cursor();
            records.extend(page.data);

            match next {
                Some(cursor) if seen.insert(cursor.clone()) => after = Some(cursor),
                Some(cursor) => {
                    tracing::warn!(%cursor, "list cursor repeated, stopping pagination");
                    break;
                }
                None => break,
            }
        }

        Ok(records)
    }

    async fn list_page(&self, after: Option<&str>) -> Result<FileList, ApiError> {
        let mut req = self
            .client
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .query(&[("limit", self.page_size)]);
        if let Some(after) = after {
            req = req.query(&[("after", after)]);
        }

        let resp = Self::check_response(req.send().await?).await?;
        let page: FileList = resp.json().await?;
        tracing::debug!(
            after = ?after,
            count = page.data.len(),
            has_more = page.has_more,
            "fetched file list page"
        );
        Ok(page)
    }

    /// DELETE /files/{id}
    pub async fn delete_file(&self, id: &str) -> Result<DeletionStatus, ApiError> {
        let resp = self
            .client
            .delete(format!("{}/files/{}", self.base_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        Ok(resp.json().await?)
    }

    async fn check_response(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(ApiErrorBody {
                error: ApiErrorDetail {
                    message,
                    code: Some(code),
                },
            }) => format!("[{code}] {message}"),
            Ok(ApiErrorBody { error }) => error.message,
            Err(_) => body,
        };
        Err(ApiError::Status { status, message })
    }
}

#[async_trait]
impl FileStore for FilesClient {
    async fn list(&self) -> Result<Vec<FileRecord>> {
        self.list_files()
            .await
            .context("failed to list files from the API")
    }

    async fn delete(&self, id: &str) -> Result<DeletionStatus> {
        self.delete_file(id)
            .await
            .with_context(|| format!("failed to delete file {id}"))
    }
}
