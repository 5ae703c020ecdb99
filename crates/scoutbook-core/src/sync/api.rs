//! Server API client
//!
//! The sync protocol's HTTP edge. [`ScoutApi`] is the seam the engine is
//! written against; [`HttpScoutApi`] is the reqwest implementation used in
//! production, while tests script a fake.

use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::models::{EntryRecord, ImageUpload, RecordKind};

/// Operations the sync engine needs from the central server.
#[allow(async_fn_in_trait)]
pub trait ScoutApi {
    /// Fetch the current event's roster and match list as raw JSON.
    async fn event_matches(&self) -> Result<String>;

    /// Fetch one entry kind's field definitions as raw JSON.
    async fn entry_fields(&self, kind: RecordKind) -> Result<String>;

    /// Bulk-upload changed records of one kind.
    async fn upload_entries<R: EntryRecord>(&self, records: &[R]) -> Result<()>;

    /// Exchange known-entry markers for records the server holds newer
    /// versions of (or that are missing locally).
    async fn filtered_entries<R: EntryRecord>(&self, markers: &[R::Marker]) -> Result<Vec<R>>;

    /// Upload one attachment's binary and metadata.
    async fn upload_image(&self, image: &ImageUpload) -> Result<()>;
}

/// HTTP implementation of [`ScoutApi`].
#[derive(Clone)]
pub struct HttpScoutApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpScoutApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            client: reqwest::Client::builder().build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl ScoutApi for HttpScoutApi {
    async fn event_matches(&self) -> Result<String> {
        let response = self.client.get(self.url("/api/event/matches")).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn entry_fields(&self, kind: RecordKind) -> Result<String> {
        let path = format!("/api/{}/fields", kind.api_segment());
        let response = self.client.get(self.url(&path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.text().await?)
    }

    async fn upload_entries<R: EntryRecord>(&self, records: &[R]) -> Result<()> {
        let path = format!("/api/{}/data/all", R::KIND.api_segment());
        let response = self
            .client
            .put(self.url(&path))
            .json(records)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn filtered_entries<R: EntryRecord>(&self, markers: &[R::Marker]) -> Result<Vec<R>> {
        let path = format!("/api/{}/data/filtered", R::KIND.api_segment());
        let response = self
            .client
            .post(self.url(&path))
            .json(markers)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn upload_image(&self, image: &ImageUpload) -> Result<()> {
        // array body with one element
        let response = self
            .client
            .put(self.url("/api/images"))
            .json(std::slice::from_ref(image))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api(format_api_error(status, &body)))
}

fn format_api_error(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "server URL must not be empty".to_string(),
        ));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "server URL must include http:// or https://".to_string(),
        ))
    }
}
