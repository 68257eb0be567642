//! HTTP client for the Beefweb REST API.
//!
//! Every call is a single request bounded by the client's timeout. Failures
//! are returned as [`RemoteError`]; nothing here retries.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use super::traits::{PlayerControl, PlayerQuery};
use super::types::{Artwork, PlayerResponse, PlayerStatus, PlaylistItemsResponse};
use super::urls::{BeefwebUrls, ControlAction};
use crate::protocol_constants::DEFAULT_ARTWORK_CONTENT_TYPE;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while talking to the remote player.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connection, timeout or body read failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The player answered with a non-success status.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The configured base URL produced an unparseable endpoint.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Convenient Result alias for remote player operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// Beefweb implementation of [`PlayerQuery`] and [`PlayerControl`].
#[derive(Clone)]
pub struct BeefwebClient {
    client: Client,
    urls: BeefwebUrls,
}

impl BeefwebClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// The request timeout is whatever `client` was built with.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            urls: BeefwebUrls::new(base_url),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.urls.base_url()
    }

    async fn get(&self, url: Url) -> RemoteResult<Response> {
        log::trace!("[Beefweb] GET {}", url);
        let res = self.client.get(url).send().await?;
        check_status(res)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> RemoteResult<T> {
        let res = self.get(url).await?;
        let body = res.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn post_empty(&self, action: ControlAction) -> RemoteResult<()> {
        let url = self.urls.control(action)?;
        log::debug!("[Beefweb] POST {}", url);
        let res = self
            .client
            .post(url)
            .header(CONTENT_LENGTH, 0)
            .body(Bytes::new())
            .send()
            .await?;
        check_status(res).map(|_| ())
    }
}

fn check_status(res: Response) -> RemoteResult<Response> {
    let status = res.status();
    if status.is_success() {
        Ok(res)
    } else {
        Err(RemoteError::HttpStatus(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown").to_string(),
        ))
    }
}

#[async_trait]
impl PlayerQuery for BeefwebClient {
    async fn fetch_status(&self) -> RemoteResult<PlayerStatus> {
        let resp: PlayerResponse = self.get_json(self.urls.player()?).await?;
        Ok(resp.player)
    }

    async fn fetch_queue_window(
        &self,
        playlist_id: &str,
        start_index: i64,
    ) -> RemoteResult<Vec<Vec<String>>> {
        if playlist_id.is_empty() {
            return Ok(Vec::new());
        }
        let offset = u32::try_from(start_index).unwrap_or(0);
        let url = self.urls.queue_window(playlist_id, offset)?;
        let resp: PlaylistItemsResponse = self.get_json(url).await?;
        Ok(resp
            .playlist_items
            .items
            .into_iter()
            .map(|item| item.columns)
            .collect())
    }

    async fn fetch_artwork(&self, playlist_id: &str, index: u32) -> RemoteResult<Artwork> {
        let res = self.get(self.urls.artwork(playlist_id, index)?).await?;
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_ARTWORK_CONTENT_TYPE)
            .to_string();
        let bytes = res.bytes().await?;
        Ok(Artwork {
            bytes,
            content_type,
        })
    }
}

#[async_trait]
impl PlayerControl for BeefwebClient {
    async fn toggle_pause(&self) -> RemoteResult<()> {
        self.post_empty(ControlAction::TogglePause).await
    }

    async fn next(&self) -> RemoteResult<()> {
        self.post_empty(ControlAction::Next).await
    }

    async fn stop(&self) -> RemoteResult<()> {
        self.post_empty(ControlAction::Stop).await
    }
}
