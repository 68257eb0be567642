//! URL construction for Beefweb endpoints.

use url::Url;

use crate::protocol_constants::{QUEUE_WINDOW_SIZE, TRACK_COLUMNS};

/// Player transport actions exposed as `POST` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    TogglePause,
    Next,
    Stop,
}

impl ControlAction {
    fn path(&self) -> &'static str {
        match self {
            Self::TogglePause => "player/pause/toggle",
            Self::Next => "player/next",
            Self::Stop => "player/stop",
        }
    }
}

/// Builds endpoint URLs relative to a Beefweb API base URL.
#[derive(Debug, Clone)]
pub struct BeefwebUrls {
    base: String,
}

impl BeefwebUrls {
    /// Creates a builder for `base` (e.g. `http://127.0.0.1:8880/api`).
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// `GET {base}/player?columns=...`
    pub fn player(&self) -> Result<Url, url::ParseError> {
        Ok(with_columns(self.endpoint(&["player"])?))
    }

    /// `GET {base}/playlists/{id}/items/{offset}:2?columns=...`
    ///
    /// `playlist_id` is percent-encoded as a single path segment.
    pub fn queue_window(&self, playlist_id: &str, offset: u32) -> Result<Url, url::ParseError> {
        let range = format!("{}:{}", offset, QUEUE_WINDOW_SIZE);
        Ok(with_columns(self.endpoint(&[
            "playlists",
            playlist_id,
            "items",
            &range,
        ])?))
    }

    /// `GET {base}/artwork/{id}/{index}`
    pub fn artwork(&self, playlist_id: &str, index: u32) -> Result<Url, url::ParseError> {
        self.endpoint(&["artwork", playlist_id, &index.to_string()])
    }

    /// `POST {base}/player/...`
    pub fn control(&self, action: ControlAction) -> Result<Url, url::ParseError> {
        self.endpoint(&action.path().split('/').collect::<Vec<_>>())
    }

    /// Appends `segments` to the base path, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.base)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn with_columns(mut url: Url) -> Url {
    url.query_pairs_mut()
        .append_pair("columns", &TRACK_COLUMNS.join(","));
    url
}
