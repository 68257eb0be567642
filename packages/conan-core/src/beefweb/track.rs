//! Track records parsed from Beefweb column lists.
//!
//! Beefweb returns each playlist item as a positional list of formatted
//! strings, one per requested column (see
//! [`TRACK_COLUMNS`](crate::protocol_constants::TRACK_COLUMNS)). This module
//! turns such a list into a validated [`Track`] or rejects it as a whole.

use serde::Serialize;
use thiserror::Error;

use crate::protocol_constants::{
    TRACK_COLUMN_COUNT, TRACK_NUMBER_SEPARATOR, UNKNOWN_TOTAL_TRACKS, UNKNOWN_TRACK_NUMBER,
};

/// Errors produced while validating a raw column list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The record did not contain exactly one value per requested column.
    #[error("expected {expected} columns, got {0}", expected = TRACK_COLUMN_COUNT)]
    MalformedRecord(usize),

    /// The track-number column is neither numeric nor the unknown marker.
    #[error("invalid track number: '{0}'")]
    InvalidTrackNumber(String),

    /// The total-tracks column is neither numeric nor the unknown marker.
    #[error("invalid total tracks: '{0}'")]
    InvalidTotalTracks(String),
}

/// A fully validated track.
///
/// A `Track` only exists if every column passed validation; there is no
/// partially populated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album: String,
    /// Formatted length as reported by the player (e.g. `3:20`).
    pub length: String,
    /// `None` when the player reports the track number as unknown (`-`).
    pub track_number: Option<i32>,
    /// `0` when the player reports the total as unknown (`?`).
    pub total_tracks: i32,
    pub path: String,
}

impl Track {
    /// Parses a raw column list in [`TRACK_COLUMNS`](crate::protocol_constants::TRACK_COLUMNS) order.
    ///
    /// Every column is trimmed and stripped of `"` characters first. A
    /// `current/total` track number keeps only the numerator.
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Result<Self, TrackError> {
        if columns.len() != TRACK_COLUMN_COUNT {
            return Err(TrackError::MalformedRecord(columns.len()));
        }

        let c: Vec<String> = columns.iter().map(|s| clean_column(s.as_ref())).collect();

        Ok(Self {
            track_number: parse_track_number(&c[4])?,
            total_tracks: parse_total_tracks(&c[5])?,
            artist: c[0].clone(),
            title: c[1].clone(),
            album: c[2].clone(),
            length: c[3].clone(),
            path: c[6].clone(),
        })
    }

    /// Returns true if both tracks name the same song.
    ///
    /// Identity is artist + title only. Album and the remaining fields are
    /// metadata that may drift without the song changing.
    #[must_use]
    pub fn same_identity(&self, other: &Track) -> bool {
        self.artist == other.artist && self.title == other.title
    }

    /// Returns true if both tracks belong to the same album.
    #[must_use]
    pub fn same_album(&self, other: &Track) -> bool {
        self.album == other.album
    }
}

fn clean_column(raw: &str) -> String {
    raw.trim().replace('"', "").trim().to_string()
}

fn parse_track_number(raw: &str) -> Result<Option<i32>, TrackError> {
    let numerator = raw
        .split(TRACK_NUMBER_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();

    if numerator == UNKNOWN_TRACK_NUMBER {
        return Ok(None);
    }
    if numerator.is_empty() || !numerator.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TrackError::InvalidTrackNumber(raw.to_string()));
    }
    numerator
        .parse()
        .map(Some)
        .map_err(|_| TrackError::InvalidTrackNumber(raw.to_string()))
}

fn parse_total_tracks(raw: &str) -> Result<i32, TrackError> {
    if raw == UNKNOWN_TOTAL_TRACKS {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| TrackError::InvalidTotalTracks(raw.to_string()))
}
