//! HTML fragment rendering for htmx out-of-band swaps.
//!
//! Each patch becomes one JSON object mapping fragment names to markup, plus
//! the `hx-swap-oob` marker. The page's ws extension swaps every element by
//! its `id`.

use html_escape::encode_text;
use serde_json::{Map, Value};

use super::UiPatch;
use crate::beefweb::{PlaybackState, Track};
use crate::protocol_constants::{
    ARTWORK_ROUTE, FRAGMENT_ALBUM, FRAGMENT_COVER_ART, FRAGMENT_PLAYBACK_STATE, FRAGMENT_TITLE,
    FRAGMENT_UP_NEXT_ALBUM, FRAGMENT_UP_NEXT_TITLE, OOB_SWAP_KEY, OOB_SWAP_VALUE,
};

/// Element ids and classes for one track slot.
struct SlotMarkup {
    title_key: &'static str,
    title_id: &'static str,
    title_class: Option<&'static str>,
    album_key: &'static str,
    album_id: &'static str,
}

const NOW_PLAYING: SlotMarkup = SlotMarkup {
    title_key: FRAGMENT_TITLE,
    title_id: "Title",
    title_class: Some("track-title"),
    album_key: FRAGMENT_ALBUM,
    album_id: "Album",
};

const UP_NEXT: SlotMarkup = SlotMarkup {
    title_key: FRAGMENT_UP_NEXT_TITLE,
    title_id: "UpNextTitle",
    title_class: None,
    album_key: FRAGMENT_UP_NEXT_ALBUM,
    album_id: "UpNextAlbum",
};

impl UiPatch {
    /// Builds the JSON message for this patch.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut fragments = Map::new();
        match self {
            Self::PlaybackState(state) => {
                fragments.insert(
                    FRAGMENT_PLAYBACK_STATE.into(),
                    playback_state_fragment(*state).into(),
                );
            }
            Self::NowPlaying(track) => insert_track(&mut fragments, &NOW_PLAYING, track.as_ref()),
            Self::UpNext(track) => insert_track(&mut fragments, &UP_NEXT, track.as_ref()),
            Self::CoverArt(revision) => {
                fragments.insert(
                    FRAGMENT_COVER_ART.into(),
                    cover_art_fragment(*revision).into(),
                );
            }
        }
        fragments.insert(OOB_SWAP_KEY.into(), OOB_SWAP_VALUE.into());
        Value::Object(fragments)
    }

    /// Serializes this patch to a single text frame.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_json().to_string()
    }
}

fn playback_state_fragment(state: PlaybackState) -> String {
    format!(
        "<div id='PlaybackState'><span class='playback-{}'>{}</span></div>",
        state.css_class(),
        state.label()
    )
}

fn insert_track(fragments: &mut Map<String, Value>, slot: &SlotMarkup, track: Option<&Track>) {
    let class_attr = slot
        .title_class
        .map(|c| format!(" class='{c}'"))
        .unwrap_or_default();

    let (title, album) = match track {
        Some(t) => (
            format!("{} - {}", encode_text(&t.artist), encode_text(&t.title)),
            format!(
                "{} ({})",
                encode_text(&t.album),
                track_position(t.track_number, t.total_tracks)
            ),
        ),
        None => (String::new(), String::new()),
    };

    fragments.insert(
        slot.title_key.into(),
        format!("<div id='{}'{}>{}</div>", slot.title_id, class_attr, title).into(),
    );
    fragments.insert(
        slot.album_key.into(),
        format!(
            "<div id='{}' class='track-details'>{}</div>",
            slot.album_id, album
        )
        .into(),
    );
}

fn track_position(track_number: Option<i32>, total_tracks: i32) -> String {
    let number = track_number.map_or_else(|| "-".to_string(), |n| n.to_string());
    let total = if total_tracks == 0 {
        "?".to_string()
    } else {
        total_tracks.to_string()
    };
    format!("{number} / {total}")
}

fn cover_art_fragment(revision: Option<u64>) -> String {
    match revision {
        Some(rev) => format!(
            "<div id='CoverArt'><img src='{ARTWORK_ROUTE}?rev={rev}' alt='Cover art'></div>"
        ),
        None => "<div id='CoverArt'></div>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(artist: &str, title: &str, album: &str) -> Track {
        Track {
            artist: artist.into(),
            title: title.into(),
            album: album.into(),
            length: "3:20".into(),
            track_number: Some(3),
            total_tracks: 0,
            path: "/p".into(),
        }
    }

    #[test]
    fn playback_state_patch_has_fragment_and_marker() {
        let json = UiPatch::PlaybackState(PlaybackState::Playing).to_json();
        assert_eq!(json[OOB_SWAP_KEY], "true");
        assert_eq!(
            json[FRAGMENT_PLAYBACK_STATE],
            "<div id='PlaybackState'><span class='playback-playing'>Playing</span></div>"
        );
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn unknown_state_reads_not_available() {
        let json = UiPatch::PlaybackState(PlaybackState::Unknown).to_json();
        assert!(json[FRAGMENT_PLAYBACK_STATE]
            .as_str()
            .unwrap()
            .contains("Player Not Available"));
    }

    #[test]
    fn now_playing_renders_title_and_album() {
        let json = UiPatch::NowPlaying(Some(track("A", "T", "X1"))).to_json();
        assert_eq!(
            json[FRAGMENT_TITLE],
            "<div id='Title' class='track-title'>A - T</div>"
        );
        assert_eq!(
            json[FRAGMENT_ALBUM],
            "<div id='Album' class='track-details'>X1 (3 / ?)</div>"
        );
        assert!(json.get(FRAGMENT_UP_NEXT_TITLE).is_none());
    }

    #[test]
    fn cleared_up_next_renders_empty_divs() {
        let json = UiPatch::UpNext(None).to_json();
        assert_eq!(json[FRAGMENT_UP_NEXT_TITLE], "<div id='UpNextTitle'></div>");
        assert_eq!(
            json[FRAGMENT_UP_NEXT_ALBUM],
            "<div id='UpNextAlbum' class='track-details'></div>"
        );
    }

    #[test]
    fn track_text_is_escaped() {
        let json = UiPatch::NowPlaying(Some(track("<b>A&B</b>", "T", "X"))).to_json();
        let title = json[FRAGMENT_TITLE].as_str().unwrap();
        assert!(title.contains("&lt;b&gt;A&amp;B&lt;/b&gt;"));
        assert!(!title.contains("<b>"));
    }

    #[test]
    fn unknown_track_number_renders_dash() {
        assert_eq!(track_position(None, 12), "- / 12");
        assert_eq!(track_position(Some(1), 12), "1 / 12");
    }

    #[test]
    fn cover_art_points_at_revision() {
        let json = UiPatch::CoverArt(Some(4)).to_json();
        assert!(json[FRAGMENT_COVER_ART]
            .as_str()
            .unwrap()
            .contains("/artwork?rev=4"));
        let empty = UiPatch::CoverArt(None).to_json();
        assert_eq!(empty[FRAGMENT_COVER_ART], "<div id='CoverArt'></div>");
    }

    #[test]
    fn text_frame_is_valid_json() {
        let text = UiPatch::UpNext(Some(track("A", "T", "X"))).to_text();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[OOB_SWAP_KEY], "true");
    }
}
