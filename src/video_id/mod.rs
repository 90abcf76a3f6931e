use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::{TranscriptError, TranscriptResult};

const VIDEO_ID_LEN: usize = 11;
const SHORT_LINK_MARKER: &str = "youtu.be/";
const SITE_MARKER: &str = "youtube.com";

/// Canonical 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accept `candidate` only if it is exactly 11 characters of `[A-Za-z0-9_-]`
    pub fn parse(candidate: &str) -> Option<Self> {
        is_video_id(candidate).then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolve a YouTube URL or bare video ID into a [`VideoId`].
///
/// Supported shapes:
/// * a bare 11-character ID
/// * short links: `youtu.be/<id>[?...]`
/// * watch pages: `youtube.com/watch?v=<id>` (first `v` parameter wins)
/// * embeds: `youtube.com/embed/<id>`
///
/// This is pure string handling; nothing touches the network.
pub fn resolve(input: &str) -> TranscriptResult<VideoId> {
    if let Some(id) = VideoId::parse(input) {
        return Ok(id);
    }

    let extracted = if input.contains(SHORT_LINK_MARKER) {
        extract_short_link(input)
    } else if input.contains(SITE_MARKER) {
        extract_site_url(input)
    } else {
        None
    };

    extracted
        .filter(|candidate| !candidate.is_empty())
        .and_then(|candidate| VideoId::parse(&candidate))
        .ok_or_else(|| TranscriptError::InvalidIdentifier(input.to_string()))
}

fn extract_short_link(input: &str) -> Option<String> {
    let tail = input.rsplit(SHORT_LINK_MARKER).next()?;
    tail.split('?').next().map(str::to_string)
}

fn extract_site_url(input: &str) -> Option<String> {
    let url = parse_lenient(input)?;
    let path = url.path();

    if path.contains("watch") {
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else if path.contains("embed") {
        let tail = path.rsplit("/embed/").next()?;
        tail.split('/').next().map(str::to_string)
    } else {
        None
    }
}

/// Parse `input` as a URL, tolerating a missing scheme (`www.youtube.com/watch?v=...`)
fn parse_lenient(input: &str) -> Option<Url> {
    Url::parse(input)
        .ok()
        .filter(|url| url.has_host())
        .or_else(|| Url::parse(&format!("https://{}", input)).ok())
}
