use async_trait::async_trait;

pub mod timedtext;
pub mod youtube;

pub use youtube::YoutubeProvider;

use crate::transcript::{CaptionSegment, CaptionTrack};
use crate::video_id::VideoId;
use crate::TranscriptResult;

/// Source of caption tracks and caption payloads for a video.
///
/// Implementations report provider conditions through the typed taxonomy:
/// `TranscriptsDisabled`, `VideoUnavailable` and `RequestBlocked` for every call,
/// `NoTranscriptFound` from [`fetch_payload`](Self::fetch_payload), and
/// `TranslationUnsupported` from [`request_translation`](Self::request_translation).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// List the caption tracks of a video, in provider order
    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>>;

    /// Download the timed segments of `track`
    async fn fetch_payload(
        &self,
        video_id: &VideoId,
        track: &CaptionTrack,
    ) -> TranscriptResult<Vec<CaptionSegment>>;

    /// Ask for a view of `track` translated into `target_language`
    async fn request_translation(
        &self,
        track: &CaptionTrack,
        target_language: &str,
    ) -> TranscriptResult<CaptionTrack>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}
