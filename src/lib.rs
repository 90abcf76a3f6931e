//! yt-transcriber - A Rust CLI tool for extracting YouTube caption transcripts
//!
//! This library resolves YouTube URLs and video IDs, picks a caption track according to a
//! language preference, optionally asks YouTube for a translated view of it, and renders the
//! caption segments into a fixed-layout text artifact. Batches of videos are processed
//! sequentially with an independent outcome per video.

pub mod cli;
pub mod config;
pub mod interactive;
pub mod output;
pub mod provider;
pub mod selector;
pub mod transcribe;
pub mod transcript;
pub mod translate;
pub mod utils;
pub mod video_id;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use provider::{CaptionProvider, YoutubeProvider};
pub use selector::SelectionPolicy;
pub use transcribe::batch::BatchOutcome;
pub use transcribe::TranscriptPipeline;
pub use transcript::{CaptionSegment, CaptionTrack, FetchedTranscript, TranslationLanguage};
pub use video_id::VideoId;

/// Result type used by the application layer
pub type Result<T> = anyhow::Result<T>;

/// Result type returned by every transcript pipeline stage
pub type TranscriptResult<T> = std::result::Result<T, TranscriptError>;

/// Error types specific to transcript extraction
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Invalid YouTube URL or video ID: {0}")]
    InvalidIdentifier(String),

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Video is unavailable: {0}")]
    VideoUnavailable(String),

    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Transcript in '{source_language}' cannot be translated to '{target_language}'")]
    TranslationUnsupported {
        source_language: String,
        target_language: String,
    },

    #[error("Request blocked by YouTube for video {0} (rate limited or IP banned)")]
    RequestBlocked(String),

    #[error("Caption provider error: {0}")]
    Provider(String),

    #[error("Failed to write transcript: {0}")]
    Io(#[from] std::io::Error),

    #[error("Batch was cancelled before this video was processed")]
    Cancelled,
}

/// Discriminant of [`TranscriptError`], recorded per batch item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    InvalidIdentifier,
    TranscriptsDisabled,
    VideoUnavailable,
    NoTranscriptFound,
    TranslationUnsupported,
    RequestBlocked,
    Provider,
    Io,
    Cancelled,
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            TranscriptError::TranscriptsDisabled(_) => ErrorKind::TranscriptsDisabled,
            TranscriptError::VideoUnavailable(_) => ErrorKind::VideoUnavailable,
            TranscriptError::NoTranscriptFound { .. } => ErrorKind::NoTranscriptFound,
            TranscriptError::TranslationUnsupported { .. } => ErrorKind::TranslationUnsupported,
            TranscriptError::RequestBlocked(_) => ErrorKind::RequestBlocked,
            TranscriptError::Provider(_) => ErrorKind::Provider,
            TranscriptError::Io(_) => ErrorKind::Io,
            TranscriptError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Short hint shown next to the error, if the user can act on it
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            TranscriptError::RequestBlocked(_) => {
                Some("You might need to use a proxy or try again later")
            }
            TranscriptError::NoTranscriptFound { .. } => {
                Some("Run the `list` command to see which languages are available")
            }
            TranscriptError::TranslationUnsupported { .. } => {
                Some("Run the `list` command to see which tracks are translatable")
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidIdentifier => "invalid identifier",
            ErrorKind::TranscriptsDisabled => "transcripts disabled",
            ErrorKind::VideoUnavailable => "video unavailable",
            ErrorKind::NoTranscriptFound => "no transcript found",
            ErrorKind::TranslationUnsupported => "translation unsupported",
            ErrorKind::RequestBlocked => "request blocked",
            ErrorKind::Provider => "provider error",
            ErrorKind::Io => "i/o error",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
