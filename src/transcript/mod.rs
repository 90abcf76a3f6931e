use serde::{Deserialize, Serialize};

use crate::video_id::VideoId;

/// One selectable caption source for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Language code, e.g. `en` or `pt-BR`
    pub language_code: String,

    /// Human readable language name, e.g. `English (auto-generated)`
    pub display_language: String,

    /// Machine produced (ASR) captions
    pub is_generated: bool,

    /// Whether the provider can render this track in other languages
    pub is_translatable: bool,

    /// Languages this track can be translated into
    pub translation_targets: Vec<TranslationLanguage>,

    /// Provider specific payload location
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub base_url: Option<String>,
}

/// A language a translatable track can be rendered in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    pub language_code: String,
    pub language: String,
}

impl CaptionTrack {
    /// Whether the provider offers a translation of this track into `language_code`
    pub fn offers_translation(&self, language_code: &str) -> bool {
        self.is_translatable
            && self
                .translation_targets
                .iter()
                .any(|target| target.language_code == language_code)
    }

    /// Display name for a translation target, if offered
    pub fn translation_language(&self, language_code: &str) -> Option<&TranslationLanguage> {
        self.translation_targets
            .iter()
            .find(|target| target.language_code == language_code)
    }
}

/// One timed unit of caption text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Caption text, possibly empty or multi-line
    pub text: String,
}

impl CaptionSegment {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start: start.max(0.0),
            duration: duration.max(0.0),
            text: text.into(),
        }
    }
}

/// A fully retrieved transcript, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedTranscript {
    pub video_id: VideoId,
    pub language_code: String,
    pub display_language: String,
    pub is_generated: bool,
    pub segments: Vec<CaptionSegment>,
}

impl FetchedTranscript {
    /// Bind downloaded `segments` to the track they came from
    pub fn from_track(video_id: VideoId, track: &CaptionTrack, segments: Vec<CaptionSegment>) -> Self {
        Self {
            video_id,
            language_code: track.language_code.clone(),
            display_language: track.display_language.clone(),
            is_generated: track.is_generated,
            segments,
        }
    }

    pub fn snippet_count(&self) -> usize {
        self.segments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> CaptionTrack {
        CaptionTrack {
            language_code: "en".to_string(),
            display_language: "English".to_string(),
            is_generated: false,
            is_translatable: true,
            translation_targets: vec![TranslationLanguage {
                language_code: "es".to_string(),
                language: "Spanish".to_string(),
            }],
            base_url: None,
        }
    }

    #[test]
    fn test_offers_translation() {
        let mut track = track();
        assert!(track.offers_translation("es"));
        assert!(!track.offers_translation("fr"));
        assert_eq!(track.translation_language("es").unwrap().language, "Spanish");

        track.is_translatable = false;
        assert!(!track.offers_translation("es"));
    }

    #[test]
    fn test_segment_clamps_negative_offsets() {
        let segment = CaptionSegment::new(-1.0, -0.5, "hi");
        assert_eq!(segment.start, 0.0);
        assert_eq!(segment.duration, 0.0);
    }

    #[test]
    fn test_from_track() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let transcript = FetchedTranscript::from_track(id, &track(), vec![CaptionSegment::new(0.0, 1.0, "a")]);
        assert_eq!(transcript.language_code, "en");
        assert_eq!(transcript.display_language, "English");
        assert!(!transcript.is_generated);
        assert_eq!(transcript.snippet_count(), 1);
    }
}
