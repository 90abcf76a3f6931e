#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;

use yt_transcriber::{
    CaptionProvider, CaptionSegment, CaptionTrack, TranscriptError, TranscriptResult, TranslationLanguage,
    VideoId,
};

pub const ENGLISH_VIDEO: &str = "dQw4w9WgXcQ";
pub const GERMAN_VIDEO: &str = "_NuH3D4SN-c";
pub const DISABLED_VIDEO: &str = "aaaaaaaaaaa";

/// Deterministic in-memory provider
pub struct FixtureProvider {
    videos: HashMap<String, Vec<CaptionTrack>>,
}

pub fn track(code: &str, name: &str, generated: bool, translatable: bool) -> CaptionTrack {
    CaptionTrack {
        language_code: code.to_string(),
        display_language: name.to_string(),
        is_generated: generated,
        is_translatable: translatable,
        translation_targets: if translatable {
            vec![
                TranslationLanguage {
                    language_code: "es".to_string(),
                    language: "Spanish".to_string(),
                },
                TranslationLanguage {
                    language_code: "fr".to_string(),
                    language: "French".to_string(),
                },
            ]
        } else {
            Vec::new()
        },
        base_url: None,
    }
}

impl FixtureProvider {
    pub fn new() -> Self {
        let mut videos = HashMap::new();
        videos.insert(
            ENGLISH_VIDEO.to_string(),
            vec![
                track("en", "English (auto-generated)", true, true),
                track("en", "English", false, true),
                track("fr", "French", false, false),
            ],
        );
        videos.insert(GERMAN_VIDEO.to_string(), vec![track("de", "German", false, false)]);
        Self { videos }
    }
}

#[async_trait]
impl CaptionProvider for FixtureProvider {
    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>> {
        if video_id.as_str() == DISABLED_VIDEO {
            return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
        }
        self.videos
            .get(video_id.as_str())
            .cloned()
            .ok_or_else(|| TranscriptError::VideoUnavailable(video_id.to_string()))
    }

    async fn fetch_payload(
        &self,
        _video_id: &VideoId,
        track: &CaptionTrack,
    ) -> TranscriptResult<Vec<CaptionSegment>> {
        let tag = format!("{}/{}", track.language_code, if track.is_generated { "asr" } else { "manual" });
        Ok(vec![
            CaptionSegment::new(0.0, 1.5, format!("hello {}", tag)),
            CaptionSegment::new(65.4, 2.0, "   "),
            CaptionSegment::new(125.9, 3.0, "  goodbye\n"),
        ])
    }

    async fn request_translation(
        &self,
        track: &CaptionTrack,
        target_language: &str,
    ) -> TranscriptResult<CaptionTrack> {
        let target = track
            .translation_language(target_language)
            .filter(|_| track.is_translatable)
            .ok_or_else(|| TranscriptError::TranslationUnsupported {
                source_language: track.language_code.clone(),
                target_language: target_language.to_string(),
            })?;

        Ok(CaptionTrack {
            language_code: target.language_code.clone(),
            display_language: target.language.clone(),
            is_generated: track.is_generated,
            is_translatable: false,
            translation_targets: Vec::new(),
            base_url: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fixture"
    }
}
