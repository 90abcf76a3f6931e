use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::OutputFormat;
use crate::output::{self, ComposedTranscript};
use crate::provider::CaptionProvider;
use crate::selector::{self, SelectionPolicy};
use crate::transcript::{CaptionTrack, FetchedTranscript};
use crate::translate;
use crate::video_id::{self, VideoId};
use crate::TranscriptResult;

pub mod batch;

/// What to extract and where to put it
#[derive(Debug, Clone)]
pub struct TranscriptRequest {
    /// Preferred languages, most preferred first
    pub languages: Vec<String>,

    /// Translate the selected track into this language
    pub translate_to: Option<String>,

    /// Directory the artifact is written to
    pub output_dir: PathBuf,

    /// Artifact format
    pub format: OutputFormat,
}

impl Default for TranscriptRequest {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            translate_to: None,
            output_dir: PathBuf::new(),
            format: OutputFormat::Text,
        }
    }
}

/// A transcript together with its composed artifact, not yet persisted
#[derive(Debug, Clone)]
pub struct PreparedTranscript {
    pub transcript: FetchedTranscript,
    pub composed: ComposedTranscript,
}

/// A transcript that was written to disk
#[derive(Debug, Clone)]
pub struct SavedTranscript {
    pub transcript: FetchedTranscript,
    pub path: PathBuf,
}

/// Main transcript pipeline: resolve, select, translate, render, compose
pub struct TranscriptPipeline {
    provider: Box<dyn CaptionProvider>,
    policy: SelectionPolicy,
    show_progress: bool,
}

impl TranscriptPipeline {
    /// Create a new transcript pipeline
    pub fn new(provider: Box<dyn CaptionProvider>, policy: SelectionPolicy) -> Self {
        Self {
            provider,
            policy,
            show_progress: false,
        }
    }

    /// Show spinners while waiting on the provider
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// List the caption tracks available for a URL or video ID
    pub async fn list_tracks(&self, input: &str) -> TranscriptResult<(VideoId, Vec<CaptionTrack>)> {
        let video_id = video_id::resolve(input)?;
        tracing::info!("Listing transcripts for video ID: {}", video_id);

        let progress = self.spinner(format!("Fetching transcript list for {}...", video_id));
        let tracks = self.provider.list_tracks(&video_id).await;
        progress.finish_and_clear();

        Ok((video_id, tracks?))
    }

    /// Resolve `input`, pick a track, optionally translate it, and download its segments
    pub async fn fetch_transcript(
        &self,
        input: &str,
        languages: &[String],
        translate_to: Option<&str>,
    ) -> TranscriptResult<FetchedTranscript> {
        let video_id = video_id::resolve(input)?;
        tracing::info!("Processing video ID: {}", video_id);

        let progress = self.spinner(format!("Fetching transcript in languages: {}", languages.join(", ")));
        let result = self.fetch_resolved(&video_id, languages, translate_to).await;
        progress.finish_and_clear();

        result
    }

    async fn fetch_resolved(
        &self,
        video_id: &VideoId,
        languages: &[String],
        translate_to: Option<&str>,
    ) -> TranscriptResult<FetchedTranscript> {
        let tracks = self.provider.list_tracks(video_id).await?;
        let selected = selector::select(video_id, &tracks, languages, self.policy)?;

        let track = match translate_to {
            Some(target) => translate::translate(&*self.provider, selected, target).await?,
            None => selected.clone(),
        };

        let segments = self.provider.fetch_payload(video_id, &track).await?;
        tracing::info!(
            "Fetched {} snippets in {} ({})",
            segments.len(),
            track.display_language,
            track.language_code
        );

        Ok(FetchedTranscript::from_track(video_id.clone(), &track, segments))
    }

    /// Fetch and compose a transcript without touching the filesystem
    pub async fn prepare(&self, input: &str, request: &TranscriptRequest) -> TranscriptResult<PreparedTranscript> {
        let transcript = self
            .fetch_transcript(input, &request.languages, request.translate_to.as_deref())
            .await?;

        let title = output::default_title(&transcript, request.translate_to.as_deref());
        let composed = output::compose_transcript(&transcript, &request.format, Some(&title))?;

        Ok(PreparedTranscript { transcript, composed })
    }

    /// Fetch, compose and persist a transcript; nothing is written unless every stage succeeded
    pub async fn extract(&self, input: &str, request: &TranscriptRequest) -> TranscriptResult<SavedTranscript> {
        let prepared = self.prepare(input, request).await?;
        let path = output::save_to_dir(&prepared.composed, &request.output_dir)?;
        tracing::info!("Transcript saved to: {}", path.display());

        Ok(SavedTranscript {
            transcript: prepared.transcript,
            path,
        })
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_message(message);
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockCaptionProvider;
    use crate::transcript::{CaptionSegment, TranslationLanguage};
    use crate::ErrorKind;

    fn track(code: &str, generated: bool) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            display_language: format!("{} name", code),
            is_generated: generated,
            is_translatable: true,
            translation_targets: vec![TranslationLanguage {
                language_code: "es".to_string(),
                language: "Spanish".to_string(),
            }],
            base_url: Some(format!("https://example.com/{}", code)),
        }
    }

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_fetch_transcript_selects_manual_track() {
        let mut provider = MockCaptionProvider::new();
        provider
            .expect_list_tracks()
            .times(1)
            .returning(|_| Ok(vec![track("en", true), track("en", false)]));
        provider
            .expect_fetch_payload()
            .withf(|_, track| !track.is_generated)
            .times(1)
            .returning(|_, _| Ok(vec![CaptionSegment::new(1.0, 1.0, "hello")]));

        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);
        let transcript = pipeline
            .fetch_transcript("https://youtu.be/dQw4w9WgXcQ", &langs(&["en"]), None)
            .await
            .unwrap();

        assert_eq!(transcript.video_id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(transcript.language_code, "en");
        assert!(!transcript.is_generated);
        assert_eq!(transcript.snippet_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_provider() {
        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().times(0);

        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);
        let err = pipeline.fetch_transcript("not a url", &langs(&["en"]), None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
    }

    #[tokio::test]
    async fn test_translation_fetches_translated_track() {
        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().returning(|_| Ok(vec![track("en", true)]));
        provider.expect_request_translation().times(1).returning(|source, target| {
            Ok(CaptionTrack {
                language_code: target.to_string(),
                display_language: "Spanish".to_string(),
                is_generated: source.is_generated,
                is_translatable: false,
                translation_targets: Vec::new(),
                base_url: Some("https://example.com/en&tlang=es".to_string()),
            })
        });
        provider
            .expect_fetch_payload()
            .withf(|_, track| track.language_code == "es")
            .returning(|_, _| Ok(vec![CaptionSegment::new(0.0, 1.0, "hola")]));

        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);
        let transcript = pipeline
            .fetch_transcript("dQw4w9WgXcQ", &langs(&["en"]), Some("es"))
            .await
            .unwrap();

        assert_eq!(transcript.language_code, "es");
        assert_eq!(transcript.display_language, "Spanish");
        assert!(transcript.is_generated);
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut provider = MockCaptionProvider::new();
        provider
            .expect_list_tracks()
            .returning(|id| Err(crate::TranscriptError::TranscriptsDisabled(id.to_string())));

        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);
        let err = pipeline.fetch_transcript("dQw4w9WgXcQ", &langs(&["en"]), None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TranscriptsDisabled);
    }

    #[tokio::test]
    async fn test_extract_writes_translated_filename() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().returning(|_| Ok(vec![track("en", false)]));
        provider
            .expect_request_translation()
            .returning(|_, target| Ok(CaptionTrack { language_code: target.to_string(), ..track("es", false) }));
        provider
            .expect_fetch_payload()
            .returning(|_, _| Ok(vec![CaptionSegment::new(3.0, 1.0, "hola")]));

        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);
        let request = TranscriptRequest {
            translate_to: Some("es".to_string()),
            output_dir: dir.path().to_path_buf(),
            ..TranscriptRequest::default()
        };

        let saved = pipeline.extract("dQw4w9WgXcQ", &request).await.unwrap();
        assert_eq!(
            saved.path,
            dir.path().join("transcript_dQw4w9WgXcQ_translated_to_es_dQw4w9WgXcQ.txt")
        );
        let content = std::fs::read_to_string(&saved.path).unwrap();
        assert!(content.contains("Language Code: es\n"));
        assert!(content.contains("[00:03] hola"));
    }

    #[tokio::test]
    async fn test_failed_extract_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().returning(|_| Ok(vec![track("en", false)]));
        provider
            .expect_fetch_payload()
            .returning(|id, _| Err(crate::TranscriptError::RequestBlocked(id.to_string())));

        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);
        let request = TranscriptRequest {
            output_dir: dir.path().to_path_buf(),
            ..TranscriptRequest::default()
        };

        let err = pipeline.extract("dQw4w9WgXcQ", &request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestBlocked);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
