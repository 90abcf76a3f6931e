use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use super::{TranscriptPipeline, TranscriptRequest};
use crate::{ErrorKind, TranscriptError, TranscriptResult};

/// Result of processing one batch input
#[derive(Debug)]
pub struct BatchOutcome {
    /// The input exactly as given
    pub input: String,

    /// Where the transcript was written, or why it was not
    pub result: TranscriptResult<PathBuf>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(PathBuf::as_path)
    }

    pub fn error(&self) -> Option<&TranscriptError> {
        self.result.as_ref().err()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error().map(TranscriptError::kind)
    }
}

/// Number of successful outcomes
pub fn success_count(outcomes: &[BatchOutcome]) -> usize {
    outcomes.iter().filter(|outcome| outcome.succeeded()).count()
}

impl TranscriptPipeline {
    /// Extract every input in order, one at a time.
    ///
    /// A failing input is recorded in its own outcome and never stops the batch. `stop` is
    /// checked between items; inputs not yet started when it is raised are reported as
    /// [`TranscriptError::Cancelled`]. The result always has one outcome per input, in input
    /// order.
    pub async fn run_batch(
        &self,
        inputs: &[String],
        request: &TranscriptRequest,
        stop: &AtomicBool,
    ) -> Vec<BatchOutcome> {
        let total = inputs.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, input) in inputs.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                tracing::warn!("Batch stopped, skipping {}/{}: {}", index + 1, total, input);
                outcomes.push(BatchOutcome {
                    input: input.clone(),
                    result: Err(TranscriptError::Cancelled),
                });
                continue;
            }

            tracing::info!("Processing video {}/{}: {}", index + 1, total, input);
            let result = self.extract(input, request).await.map(|saved| saved.path);

            if let Err(e) = &result {
                tracing::warn!("Failed for {}: {}", input, e);
            }

            outcomes.push(BatchOutcome {
                input: input.clone(),
                result,
            });
        }

        tracing::info!("Successfully processed {}/{} videos", success_count(&outcomes), total);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockCaptionProvider;
    use crate::selector::SelectionPolicy;
    use crate::transcript::{CaptionSegment, CaptionTrack};
    use std::sync::Arc;

    fn english() -> CaptionTrack {
        CaptionTrack {
            language_code: "en".to_string(),
            display_language: "English".to_string(),
            is_generated: false,
            is_translatable: false,
            translation_targets: Vec::new(),
            base_url: None,
        }
    }

    fn pipeline() -> TranscriptPipeline {
        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().returning(|_| Ok(vec![english()]));
        provider
            .expect_fetch_payload()
            .returning(|_, _| Ok(vec![CaptionSegment::new(0.0, 1.0, "hi")]));
        TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual)
    }

    #[tokio::test]
    async fn test_malformed_item_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        let request = TranscriptRequest {
            output_dir: dir.path().to_path_buf(),
            ..TranscriptRequest::default()
        };
        let inputs = vec![
            "dQw4w9WgXcQ".to_string(),
            "not a url".to_string(),
            "https://youtu.be/_NuH3D4SN-c".to_string(),
        ];

        let outcomes = pipeline().run_batch(&inputs, &request, &AtomicBool::new(false)).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].succeeded());
        assert_eq!(outcomes[1].error_kind(), Some(ErrorKind::InvalidIdentifier));
        assert!(outcomes[1].output_path().is_none());
        assert!(outcomes[2].succeeded());
        assert_eq!(outcomes[2].input, "https://youtu.be/_NuH3D4SN-c");
        assert_eq!(
            outcomes[2].output_path().unwrap(),
            dir.path().join("transcript__NuH3D4SN-c__NuH3D4SN-c.txt")
        );
        assert_eq!(success_count(&outcomes), 2);
    }

    #[tokio::test]
    async fn test_raised_stop_flag_cancels_remaining_items() {
        let dir = tempfile::tempdir().unwrap();
        let request = TranscriptRequest {
            output_dir: dir.path().to_path_buf(),
            ..TranscriptRequest::default()
        };
        let inputs = vec!["dQw4w9WgXcQ".to_string(), "_NuH3D4SN-c".to_string()];

        let outcomes = pipeline().run_batch(&inputs, &request, &AtomicBool::new(true)).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|outcome| outcome.error_kind() == Some(ErrorKind::Cancelled)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_stop_raised_during_first_item_cancels_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let stop = Arc::new(AtomicBool::new(false));
        let raise = Arc::clone(&stop);

        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().times(1).returning(|_| Ok(vec![english()]));
        provider.expect_fetch_payload().times(1).returning(move |_, _| {
            raise.store(true, Ordering::SeqCst);
            Ok(vec![CaptionSegment::new(0.0, 1.0, "hi")])
        });
        let pipeline = TranscriptPipeline::new(Box::new(provider), SelectionPolicy::PreferManual);

        let request = TranscriptRequest {
            output_dir: dir.path().to_path_buf(),
            ..TranscriptRequest::default()
        };
        let inputs = vec![
            "dQw4w9WgXcQ".to_string(),
            "_NuH3D4SN-c".to_string(),
            "not a url".to_string(),
        ];

        let outcomes = pipeline.run_batch(&inputs, &request, &stop).await;

        assert_eq!(outcomes.len(), inputs.len());
        assert!(outcomes[0].succeeded());
        assert_eq!(outcomes[1].error_kind(), Some(ErrorKind::Cancelled));
        assert_eq!(outcomes[2].error_kind(), Some(ErrorKind::Cancelled));
        assert_eq!(outcomes[2].input, "not a url");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let outcomes = pipeline()
            .run_batch(&[], &TranscriptRequest::default(), &AtomicBool::new(false))
            .await;
        assert!(outcomes.is_empty());
    }
}
