use crate::provider::CaptionProvider;
use crate::transcript::CaptionTrack;
use crate::{TranscriptError, TranscriptResult};

/// Check that `track` can be rendered in `target_language` before asking the provider.
pub fn ensure_translatable(track: &CaptionTrack, target_language: &str) -> TranscriptResult<()> {
    if track.offers_translation(target_language) {
        Ok(())
    } else {
        Err(TranscriptError::TranslationUnsupported {
            source_language: track.language_code.clone(),
            target_language: target_language.to_string(),
        })
    }
}

/// Obtain a track bound to `target_language` for the selected source `track`.
///
/// The returned track always reports `target_language` as its language code; generated-ness
/// is whatever the provider says about the translated view.
pub async fn translate(
    provider: &dyn CaptionProvider,
    track: &CaptionTrack,
    target_language: &str,
) -> TranscriptResult<CaptionTrack> {
    ensure_translatable(track, target_language)?;

    tracing::info!("Translating '{}' transcript to '{}'", track.language_code, target_language);
    let mut translated = provider.request_translation(track, target_language).await?;

    if translated.language_code != target_language {
        tracing::warn!(
            "Provider returned language '{}' for a '{}' translation, relabelling",
            translated.language_code,
            target_language
        );
        translated.language_code = target_language.to_string();
    }

    Ok(translated)
}
