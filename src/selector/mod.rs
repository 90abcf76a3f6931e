use serde::{Deserialize, Serialize};

use crate::transcript::CaptionTrack;
use crate::video_id::VideoId;
use crate::{TranscriptError, TranscriptResult};

/// How to choose between several tracks sharing a language code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Manually authored captions win over generated ones
    #[default]
    PreferManual,
    /// First track for the language in provider order
    ProviderOrder,
}

/// Pick the best track for the ordered `preferred_languages`.
///
/// Languages are tried in order; the first language with any matching track decides.
pub fn select<'a>(
    video_id: &VideoId,
    tracks: &'a [CaptionTrack],
    preferred_languages: &[String],
    policy: SelectionPolicy,
) -> TranscriptResult<&'a CaptionTrack> {
    for language in preferred_languages {
        let mut candidates = tracks.iter().filter(|track| track.language_code == *language);

        let chosen = match policy {
            SelectionPolicy::ProviderOrder => candidates.next(),
            SelectionPolicy::PreferManual => {
                let first = candidates.next();
                match first {
                    Some(track) if track.is_generated => {
                        candidates.find(|track| !track.is_generated).or(first)
                    }
                    other => other,
                }
            }
        };

        if let Some(track) = chosen {
            tracing::debug!(
                "Selected {} track '{}' for video {}",
                if track.is_generated { "generated" } else { "manual" },
                track.language_code,
                video_id
            );
            return Ok(track);
        }
    }

    Err(TranscriptError::NoTranscriptFound {
        video_id: video_id.to_string(),
        languages: preferred_languages.to_vec(),
    })
}
