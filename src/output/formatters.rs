use crate::transcript::{CaptionSegment, FetchedTranscript};
use crate::utils::sanitize_filename;
use crate::TranscriptResult;

const RULE_WIDTH: usize = 60;
const MAX_TITLE_CHARS: usize = 50;

/// Target filename and full content of a transcript artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedTranscript {
    pub filename: String,
    pub content: String,
}

/// Format a start offset as `[MM:SS]`, truncating fractional seconds.
///
/// Minutes are not wrapped into hours, so long videos render as `[125:03]`.
pub fn format_timestamp(start: f64) -> String {
    let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
    let minutes = (start / 60.0).floor() as u64;
    let seconds = (start % 60.0).floor() as u64;
    format!("[{:02}:{:02}]", minutes, seconds)
}

/// Render segments as `[MM:SS] text` lines, dropping segments with blank text
pub fn render(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .filter_map(|segment| {
            let text = segment.text.trim();
            (!text.is_empty()).then(|| format!("{} {}", format_timestamp(segment.start), text))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default title hint when the caller has none
pub fn default_title(transcript: &FetchedTranscript, translated_to: Option<&str>) -> String {
    match translated_to {
        Some(language) => format!("transcript_{}_translated_to_{}", transcript.video_id, language),
        None => format!("transcript_{}", transcript.video_id),
    }
}

/// `<sanitized title>_<video id>.<extension>`
pub fn output_filename(title: &str, video_id: &str, extension: &str) -> String {
    let mut safe_title = sanitize_filename(title);
    if safe_title.chars().count() > MAX_TITLE_CHARS {
        safe_title = safe_title
            .chars()
            .take(MAX_TITLE_CHARS)
            .collect::<String>()
            .trim()
            .to_string();
    }
    format!("{}_{}.{}", safe_title, video_id, extension)
}

/// Wrap rendered caption text in the fixed metadata header and footer
pub fn compose(
    transcript: &FetchedTranscript,
    rendered_text: &str,
    title_hint: Option<&str>,
) -> ComposedTranscript {
    let title = title_hint
        .map(str::to_string)
        .unwrap_or_else(|| default_title(transcript, None));
    let rule = "=".repeat(RULE_WIDTH);

    let mut content = String::with_capacity(rendered_text.len() + 512);
    content.push_str(&rule);
    content.push('\n');
    content.push_str("YOUTUBE VIDEO TRANSCRIPT\n");
    content.push_str(&rule);
    content.push('\n');
    content.push_str(&format!("Video ID: {}\n", transcript.video_id));
    content.push_str(&format!("Language: {}\n", transcript.display_language));
    content.push_str(&format!("Language Code: {}\n", transcript.language_code));
    content.push_str(&format!("Auto-generated: {}\n", title_case_bool(transcript.is_generated)));
    content.push_str(&format!("Total Snippets: {}\n", transcript.snippet_count()));
    content.push_str(&rule);
    content.push_str("\n\n");
    content.push_str(rendered_text);
    content.push_str("\n\n");
    content.push_str(&rule);
    content.push('\n');
    content.push_str("End of Transcript\n");
    content.push_str(&rule);
    content.push('\n');

    ComposedTranscript {
        filename: output_filename(&title, transcript.video_id.as_str(), "txt"),
        content,
    }
}

/// Serialize the whole transcript as pretty JSON, named like the text artifact
pub fn compose_json(transcript: &FetchedTranscript, title_hint: Option<&str>) -> TranscriptResult<ComposedTranscript> {
    let title = title_hint
        .map(str::to_string)
        .unwrap_or_else(|| default_title(transcript, None));

    let mut content = serde_json::to_string_pretty(transcript).map_err(std::io::Error::from)?;
    content.push('\n');

    Ok(ComposedTranscript {
        filename: output_filename(&title, transcript.video_id.as_str(), "json"),
        content,
    })
}

/// `True` / `False`, as written in artifacts and summaries
pub fn title_case_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
