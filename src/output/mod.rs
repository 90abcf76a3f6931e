use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::transcribe::batch::{success_count, BatchOutcome};
use crate::transcript::{CaptionTrack, FetchedTranscript};
use crate::utils::format_duration;
use crate::video_id::VideoId;
use crate::TranscriptResult;

pub mod formatters;

pub use formatters::*;

/// Build the artifact for `transcript` in the requested format
pub fn compose_transcript(
    transcript: &FetchedTranscript,
    format: &OutputFormat,
    title_hint: Option<&str>,
) -> TranscriptResult<ComposedTranscript> {
    match format {
        OutputFormat::Text => {
            let rendered = render(&transcript.segments);
            Ok(compose(transcript, &rendered, title_hint))
        }
        OutputFormat::Json => compose_json(transcript, title_hint),
    }
}

/// Persist a composed transcript into `dir`, replacing any existing file of the same name.
///
/// Content goes to a `.part` sibling first and is renamed into place, so a failed write never
/// leaves a truncated transcript behind.
pub fn save_to_dir(composed: &ComposedTranscript, dir: &Path) -> TranscriptResult<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs_err::create_dir_all(dir)?;
    }

    let path = dir.join(&composed.filename);
    let partial = dir.join(format!("{}.part", composed.filename));

    if let Err(e) = fs_err::write(&partial, composed.content.as_bytes()) {
        let _ = fs_err::remove_file(&partial);
        return Err(e.into());
    }
    if let Err(e) = fs_err::rename(&partial, &path) {
        let _ = fs_err::remove_file(&partial);
        return Err(e.into());
    }

    tracing::debug!("Wrote {} bytes to {}", composed.content.len(), path.display());
    Ok(path)
}

/// Print a composed transcript to stdout instead of saving it
pub fn print_to_console(composed: &ComposedTranscript) -> TranscriptResult<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(composed.content.as_bytes())?;
    handle.flush()?;
    Ok(())
}

/// Human readable listing of the caption tracks of a video
pub fn describe_tracks(video_id: &VideoId, tracks: &[CaptionTrack]) -> String {
    let mut out = format!("Available transcripts for video: {}\n", video_id);
    out.push_str(&"-".repeat(50));
    out.push('\n');

    for track in tracks {
        out.push_str(&format!("Language: {} ({})\n", track.display_language, track.language_code));
        out.push_str(&format!("Auto-generated: {}\n", title_case_bool(track.is_generated)));
        out.push_str(&format!("Translatable: {}\n", title_case_bool(track.is_translatable)));
        if track.is_translatable {
            out.push_str(&format!(
                "Available translations: {} languages\n",
                track.translation_targets.len()
            ));
        }
        out.push_str(&"-".repeat(30));
        out.push('\n');
    }

    out
}

/// Summary printed after a transcript was saved
pub fn describe_saved(transcript: &FetchedTranscript, path: &Path) -> String {
    let mut out = format!("Transcript saved to: {}\n", path.display());
    out.push_str(&format!("Total snippets: {}\n", transcript.snippet_count()));
    if let Some(last) = transcript.segments.last() {
        out.push_str(&format!("Duration: {}\n", format_duration(last.start + last.duration)));
    }
    out.push_str(&format!(
        "Language: {} ({})\n",
        transcript.display_language, transcript.language_code
    ));
    out.push_str(&format!("Auto-generated: {}\n", title_case_bool(transcript.is_generated)));
    out
}

/// Per-failure lines followed by the success tally
pub fn describe_batch(outcomes: &[BatchOutcome]) -> String {
    let mut out = String::new();
    for outcome in outcomes {
        if let Some(error) = outcome.error() {
            out.push_str(&format!("Failed for {}: {}\n", outcome.input, error));
        }
    }
    out.push_str(&format!(
        "Successfully processed {}/{} videos\n",
        success_count(outcomes),
        outcomes.len()
    ));
    out
}
