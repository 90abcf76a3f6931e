//! Interactive menu loop used when the binary is started without arguments.

use anyhow::Result;
use console::style;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::output;
use crate::transcribe::batch::success_count;
use crate::transcribe::{TranscriptPipeline, TranscriptRequest};
use crate::utils::parse_language_list;
use crate::TranscriptError;

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];

/// Menu driven session over any line reader and writer
pub struct InteractiveSession<'a, R, W> {
    pipeline: &'a TranscriptPipeline,
    defaults: TranscriptRequest,
    stop: Arc<AtomicBool>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> InteractiveSession<'a, R, W> {
    pub fn new(
        pipeline: &'a TranscriptPipeline,
        defaults: TranscriptRequest,
        stop: Arc<AtomicBool>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            pipeline,
            defaults,
            stop,
            input,
            output,
        }
    }

    /// Run the menu until the user quits or input ends
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "YouTube Transcript Extractor")?;
        writeln!(self.output, "{}", "=".repeat(40))?;

        loop {
            writeln!(self.output, "\nOptions:")?;
            writeln!(self.output, "1. Extract transcript from YouTube video")?;
            writeln!(self.output, "2. List available transcripts for a video")?;
            writeln!(self.output, "3. Extract and translate transcript")?;
            writeln!(self.output, "4. Batch process multiple videos")?;
            writeln!(self.output, "5. Exit")?;

            let Some(choice) = self.prompt("\nSelect an option (1-5): ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.extract_single().await?,
                "2" => self.list_tracks().await?,
                "3" => self.extract_translated().await?,
                "4" => self.batch().await?,
                "5" => break,
                other if QUIT_WORDS.contains(&other.to_lowercase().as_str()) => break,
                _ => self.failure("Invalid choice. Please select 1-5.")?,
            }

            if self.stop.load(Ordering::SeqCst) {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        Ok(())
    }

    /// Print `message` and read one trimmed line; `None` once input is exhausted
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_video(&mut self) -> Result<Option<String>> {
        match self.prompt("\nEnter YouTube URL or video ID: ")? {
            Some(video) if video.is_empty() => {
                self.failure("Please enter a valid URL or video ID")?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn prompt_languages(&mut self) -> Result<Vec<String>> {
        let default = self.defaults.languages.join(",");
        let answer = self
            .prompt(&format!("Enter preferred languages (comma-separated, default: {}): ", default))?
            .unwrap_or_default();
        Ok(parse_language_list(&answer, &self.defaults.languages))
    }

    fn prompt_output_dir(&mut self) -> Result<PathBuf> {
        let answer = self
            .prompt("Enter output directory (press Enter for default): ")?
            .unwrap_or_default();
        Ok(if answer.is_empty() {
            self.defaults.output_dir.clone()
        } else {
            PathBuf::from(answer)
        })
    }

    async fn extract_single(&mut self) -> Result<()> {
        let Some(video) = self.prompt_video()? else {
            return Ok(());
        };
        let languages = self.prompt_languages()?;
        self.run_extract(&video, languages, None).await
    }

    async fn extract_translated(&mut self) -> Result<()> {
        let Some(video) = self.prompt_video()? else {
            return Ok(());
        };
        let source = self
            .prompt("Enter source language (default: en): ")?
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| "en".to_string());
        let target = self
            .prompt("Enter target language for translation (e.g., es, fr, de): ")?
            .unwrap_or_default();

        if target.is_empty() {
            return self.failure("Please enter a target language");
        }

        self.run_extract(&video, vec![source], Some(target)).await
    }

    async fn run_extract(&mut self, video: &str, languages: Vec<String>, translate_to: Option<String>) -> Result<()> {
        let request = TranscriptRequest {
            languages,
            translate_to,
            output_dir: self.prompt_output_dir()?,
            format: self.defaults.format,
        };

        match self.pipeline.extract(video, &request).await {
            Ok(saved) => {
                self.success(&output::describe_saved(&saved.transcript, &saved.path))?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    async fn list_tracks(&mut self) -> Result<()> {
        let Some(video) = self.prompt_video()? else {
            return Ok(());
        };

        match self.pipeline.list_tracks(&video).await {
            Ok((video_id, tracks)) => {
                write!(self.output, "{}", output::describe_tracks(&video_id, &tracks))?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    async fn batch(&mut self) -> Result<()> {
        writeln!(self.output, "\nEnter video URLs/IDs (one per line, empty line to finish):")?;

        let mut videos = Vec::new();
        while let Some(line) = self.prompt("")? {
            if line.is_empty() {
                break;
            }
            videos.push(line);
        }

        if videos.is_empty() {
            return self.failure("No videos entered");
        }

        let request = TranscriptRequest {
            languages: self.prompt_languages()?,
            translate_to: None,
            output_dir: self.prompt_output_dir()?,
            format: self.defaults.format,
        };

        let outcomes = self.pipeline.run_batch(&videos, &request, &self.stop).await;
        let total = outcomes.len();
        for (index, outcome) in outcomes.iter().enumerate() {
            match &outcome.result {
                Ok(path) => writeln!(
                    self.output,
                    "{} [{}/{}] {} -> {}",
                    style("✅").green(),
                    index + 1,
                    total,
                    outcome.input,
                    path.display()
                )?,
                Err(e) => writeln!(
                    self.output,
                    "{} [{}/{}] {}: {}",
                    style("❌").red(),
                    index + 1,
                    total,
                    outcome.input,
                    e
                )?,
            }
        }

        let succeeded = success_count(&outcomes);
        self.success(&format!("Successfully processed {}/{} videos", succeeded, total))
    }

    fn success(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{} {}", style("✅").green(), message.trim_end())?;
        Ok(())
    }

    fn failure(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{} {}", style("❌").red(), message)?;
        Ok(())
    }

    fn report_error(&mut self, error: &TranscriptError) -> Result<()> {
        self.failure(&format!("Error: {}", error))?;
        if let Some(hint) = error.hint() {
            writeln!(self.output, "Tip: {}", hint)?;
        }
        Ok(())
    }
}
