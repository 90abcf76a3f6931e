use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "yt-transcriber",
    about = "yt-transcriber - Extract YouTube transcripts and save them as text files",
    version,
    args_conflicts_with_subcommands = true,
    long_about = "Extract caption transcripts from YouTube videos by URL or video ID, list the available caption tracks, translate transcripts into other languages and process whole batches of videos. Run without arguments for an interactive menu."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// YouTube URL or video ID to extract (shorthand for `extract`)
    #[arg(value_name = "URL_OR_ID")]
    pub input: Option<String>,

    /// Preferred language code for the shorthand form
    #[arg(value_name = "LANG", requires = "input")]
    pub language: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a configuration file
    #[arg(long, global = true, value_name = "FILE", env = "YT_TRANSCRIBER_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the transcript of a single video
    Extract {
        /// YouTube URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        input: String,

        #[command(flatten)]
        options: ExtractOptions,

        /// Translate the transcript to this language code
        #[arg(short, long, value_name = "LANG")]
        translate: Option<String>,
    },

    /// List the caption tracks available for a video
    List {
        /// YouTube URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        input: String,
    },

    /// Extract a transcript and translate it into another language
    Translate {
        /// YouTube URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        input: String,

        /// Target language code (e.g. es, fr, de)
        #[arg(long, value_name = "LANG")]
        to: String,

        /// Source language code(s), comma-separated
        #[arg(long, value_name = "LANGS", value_delimiter = ',')]
        from: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Extract transcripts for several videos, continuing past failures
    Batch {
        /// YouTube URLs or video IDs
        #[arg(value_name = "URL_OR_ID")]
        inputs: Vec<String>,

        /// Read additional inputs from a file (one per line, `#` starts a comment)
        #[arg(short = 'f', long, value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        options: ExtractOptions,

        /// Translate every transcript to this language code
        #[arg(short, long, value_name = "LANG")]
        translate: Option<String>,
    },

    /// Show or initialize the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Options shared by the extracting commands
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Preferred language codes in order, comma-separated (default from config)
    #[arg(short, long, value_name = "LANGS", value_delimiter = ',')]
    pub languages: Vec<String>,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOptions {
    /// Directory to write transcripts into (default from config, else current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Print the transcript to stdout instead of writing a file
    #[arg(short, long)]
    pub print: bool,
}

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text with a metadata header and `[MM:SS]` timestamps
    #[default]
    Text,
    /// JSON with every caption segment
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
