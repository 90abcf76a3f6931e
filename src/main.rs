use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_transcriber::cli::{Cli, Commands, ExtractOptions, OutputOptions};
use yt_transcriber::config::Config;
use yt_transcriber::interactive::InteractiveSession;
use yt_transcriber::output;
use yt_transcriber::transcribe::{TranscriptPipeline, TranscriptRequest};
use yt_transcriber::utils::parse_batch_list;
use yt_transcriber::{CaptionProvider, TranscriptError, YoutubeProvider};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "yt_transcriber=debug"
    } else if cli.quiet {
        "warn"
    } else {
        "yt_transcriber=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let provider = YoutubeProvider::new(&config.provider).context("Failed to set up caption provider")?;
    tracing::debug!("Using caption provider: {}", provider.provider_name());
    let pipeline = TranscriptPipeline::new(Box::new(provider), config.app.selection_policy)
        .with_progress(!cli.quiet);

    match cli.command {
        None => match cli.input {
            Some(input) => {
                let options = ExtractOptions {
                    languages: cli.language.into_iter().collect(),
                    output: OutputOptions::default(),
                };
                extract(&pipeline, &config, &input, &options, None).await?;
            }
            None => {
                install_interrupt_exit();
                let defaults = request_for(&config, &ExtractOptions::default(), None);
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                let stop = Arc::new(AtomicBool::new(false));
                InteractiveSession::new(&pipeline, defaults, stop, stdin.lock(), stdout.lock())
                    .run()
                    .await?;
            }
        },
        Some(Commands::Extract { input, options, translate }) => {
            extract(&pipeline, &config, &input, &options, translate).await?;
        }
        Some(Commands::Translate { input, to, from, output }) => {
            let languages = if from.is_empty() { vec!["en".to_string()] } else { from };
            let options = ExtractOptions { languages, output };
            extract(&pipeline, &config, &input, &options, Some(to)).await?;
        }
        Some(Commands::List { input }) => {
            let (video_id, tracks) = pipeline.list_tracks(&input).await.map_err(report)?;
            print!("{}", output::describe_tracks(&video_id, &tracks));
        }
        Some(Commands::Batch { inputs, file, options, translate }) => {
            let mut inputs = inputs;
            if let Some(file) = &file {
                let content = fs_err::read_to_string(file).context("Failed to read batch file")?;
                inputs.extend(parse_batch_list(&content));
            }
            if inputs.is_empty() {
                anyhow::bail!("No videos given; pass URLs/IDs or --file");
            }

            let request = request_for(&config, &options, translate);
            let stop = install_interrupt_flag();
            let outcomes = pipeline.run_batch(&inputs, &request, &stop).await;

            for outcome in &outcomes {
                if let Some(path) = outcome.output_path() {
                    println!("{} {} -> {}", style("✅").green(), outcome.input, path.display());
                }
            }
            print!("{}", output::describe_batch(&outcomes));
        }
        Some(Commands::Config { show }) => {
            if show {
                config.display();
            } else {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => Config::config_path()?,
                };
                if !path.exists() {
                    config.save_to(&path)?;
                }
                println!("Configuration file: {}", path.display());
                println!("Edit it to change default languages, output directory and request pacing.");
            }
        }
    }

    Ok(())
}

/// Merge command line options over configured defaults
fn request_for(config: &Config, options: &ExtractOptions, translate_to: Option<String>) -> TranscriptRequest {
    TranscriptRequest {
        languages: if options.languages.is_empty() {
            config.app.languages.clone()
        } else {
            options.languages.clone()
        },
        translate_to,
        output_dir: options
            .output
            .output_dir
            .clone()
            .unwrap_or_else(|| config.output_dir()),
        format: options.output.format.unwrap_or(config.app.format),
    }
}

async fn extract(
    pipeline: &TranscriptPipeline,
    config: &Config,
    input: &str,
    options: &ExtractOptions,
    translate_to: Option<String>,
) -> Result<()> {
    let request = request_for(config, options, translate_to);

    if options.output.print {
        let prepared = pipeline.prepare(input, &request).await.map_err(report)?;
        output::print_to_console(&prepared.composed)?;
        return Ok(());
    }

    let saved = pipeline.extract(input, &request).await.map_err(report)?;
    print!("{}", output::describe_saved(&saved.transcript, &saved.path));
    Ok(())
}

/// Show the hint for a failed single-item command before it bubbles up as the exit error
fn report(error: TranscriptError) -> anyhow::Error {
    if let Some(hint) = error.hint() {
        eprintln!("{} {}", style("Tip:").yellow(), hint);
    }
    anyhow::Error::new(error)
}

/// First Ctrl-C stops a batch after the current video, a second one exits
fn install_interrupt_flag() -> Arc<AtomicBool> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping after the current video (press Ctrl-C again to abort)");
            flag.store(true, Ordering::SeqCst);
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
    stop
}

/// In the interactive menu Ctrl-C leaves immediately
fn install_interrupt_exit() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n\nInterrupted by user. Goodbye!");
            std::process::exit(0);
        }
    });
}
