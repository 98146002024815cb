// src/main.rs
mod config;
mod edgar;
mod extractors;
mod pipeline;
mod server;
mod storage;
mod summarize;
mod utils;

use clap::{Parser, Subcommand};
use config::Config;
use edgar::EdgarClient;
use pipeline::{AnalysisPipeline, FilingReader};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storage::{AudioStore, StorageManager};
use summarize::dispatcher::select_section;
use summarize::{GeminiClient, PromptRegistry, SummaryDispatcher};
use utils::error::PipelineError;
use utils::AppError;

/// Investment summaries of the narrative sections of a company's latest 10-K
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// Directory for generated speech files
        #[arg(long, default_value = "./audio_files")]
        audio_dir: PathBuf,

        /// Also narrate each summary into a WAV file
        #[arg(long)]
        tts: bool,

        /// Longest section text (in characters) sent to the model
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_section_chars: Option<u64>,
    },

    /// Extract the narrative sections of a company's latest filing to disk
    Extract {
        /// Ticker symbol of the company
        #[arg(short, long)]
        ticker: String,

        /// Form type to look for
        #[arg(long, default_value = pipeline::TARGET_FORM)]
        form: String,

        /// Output directory for extracted content
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,

        /// Print this section (or "combined")
        #[arg(short, long)]
        section: Option<String>,

        /// Summarize the chosen section instead of printing it
        #[arg(long, requires = "section")]
        summarize: bool,
    },
}

fn build_dispatcher(config: &Config, max_section_chars: Option<usize>) -> Result<SummaryDispatcher, AppError> {
    let oracle = Arc::new(
        GeminiClient::new(config.api_key()?, &config.gemini_base_url)?
            .with_timeout(Duration::from_secs(config.oracle_timeout_secs)),
    );
    Ok(SummaryDispatcher::new(
        oracle,
        PromptRegistry::default(),
        max_section_chars.unwrap_or(config.max_section_chars),
    ))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments and environment
    let args = Args::parse();
    tracing::info!("Starting with args: {:?}", args);
    let config = Config::from_env()?;

    // 3. Shared EDGAR client
    let edgar = Arc::new(EdgarClient::new(config.sec_user_agent.clone())?);

    match args.command {
        Command::Serve {
            bind,
            audio_dir,
            tts,
            max_section_chars,
        } => {
            // The API key is required up front: no key, no server.
            let dispatcher = build_dispatcher(&config, max_section_chars.map(|n| n as usize))?;
            let mut pipeline = AnalysisPipeline::new(FilingReader::new(edgar), dispatcher);
            if tts {
                let store = AudioStore::new(&audio_dir)?;
                tracing::info!("Speech output enabled, writing to {}", store.dir().display());
                pipeline = pipeline.with_audio(store);
            }

            server::serve(
                bind,
                server::AppState {
                    pipeline: Arc::new(pipeline),
                },
            )
            .await
        }

        Command::Extract {
            ticker,
            form,
            output_dir,
            section,
            summarize,
        } => {
            let reader = FilingReader::new(edgar);
            let (filing, sections) = reader.read_sections(&ticker, &form).await?;
            tracing::info!(
                "Extracted {} sections from {} ({})",
                sections.len(),
                filing.accession_number,
                filing.company_name
            );

            let storage = StorageManager::new(&output_dir)?;
            for extracted in sections.iter() {
                match storage.save_section(&ticker, &filing, extracted) {
                    Ok(path) => tracing::info!("Saved section content to: {}", path.display()),
                    Err(e) => tracing::error!("Failed to save section content: {}", e),
                }
                match storage.save_section_metadata(&ticker, &filing, extracted) {
                    Ok(path) => tracing::info!("Saved section metadata to: {}", path.display()),
                    Err(e) => tracing::error!("Failed to save section metadata: {}", e),
                }
            }

            let Some(name) = section else {
                return Ok(());
            };
            let text = select_section(&sections, &name)
                .ok_or_else(|| PipelineError::SectionNotFound(name.clone()))?;

            if summarize {
                let dispatcher = build_dispatcher(&config, None)?;
                let summary = dispatcher.summarize(&name, &text).await?;
                println!("{}", summary);
            } else {
                println!("{}", text);
            }
            Ok(())
        }
    }
}
