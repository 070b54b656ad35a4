use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use receipt_config::{load_prompt_template, prompt_config_path, Config};
use receipt_gateway::{start_server, AppState};
use receipt_logging::init_logger;
use receipt_ocr::TesseractOcr;
use receipt_structuring::GeminiStructurer;
use receipt_tts::{GoogleTranslateTts, SpeechRenderer};

#[derive(Parser)]
#[command(name = "receipt-scanner")]
#[command(about = "Receipt scanner backend — OCR, structuring, speech")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the receipt-scanner HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check whether a local instance is up
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logger(&config.log_dir, &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let url = format!("http://localhost:{}/", config.port);
            match reqwest::get(&url).await {
                Ok(resp) => println!("receipt-scanner: {} at {}", resp.status(), url),
                Err(_) => println!("receipt-scanner: not running on port {}", config.port),
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let api_key = config
        .gemini_api_key
        .clone()
        .context("GEMINI_API_KEY is not set")?;
    let prompt_template = load_prompt_template(&prompt_config_path()).await?;

    let ocr = Arc::new(TesseractOcr::new());
    let structurer = Arc::new(GeminiStructurer::new(
        api_key,
        config.gemini_model.clone(),
        prompt_template,
    ));
    let tts = Arc::new(GoogleTranslateTts::new(config.tts_language.clone()));
    let renderer = Arc::new(SpeechRenderer::new(tts, config.audio_dir.clone()));

    let state = AppState::new(ocr, structurer, renderer, config.image_dir.clone());

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("invalid bind address")?;
    info!(%addr, model = %config.gemini_model, "Starting receipt-scanner server");
    start_server(addr, state).await
}
