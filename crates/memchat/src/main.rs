//! memchat: memory chat server
//!
//! Usage:
//!   memchat                  - Start the HTTP server
//!   memchat --execute <msg>  - Answer one message and exit
//!   memchat --help           - Show help

use std::io::Write;
use std::sync::Arc;

use futures::StreamExt;
use mc_api::AppState;
use mc_core::{ChatEvent, Config, MemoryStore};
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// HTTP server
    Server,
    /// One-shot answer printed to stdout
    Execute(String),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args(std::env::args().skip(1))?;

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("memchat {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // .env first so RUST_LOG from it applies
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting memchat...");
    tracing::info!("Model: {}", config.llm.model);

    let store = MemoryStore::new(&config.memory.db_path)
        .map_err(|e| anyhow::anyhow!("Failed to open memory store: {}", e))?;
    tracing::info!("Memory store at {}", config.memory.db_path);

    let state = AppState::from_config(&config, Arc::new(store))
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;

    match mode {
        RunMode::Execute(message) => run_execute(state, message).await,
        _ => mc_api::start_server(&config, state).await,
    }
}

/// Parse command line arguments
fn parse_args<I>(args: I) -> anyhow::Result<RunMode>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--execute" | "-e" => {
                let message = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a message", arg))?;
                return Ok(RunMode::Execute(message));
            }
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            _ => {}
        }
    }

    Ok(RunMode::Server)
}

fn print_help() {
    println!("memchat - chat assistant with long-term memory");
    println!();
    println!("Usage:");
    println!("  memchat                    Start the HTTP server");
    println!("  memchat --execute <msg>    Answer one message and exit");
    println!("  memchat --help             Show this help message");
    println!("  memchat --version          Show version");
    println!();
    println!("Configuration is read from memchat.toml if present, then the environment:");
    println!("  ANTHROPIC_API_KEY      API key (LLM_API_KEY also accepted)");
    println!("  LLM_MODEL              Model name (default: claude-3-5-sonnet-latest)");
    println!("  LLM_MAX_TOKENS         Max tokens per response (default: 1000)");
    println!("  LLM_BASE_URL           Custom API endpoint");
    println!("  API_HOST / API_PORT    Listen address (default: 0.0.0.0:8000)");
    println!("  API_ALLOWED_ORIGINS    Comma-separated CORS origins (default: any)");
    println!("  DB_PATH                SQLite file (default: data/memories.db)");
    println!("  CHAT_PROFILE           memory or clock (default: memory)");
    println!("  CHAT_CHUNK_SIZE        Characters per streamed chunk (default: 10)");
    println!("  CHAT_CHUNK_DELAY_MS    Pause between chunks");
    println!("  CHAT_MAX_TOOL_ROUNDS   Tool rounds per message (default: 5)");
}

/// Stream one answer to stdout
async fn run_execute(state: AppState, message: String) -> anyhow::Result<()> {
    let orchestrator = state
        .orchestrator
        .ok_or_else(|| anyhow::anyhow!("API key not configured"))?;

    let mut events = Box::pin(orchestrator.stream(message));
    let mut stdout = std::io::stdout();
    let mut failure = None;

    while let Some(event) = events.next().await {
        match event {
            ChatEvent::Start => {}
            ChatEvent::Text(chunk) => {
                write!(stdout, "{}", chunk)?;
                stdout.flush()?;
            }
            ChatEvent::Error(message) => failure = Some(message),
            ChatEvent::End => break,
        }
    }
    writeln!(stdout)?;

    if let Some(message) = failure {
        // already prefixed with "Error: "
        eprintln!("{}", message);
        std::process::exit(1);
    }
    Ok(())
}
