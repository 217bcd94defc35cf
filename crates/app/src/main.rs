use chrono::Utc;
use clap::{Parser, Subcommand};
use doc_concierge_core::{
    AgentOrchestrator, ChatMessage, DocumentWorkspace, GroqClient, LlmConfig, API_KEY_ENV,
};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "doc-concierge", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Chat model identifier sent to the completion API.
    #[arg(long, env = "GROQ_MODEL")]
    model: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat over the document tools (the default).
    Chat,
    /// Ingest a PDF file or a folder of PDFs and print the summary.
    Ingest {
        /// Path to a PDF file or a folder containing PDFs.
        #[arg(long)]
        path: String,
    },
    /// Run a single agent turn and print the answer.
    Ask {
        /// The question or command to pass to the agent.
        #[arg(long)]
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut llm_config = LlmConfig::from_env();
    if let Some(model) = cli.model {
        llm_config.model = model;
    }

    let workspace = Arc::new(Mutex::new(DocumentWorkspace::new()));
    let session_id = workspace
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .session_id();

    info!(
        version = app_version,
        session = %session_id,
        model = %llm_config.model,
        started_at = %Utc::now().to_rfc3339(),
        "doc-concierge boot"
    );

    if !llm_config.is_configured() {
        warn!("{API_KEY_ENV} environment variable is not set; the agent will answer every turn with a configuration error until it is provided");
    }

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let client = GroqClient::new(llm_config.clone())
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let orchestrator = AgentOrchestrator::new(client, workspace);
            run_chat(&orchestrator, llm_config.is_configured()).await?;
        }
        Command::Ingest { path } => {
            let outcome = workspace
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .ingest_path(Path::new(&path))
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;

            for skipped in &outcome.skipped {
                warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipped pdf");
            }

            for summary in &outcome.summaries {
                println!(
                    "{}: {} chunks from {} pages",
                    summary.source_path, summary.chunk_count, summary.page_count
                );
            }
            println!(
                "{} chunks ingested at {}",
                outcome.total_chunks(),
                Utc::now().to_rfc3339()
            );
        }
        Command::Ask { question } => {
            let client = GroqClient::new(llm_config)
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let orchestrator = AgentOrchestrator::new(client, workspace);
            let answer = orchestrator
                .run_turn(&[], &question)
                .await
                .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            println!("{answer}");
        }
    }

    Ok(())
}

/// Read-print loop: one line per turn, `exit`/`quit`/`q` to leave, empty
/// input reprompts. Turn failures are printed and the loop carries on;
/// only the exit commands end the session.
async fn run_chat<M>(
    orchestrator: &AgentOrchestrator<M>,
    configured: bool,
) -> anyhow::Result<()>
where
    M: doc_concierge_core::ChatModel + Send + Sync,
{
    println!("Document Concierge");
    println!("{}", "=".repeat(50));
    if configured {
        println!("Agent initialized successfully!");
    } else {
        println!("Warning: {API_KEY_ENV} environment variable is not set!");
        println!("Please set it before asking the agent anything.");
    }
    println!("\nExample commands:");
    println!("1. Ingest a document: 'Load the PDF file at /path/to/document.pdf'");
    println!("2. Query a document: 'What is the main topic discussed in the document?'");
    println!("\n{}", "=".repeat(50));

    // Blocking reads are fine here: the loop is the whole program and a
    // turn is only ever in flight while the user waits on it.
    let stdin = std::io::stdin();
    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Goodbye!");
            break;
        }

        match orchestrator.run_turn(&history, input).await {
            Ok(answer) => {
                println!("\nAgent: {answer}");
                history.push(ChatMessage::user(input));
                history.push(ChatMessage::assistant(&answer));
            }
            Err(error) => {
                println!("\nAgent: Error running agent loop: {error}");
            }
        }
    }

    Ok(())
}
