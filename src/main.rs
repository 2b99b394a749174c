//! legal-chat - terminal client for the Legal Chatbot backend
//!
//! Keeps the conversation in memory, sends every turn with its full history,
//! and can hand a local document to the backend for extraction and analysis.

mod api;
mod cli;
mod config;
mod content;
mod conversation;
mod render;
mod runtime;
mod state_machine;

use api::{HttpBackend, LoggingBackend};
use config::{ChatConfig, LogFormat};
use conversation::Conversation;
use state_machine::ChatContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env()?;
    init_logging(config.log_format);

    let backend = HttpBackend::new(&config.api_url, config.request_timeout)?;

    // The backend may come up later; every turn fails on its own until then
    match backend.health().await {
        Ok(health) => tracing::info!(url = %backend.base_url(), status = %health.status, "Backend reachable"),
        Err(e) => tracing::warn!(url = %backend.base_url(), error = %e, "Backend health check failed"),
    }

    let context = ChatContext::new(uuid::Uuid::new_v4().to_string());
    tracing::info!(conversation_id = %context.conversation_id, "Starting conversation");

    let conversation = Conversation::seed();
    for turn in conversation.history() {
        println!("{}", render::render_turn(turn));
    }
    println!("Type /help for commands.");

    let (handle, runtime) = runtime::start(
        context,
        conversation.clone(),
        LoggingBackend::new(backend.clone()),
        LoggingBackend::new(backend),
    );
    let renderer = cli::spawn_renderer(handle.subscribe(), conversation.len());

    cli::run(handle).await?;

    // Let an in-flight turn finish and print before exiting
    runtime.await?;
    renderer.await?;

    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("legal_chat=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
