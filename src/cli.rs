//! Stdin REPL driving a conversation runtime

use crate::render::{render_turn, status_line};
use crate::runtime::{ChatEvent, ChatHandle};
use crate::state_machine::Document;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Extensions the backend can extract text from
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "pdf", "docx"];

const HELP: &str = "\
Commands:
  /file <path>    select a document (.txt, .pdf, .docx)
  /send           upload the selected document
  /upload <path>  select and upload in one step
  /help           show this help
  /quit           exit
Anything else is sent to the assistant.";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type: {0} (expected .txt, .pdf or .docx)")]
    Unsupported(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Read a document from disk for upload
pub async fn load_document(path: &Path) -> Result<Document, DocumentError> {
    let display = path.display().to_string();
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });
    if !supported {
        return Err(DocumentError::Unsupported(display));
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| DocumentError::Io {
        path: display.clone(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or(display, |n| n.to_string_lossy().into_owned());
    let media_type = mime_guess::from_path(path).first_or_octet_stream();

    tracing::debug!(file = %file_name, media_type = %media_type, bytes = bytes.len(), "Loaded document");
    Ok(Document::new(file_name, media_type.essence_str(), bytes))
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Text(String),
    File(PathBuf),
    Send,
    Upload(PathBuf),
    Help,
    Quit,
    /// A command missing its argument, or one we do not know
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        // Sent as typed; blank lines are ignored by the orchestrator
        return Command::Text(line.to_string());
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    match (name, arg.is_empty()) {
        ("/file", false) => Command::File(PathBuf::from(arg)),
        ("/upload", false) => Command::Upload(PathBuf::from(arg)),
        ("/file" | "/upload", true) => Command::Invalid(format!("Usage: {name} <path>")),
        ("/send", _) => Command::Send,
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        _ => Command::Invalid(format!("Unknown command: {name} (try /help)")),
    }
}

/// Read commands from stdin until `/quit` or EOF.
///
/// Consumes the handle so the runtime can shut down once this returns.
pub async fn run(handle: ChatHandle) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let sent = match parse_command(&line) {
            Command::Text(text) => handle.submit_text(text).await,
            Command::File(path) => match load_document(&path).await {
                Ok(document) => handle.select_file(document).await,
                Err(e) => {
                    eprintln!("{e}");
                    Ok(())
                }
            },
            Command::Send => handle.submit_file().await,
            Command::Upload(path) => match load_document(&path).await {
                Ok(document) => match handle.select_file(document).await {
                    Ok(()) => handle.submit_file().await,
                    Err(e) => Err(e),
                },
                Err(e) => {
                    eprintln!("{e}");
                    Ok(())
                }
            },
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Quit => break,
            Command::Invalid(message) => {
                eprintln!("{message}");
                Ok(())
            }
        };

        if let Err(e) = sent {
            tracing::warn!(error = %e, "Stopping input loop");
            break;
        }
    }

    Ok(())
}

/// Where a line of output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout(String),
    Stderr(String),
}

/// Turns runtime events into terminal output, printing each turn once
pub struct Renderer {
    shown: usize,
}

impl Renderer {
    /// `shown` turns are already on screen
    pub fn new(shown: usize) -> Self {
        Self { shown }
    }

    pub fn handle(&mut self, event: &ChatEvent) -> Vec<Output> {
        match event {
            ChatEvent::Transcript { conversation } => {
                let turns = conversation.history();
                let fresh = turns.get(self.shown..).unwrap_or_default();
                self.shown = turns.len();
                fresh
                    .iter()
                    .map(|turn| Output::Stdout(render_turn(turn)))
                    .collect()
            }
            ChatEvent::StateChange { state } => status_line(*state)
                .map(|line| Output::Stdout(line.to_string()))
                .into_iter()
                .collect(),
            ChatEvent::SelectionChanged {
                file_name: Some(name),
            } => vec![Output::Stdout(format!(
                "Selected {name}. Type /send to upload it."
            ))],
            ChatEvent::Alert { message } | ChatEvent::Rejected { reason: message } => {
                vec![Output::Stderr(message.clone())]
            }
            ChatEvent::SelectionChanged { file_name: None }
            | ChatEvent::InputCleared
            | ChatEvent::TurnDone => vec![],
        }
    }
}

/// Print runtime events until the runtime goes away
pub fn spawn_renderer(
    mut events: broadcast::Receiver<ChatEvent>,
    shown: usize,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut renderer = Renderer::new(shown);
        loop {
            match events.recv().await {
                Ok(event) => {
                    for output in renderer.handle(&event) {
                        match output {
                            Output::Stdout(line) => println!("{line}"),
                            Output::Stderr(line) => eprintln!("{line}"),
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
