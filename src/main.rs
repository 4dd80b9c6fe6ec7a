use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qask::endpoint::NewDocument;
use qask::{AnswerResult, MemorySurface, QaClient, QaClientBuilder, QaError, QueryController};

/// qask - ask questions of a retrieval-augmented QA service
#[derive(Parser)]
#[command(name = "qask")]
#[command(about = "Ask questions of a retrieval-augmented question-answering service")]
#[command(version)]
struct Cli {
    /// Base URL of the service (defaults to $QA_ENDPOINT, then http://localhost:8001)
    #[arg(long, global = true, value_name = "URL")]
    endpoint: Option<String>,

    /// Request timeout in seconds (defaults to $QA_TIMEOUT_SECS, otherwise none)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the answer with its sources
    Ask(AskCommand),
    /// Launch interactive terminal UI
    Tui,
    /// Check that the service is reachable and has documents indexed
    Doctor,
    /// Add a document to the service's index
    Add(AddCommand),
}

/// Ask one question
#[derive(Parser)]
struct AskCommand {
    /// The question, sent verbatim
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Print the outcome as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

/// Add a document
#[derive(Parser)]
struct AddCommand {
    /// Document identifier
    #[arg(value_name = "ID")]
    id: String,

    /// Document text
    #[arg(value_name = "TEXT")]
    text: String,

    /// Metadata as a JSON object
    #[arg(short, long, value_name = "JSON")]
    meta: Option<String>,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.command);

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(&cli, cmd),
        Commands::Tui => handle_tui(&cli),
        Commands::Doctor => handle_doctor(&cli),
        Commands::Add(cmd) => handle_add(&cli, cmd),
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            // Determine exit code based on error type
            let exit_code = if is_user_error(&e) { 1 } else { 2 };
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code);
        }
    }
}

/// Installs the log subscriber: a file for the TUI, stderr otherwise.
fn init_logging(command: &Commands) {
    let installed = match command {
        Commands::Tui => qask::utils::get_log_path()
            .and_then(|path| qask::telemetry::init_file(&path, "info")),
        _ => qask::telemetry::init_stderr("warn"),
    };

    if let Err(e) = installed {
        eprintln!("Warning: logging disabled: {e:#}");
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad arguments: an unparsable endpoint URL or malformed metadata.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(cause.downcast_ref::<QaError>(), Some(QaError::InvalidUrl(_)))
            || cause.to_string().starts_with("Metadata must be")
    })
}

/// Builds the client from CLI flags, falling back to environment configuration.
fn build_client(cli: &Cli) -> Result<QaClient> {
    let mut builder = QaClientBuilder::new();
    if let Some(endpoint) = &cli.endpoint {
        builder = builder.base_url(endpoint);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to configure client")
}

/// Handles the ask command: one request cycle against an in-memory surface.
///
/// Exits 0 when an answer was received and 2 for any failure outcome.
fn handle_ask(cli: &Cli, cmd: &AskCommand) -> Result<i32> {
    let client = build_client(cli)?;
    let mut controller = QueryController::new(
        Arc::new(client),
        MemorySurface::with_query(cmd.question.as_str()),
    );

    let result = controller
        .submit_query()
        .ok_or_else(|| anyhow::anyhow!("A query is already in progress"))?;

    if cmd.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize outcome")?;
        println!("{json}");
    } else {
        print!("{}", format_plain(controller.surface()));
    }

    Ok(exit_code_for(&result))
}

fn exit_code_for(result: &AnswerResult) -> i32 {
    if result.is_success() { 0 } else { 2 }
}

/// Formats the answer followed by one line per source block.
fn format_plain(surface: &MemorySurface) -> String {
    let mut output = format!("{}\n", surface.answer());
    if !surface.sources().is_empty() {
        output.push_str("\nSources:\n");
        for block in surface.sources() {
            output.push_str(&format!("{block}\n"));
        }
    }
    output
}

/// Handles the tui command.
fn handle_tui(cli: &Cli) -> Result<i32> {
    let client = build_client(cli)?;
    qask::tui::run(Arc::new(client))?;
    Ok(0)
}

/// Handles the doctor command. Exits 2 when the endpoint is unusable.
fn handle_doctor(cli: &Cli) -> Result<i32> {
    let client = build_client(cli)?;
    let health = qask::doctor::run_health_checks(&client);
    Ok(if health.status.is_error() { 2 } else { 0 })
}

/// Handles the add command by posting one document to the service.
fn handle_add(cli: &Cli, cmd: &AddCommand) -> Result<i32> {
    let meta = match &cmd.meta {
        Some(raw) => qask::utils::parse_meta(raw)?,
        None => serde_json::Map::new(),
    };

    let client = build_client(cli)?;
    let document = NewDocument {
        id: cmd.id.clone(),
        text: cmd.text.clone(),
        meta,
    };

    let receipt = client
        .add_document(&document)
        .context("Failed to add document")?;
    if !receipt.ok {
        anyhow::bail!("Service rejected document '{}'", cmd.id);
    }

    println!(
        "Document added (id: {}); index holds {} documents",
        cmd.id, receipt.count
    );
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use qask::{AnswerSurface, SourceBlock};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_parses_question_and_global_flags() {
        let cli = Cli::try_parse_from([
            "qask",
            "ask",
            "what is rust?",
            "--endpoint",
            "http://qa:9000",
            "--timeout",
            "5",
            "--json",
        ])
        .expect("ask should parse");

        assert_eq!(cli.endpoint.as_deref(), Some("http://qa:9000"));
        assert_eq!(cli.timeout, Some(5));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "what is rust?");
                assert!(cmd.json);
            }
            _ => panic!("expected ask command"),
        }
    }

    #[test]
    fn ask_accepts_empty_question() {
        let cli = Cli::try_parse_from(["qask", "ask", ""]).expect("empty question is legal");
        assert!(matches!(cli.command, Commands::Ask(ref cmd) if cmd.question.is_empty()));
    }

    #[test]
    fn tui_command_takes_no_arguments() {
        assert!(Cli::try_parse_from(["qask", "tui"]).is_ok());
        assert!(Cli::try_parse_from(["qask", "tui", "extra-arg"]).is_err());
    }

    #[test]
    fn add_parses_meta() {
        let cli = Cli::try_parse_from(["qask", "add", "d1", "some text", "--meta", r#"{"a":1}"#])
            .expect("add should parse");
        match cli.command {
            Commands::Add(cmd) => {
                assert_eq!(cmd.id, "d1");
                assert_eq!(cmd.text, "some text");
                assert_eq!(cmd.meta.as_deref(), Some(r#"{"a":1}"#));
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn format_plain_lists_sources_after_answer() {
        let mut surface = MemorySurface::new();
        surface.set_answer("Paris");
        surface.append_source(SourceBlock {
            index: 0,
            text: "France's capital".to_string(),
        });

        assert_eq!(
            format_plain(&surface),
            "Paris\n\nSources:\n[0] France's capital\n"
        );
    }

    #[test]
    fn format_plain_without_sources_prints_answer_only() {
        let mut surface = MemorySurface::new();
        surface.set_answer("not json");
        assert_eq!(format_plain(&surface), "not json\n");
    }

    #[test]
    fn exit_code_reflects_outcome() {
        let ok = AnswerResult::from_body(r#"{"answer":"x"}"#.to_string());
        assert_eq!(exit_code_for(&ok), 0);

        let malformed = AnswerResult::from_body("oops".to_string());
        assert_eq!(exit_code_for(&malformed), 2);
    }

    #[test]
    fn invalid_endpoint_is_a_user_error() {
        let cli = Cli::try_parse_from(["qask", "--endpoint", "nope", "doctor"]).unwrap();
        let err = build_client(&cli).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn malformed_meta_is_a_user_error() {
        let err = qask::utils::parse_meta("[]").unwrap_err();
        assert!(is_user_error(&err));
    }
}
