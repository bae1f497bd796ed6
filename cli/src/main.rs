//! `todo`: command-line front end for the todo list backend.
//!
//! Reads the backend base URL from `--base-url` or `TODO_BACKEND_BASE_URL`,
//! runs one operation and prints the JSON result. Failures print the
//! client's resolved message and exit non-zero.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use todo_client::{Behavior, ClientConfig, CreateTodo, TodoClient, Transport, UpdateTodo};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Manage todos on the todo list backend")]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8080 [default: $TODO_BACKEND_BASE_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Skip the base URL check, keep trailing slashes on the base URL and
    /// ignore error body fallbacks
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all todos
    List,
    /// Create a todo
    Create(CreateArgs),
    /// Update fields of a todo
    Update(UpdateArgs),
    /// Flip the completed flag of a todo
    ToggleCompleted { id: i64 },
    /// Flip the important flag of a todo
    ToggleImportant { id: i64 },
    /// Delete a todo
    Delete { id: i64 },
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    notes: Option<String>,
    /// Due date as YYYY-MM-DD
    #[arg(long)]
    due_date: Option<NaiveDate>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    important: bool,
}

impl From<CreateArgs> for CreateTodo {
    fn from(args: CreateArgs) -> Self {
        CreateTodo {
            title: args.title,
            notes: args.notes,
            due_date: args.due_date,
            category: args.category,
            important: args.important.then_some(true),
        }
    }
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: i64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Due date as YYYY-MM-DD
    #[arg(long)]
    due_date: Option<NaiveDate>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    important: Option<bool>,
    #[arg(long)]
    completed: Option<bool>,
}

impl From<UpdateArgs> for UpdateTodo {
    fn from(args: UpdateArgs) -> Self {
        UpdateTodo {
            title: args.title,
            notes: args.notes,
            due_date: args.due_date,
            category: args.category,
            important: args.important,
            completed: args.completed,
        }
    }
}

/// Run one command against `client`. Client failures stay `ClientError`
/// underneath so callers can still inspect `kind()`.
fn execute<T: Transport>(client: &TodoClient<T>, command: Command) -> Result<Option<Value>> {
    let result = match command {
        Command::List => client.get_todos(),
        Command::Create(args) => {
            let payload = serde_json::to_value(CreateTodo::from(args))
                .context("failed to encode create payload")?;
            client.create_todo(&payload)
        }
        Command::Update(args) => {
            let id = args.id;
            let payload = serde_json::to_value(UpdateTodo::from(args))
                .context("failed to encode update payload")?;
            client.update_todo(id, &payload)
        }
        Command::ToggleCompleted { id } => client.toggle_completed(id),
        Command::ToggleImportant { id } => client.toggle_important(id),
        Command::Delete { id } => client.delete_todo(id),
    };
    Ok(result?)
}

/// `--base-url` wins; otherwise the base URL comes from the environment.
fn load_config(base_url: Option<&str>, behavior: Behavior) -> ClientConfig {
    match base_url {
        Some(url) => ClientConfig::with_behavior(url, behavior),
        None => ClientConfig::from_env_with(behavior),
    }
}

/// The client's messages already embed their cause, so only the outermost
/// message is printed.
fn report(err: &anyhow::Error) -> String {
    format!("error: {err}")
}

fn run(cli: Cli) -> Result<()> {
    let behavior = if cli.lenient {
        Behavior::lenient()
    } else {
        Behavior::strict()
    };
    let config = load_config(cli.base_url.as_deref(), behavior);
    debug!(base_url = config.base_url(), ?behavior, "client configured");

    let client = TodoClient::new(config);
    let result = execute(&client, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", report(&err));
            ExitCode::FAILURE
        }
    }
}
