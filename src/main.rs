use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use sotagents::client::{
    DatasetFilter, MethodFilter, Pagination, PaperFilter, SearchFilter, TaskFilter,
};
use sotagents::config::{Config, ConsoleFormat};
use sotagents::models::Page;
use sotagents::ui::{self, Tabular};
use sotagents::{Client, HttpTransport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// sotagents - Browse papers, tasks, datasets and benchmark results
#[derive(Parser, Debug)]
#[command(name = "sotagents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Browse papers, tasks, datasets and benchmark results on sotagents.com",
    long_about = None
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (defaults to the configured one)
    #[arg(long, short, value_enum, global = true)]
    output: Option<ConsoleFormat>,

    /// Static API token, used instead of the stored token pair
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    #[command(flatten)]
    Browse(BrowseCommand),
}

/// Commands that talk to the API.
#[derive(Subcommand, Debug)]
enum BrowseCommand {
    /// Search papers together with their implementations
    Search {
        /// Query over paper title and abstract
        query: String,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Papers
    Papers {
        #[command(subcommand)]
        command: PaperCommand,
    },

    /// Tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Datasets
    Datasets {
        #[command(subcommand)]
        command: DatasetCommand,
    },

    /// Methods
    Methods {
        #[command(subcommand)]
        command: MethodCommand,
    },

    /// Evaluation tables and their results
    Evaluations {
        #[command(subcommand)]
        command: EvaluationCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// List every option
    List,

    /// Set an option and save the file
    Set {
        /// Option as section.option (e.g. server.url)
        key: String,

        /// JSON value; bare words are taken as strings
        value: String,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    /// Page to fetch, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Items per page
    #[arg(long, default_value_t = 50)]
    items_per_page: u32,
}

impl From<PageArgs> for Pagination {
    fn from(args: PageArgs) -> Self {
        Pagination::new(args.page, args.items_per_page)
    }
}

#[derive(Subcommand, Debug)]
enum PaperCommand {
    /// List papers
    List {
        /// Query over title and abstract
        #[arg(long)]
        q: Option<String>,

        #[arg(long)]
        arxiv_id: Option<String>,

        /// Part of the title
        #[arg(long)]
        title: Option<String>,

        /// Part of the abstract
        #[arg(long = "abstract")]
        abstract_text: Option<String>,

        /// Ordering field, prefix with - for descending
        #[arg(long)]
        ordering: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one paper
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// List tasks
    List {
        #[arg(long)]
        q: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        ordering: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one task
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum DatasetCommand {
    /// List datasets
    List {
        #[arg(long)]
        q: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        ordering: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one dataset
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum MethodCommand {
    /// List methods
    List {
        #[arg(long)]
        q: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        ordering: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one method
    Get { id: String },
}

#[derive(Subcommand, Debug)]
enum EvaluationCommand {
    /// List evaluation tables
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one evaluation table
    Get { id: String },

    /// List the results of an evaluation table
    Results {
        id: String,

        #[command(flatten)]
        page: PageArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let env_filter = log_level(cli.verbose, cli.quiet, config.debug);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("sotagents={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.output.unwrap_or(config.format);

    match cli.command {
        Commands::Config { command } => run_config(command, &mut config, format),
        Commands::Browse(command) => run_browse(command, &mut config, cli.token, format).await,
    }
}

/// Run an API command. A token pair refreshed along the way is saved to the
/// configuration file, even when the command itself failed.
async fn run_browse(
    command: BrowseCommand,
    config: &mut Config,
    token: Option<String>,
    format: ConsoleFormat,
) -> Result<()> {
    let auth = config.authorization(token);
    let transport = Arc::new(HttpTransport::new(config.api_url(), auth.clone())?);
    let client = Client::new(transport.clone());
    tracing::debug!("Using API at {}", transport.base_url());

    let outcome = browse(command, &client, format).await;

    let current = transport.authorization().await;
    if current != auth {
        config.store_authorization(&current);
        match config.save() {
            Ok(()) => tracing::info!("Saved refreshed tokens"),
            Err(e) => tracing::warn!("Could not save refreshed tokens: {}", e),
        }
    }

    outcome
}

/// Default log level for the crate.
fn log_level(verbose: u8, quiet: bool, debug: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 if debug => "debug",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn run_config(command: ConfigCommand, config: &mut Config, format: ConsoleFormat) -> Result<()> {
    match command {
        ConfigCommand::List => {}
        ConfigCommand::Set { key, value } => {
            if key.split('.').count() != 2 {
                bail!(
                    "Option '{}' must be given as section.option, e.g. server.url",
                    key
                );
            }
            config.set(&key, &value)?;
            config.save().context("Failed to save the configuration")?;
        }
    }

    let sections = config.entries();
    match format {
        ConsoleFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ui::config_json(&sections))?)
        }
        ConsoleFormat::Text => println!("{}", ui::config_listing(&sections)),
    }
    Ok(())
}

async fn browse(command: BrowseCommand, client: &Client, format: ConsoleFormat) -> Result<()> {
    match command {
        BrowseCommand::Search { query, page } => {
            let filter = SearchFilter::new().q(query);
            print_page(&client.search(&filter, page.into()).await?, format)
        }

        BrowseCommand::Papers { command } => match command {
            PaperCommand::List {
                q,
                arxiv_id,
                title,
                abstract_text,
                ordering,
                page,
            } => {
                let filter = PaperFilter {
                    q,
                    arxiv_id,
                    title,
                    r#abstract: abstract_text,
                    ordering,
                };
                print_page(&client.paper_list(&filter, page.into()).await?, format)
            }
            PaperCommand::Get { id } => print_item(&client.paper_get(&id).await?, format),
        },

        BrowseCommand::Tasks { command } => match command {
            TaskCommand::List {
                q,
                name,
                ordering,
                page,
            } => {
                let filter = TaskFilter { q, name, ordering };
                print_page(&client.task_list(&filter, page.into()).await?, format)
            }
            TaskCommand::Get { id } => print_item(&client.task_get(&id).await?, format),
        },

        BrowseCommand::Datasets { command } => match command {
            DatasetCommand::List {
                q,
                name,
                full_name,
                ordering,
                page,
            } => {
                let filter = DatasetFilter {
                    q,
                    name,
                    full_name,
                    ordering,
                };
                print_page(&client.dataset_list(&filter, page.into()).await?, format)
            }
            DatasetCommand::Get { id } => print_item(&client.dataset_get(&id).await?, format),
        },

        BrowseCommand::Methods { command } => match command {
            MethodCommand::List {
                q,
                name,
                full_name,
                ordering,
                page,
            } => {
                let filter = MethodFilter {
                    q,
                    name,
                    full_name,
                    ordering,
                };
                print_page(&client.method_list(&filter, page.into()).await?, format)
            }
            MethodCommand::Get { id } => print_item(&client.method_get(&id).await?, format),
        },

        BrowseCommand::Evaluations { command } => match command {
            EvaluationCommand::List { page } => {
                print_page(&client.evaluation_list(page.into()).await?, format)
            }
            EvaluationCommand::Get { id } => {
                print_item(&client.evaluation_get(&id).await?, format)
            }
            EvaluationCommand::Results { id, page } => print_page(
                &client.evaluation_result_list(&id, page.into()).await?,
                format,
            ),
        },
    }
}

fn print_page<T: Tabular + Serialize>(page: &Page<T>, format: ConsoleFormat) -> Result<()> {
    match format {
        ConsoleFormat::Json => println!("{}", serde_json::to_string_pretty(page)?),
        ConsoleFormat::Text => {
            if page.is_empty() {
                println!("{}", "No results.".dimmed());
                return Ok(());
            }
            println!("{}", ui::table(&page.results));
            let mut footer = format!("{} of {} total", page.len(), page.count);
            if let Some(next) = page.next_page {
                footer.push_str(&format!(", next page: {}", next));
            }
            println!("{}", footer.dimmed());
        }
    }
    Ok(())
}

fn print_item<T: Tabular + Serialize>(item: &T, format: ConsoleFormat) -> Result<()> {
    match format {
        ConsoleFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        ConsoleFormat::Text => println!("{}", ui::table(std::slice::from_ref(item))),
    }
    Ok(())
}
