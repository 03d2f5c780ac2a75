use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::{Config, KeyValueStore, LastSearch, LAST_SEARCH_KEY};
use render::{html_to_text, render_page};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;
use tracker::{Controller, EventLoop, SearchForm, UiEvent};
use tracker_api::TrackerClient;

#[derive(Parser, Debug)]
#[command(name = "tracker", about = "Search and browse arXiv papers through the tracker service")]
struct Cli {
    /// -v for debug logs, -vv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Write the rendered page here instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    /// Print plain text instead of HTML
    #[arg(long, global = true)]
    text: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and render the result page
    Search {
        query: Option<String>,
        #[arg(long)]
        max_results: Option<u32>,
        #[arg(long)]
        ai_summary: bool,
        #[arg(long)]
        authority: bool,
        /// Open the detail view of this result after the search
        #[arg(long)]
        detail: Option<String>,
    },
    /// Fetch one paper and render its detail view
    Show { arxiv_id: String },
    CacheStats,
    CacheClear,
    /// Forget the saved search
    Clear,
    /// Print the saved search as JSON
    Last,
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn events_for(command: Command, form: &SearchForm) -> Vec<UiEvent> {
    match command {
        Command::Search {
            query,
            max_results,
            ai_summary,
            authority,
            detail,
        } => {
            let mut events = vec![UiEvent::Search(SearchForm {
                query: query.unwrap_or_default(),
                max_results: max_results.unwrap_or(form.max_results),
                ai_summary,
                enable_authority: authority,
            })];
            if let Some(arxiv_id) = detail {
                events.push(UiEvent::OpenDetail { arxiv_id });
            }
            events
        }
        Command::Show { arxiv_id } => vec![UiEvent::ShowPaper { arxiv_id }],
        Command::CacheStats => vec![UiEvent::ShowCacheStats],
        Command::CacheClear => vec![UiEvent::ClearCache],
        Command::Clear => vec![UiEvent::Clear],
        Command::Last => Vec::new(),
    }
}

fn print_last_search(store: &KeyValueStore) -> Result<()> {
    match store.get::<LastSearch>(LAST_SEARCH_KEY)? {
        Some(last) => println!("{}", serde_json::to_string_pretty(&last)?),
        None => println!("No saved search"),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Load environment variables
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = Config::from_env()?;
    let store = KeyValueStore::new(config.require_state_dir()?.clone());
    debug!("State directory: {}", store.root().display());

    if matches!(cli.command, Command::Last) {
        print_last_search(&store)?;
        return Ok(ExitCode::SUCCESS);
    }

    let client = TrackerClient::from_config(&config)?;
    info!("Using tracker service at {}", client.base_url());
    let api = Arc::new(client);
    let controller = Controller::new(api, store, &config);
    let events = events_for(cli.command, &controller.state().form);

    let (event_loop, tx) = EventLoop::new(controller);
    for event in events {
        tx.send(event).context("event loop closed early")?;
    }
    drop(tx);
    let controller = event_loop.run().await;

    let state = controller.state();
    let html = render_page(&state.page_model());
    let output = if cli.text { html_to_text(&html) } else { html };

    match &cli.out {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote page to {}", path.display());
        }
        None => println!("{}", output),
    }

    if state.error.is_some() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
