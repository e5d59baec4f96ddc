mod action;
mod app;
mod cache;
mod catalog;
mod config;
mod error;
mod event;
mod format;
mod history;
mod location;
mod pagination;
mod pokeapi;
mod query;
mod tui;
mod types;
mod ui;

use std::fs::{self, File};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::event::Event;
use crate::location::Location;
use crate::pokeapi::PokeApi;
use crate::tui::EventHandler;

/// Browse the Pokédex from the terminal
#[derive(Debug, Parser)]
#[command(name = "dex", version, about)]
struct Cli {
    /// Location to open, e.g. "/?page=3&perPage=24" or "/pokemon/25"
    location: Option<String>,

    /// Open the detail view of a Pokémon by name
    #[arg(long, conflicts_with = "location")]
    pokemon: Option<String>,

    /// Base URL of the API, overriding the config file
    #[arg(long)]
    api_url: Option<String>,

    /// Config file to use instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here instead of the cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The terminal belongs to the TUI, so logs go to a file
    if let Some(path) = cli.log_file.clone().or_else(default_log_path) {
        init_logging(&path)?;
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let base_url = cli.api_url.as_deref().unwrap_or(&config.api.base_url);
    let catalog: Arc<dyn Catalog> = Arc::new(PokeApi::new(
        base_url,
        &config.api.artwork_url,
        config.api.timeout(),
    )?);

    let location = start_location(&cli, &config, catalog.as_ref()).await?;
    tracing::info!("starting at {}", location);

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(catalog, location).await;

    tui::restore()?;

    result
}

fn default_log_path() -> Option<PathBuf> {
    Some(dirs::cache_dir()?.join("dex").join("dex.log"))
}

fn init_logging(path: &Path) -> error::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::options().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

/// Where the viewer opens: `--pokemon`, then the positional location, then
/// the configured start location, then the first list page.
async fn start_location(
    cli: &Cli,
    config: &Config,
    catalog: &dyn Catalog,
) -> Result<Location, Box<dyn std::error::Error>> {
    if let Some(name) = &cli.pokemon {
        let pokemon = catalog.fetch_by_name(name).await?;
        return Ok(Location::list().detail_link(pokemon.id));
    }

    let raw = cli
        .location
        .as_deref()
        .or(config.general.start_location.as_deref());

    match raw {
        Some(raw) => Ok(Location::parse(raw)?),
        None => Ok(Location::list()),
    }
}

async fn run(catalog: Arc<dyn Catalog>, location: Location) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(catalog, location, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    action_tx.send(Action::Quit)?;
                    continue;
                }

                match event {
                    Event::Render | Event::Resize => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
