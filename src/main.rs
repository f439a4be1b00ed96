mod app;
mod browser;
mod config;
mod feeds;
mod format;
mod logging;
mod models;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use tokio::time::{Duration, interval};

use app::{App, DataEvent, Settings, handle_action, handle_data_event, trigger_action};
use config::Config;
use feeds::{Orchestrator, ResultSource};
use models::{ReferenceKey, ResultsTree};

/// Browse test262 conformance results published for a JavaScript engine.
#[derive(Parser, Debug)]
#[command(name = "t262view")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Branch to show instead of the configured one
    branch: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (mut config, config_problem) = Config::load(&args.config);
    if let Some(branch) = args.branch {
        config.source.branch = branch;
    }
    logging::init(&config.logging)?;
    if let Some(err) = &config_problem {
        tracing::warn!(path = %args.config.display(), error = %err, "using default configuration");
    }
    let source = feeds::connect(&config.source).context("failed to set up HTTP client")?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let startup_warning = config_problem.map(|err| format!("{}, using defaults", err));
    let result = run(&mut terminal, &config, source, startup_warning).await;

    // Teardown terminal
    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
    source: Arc<dyn ResultSource>,
    startup_warning: Option<String>,
) -> Result<()> {
    let (mut app, mut event_rx) = App::new(Settings::from_config(config));
    if let Some(warning) = startup_warning {
        app.notifier.error(warning);
    }
    let mut tick = interval(Duration::from_millis(100));
    let mut event_stream = EventStream::new();

    Orchestrator::new(
        source,
        ReferenceKey::branch(&config.source.branch),
        app.event_tx.clone(),
    )
    .start();

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    None => break,
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = trigger_action(key, app.filter_active) {
                            handle_action(&mut app, action);
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }

            Some(data_event) = event_rx.recv() => {
                handle_data_event(&mut app, data_event);
            }

            _ = tick.tick() => {
                if app.loading() {
                    app.spinner_tick = app.spinner_tick.wrapping_add(1);
                }
                app.notifier.prune_expired();
            }
        }

        for render in app.pending_renders.drain(..) {
            let tx = app.event_tx.clone();
            let options = app.settings.tree_options();
            tokio::spawn(async move {
                let key = render.key;
                let built =
                    tokio::task::spawn_blocking(move || ResultsTree::new(render.snapshot, options))
                        .await;
                match built {
                    Ok(tree) => {
                        let _ = tx.send(DataEvent::DetailReady {
                            generation: render.generation,
                            key,
                            tree,
                        });
                    }
                    Err(e) => tracing::error!(reference = %key, error = %e, "building results tree failed"),
                }
            });
        }

        if let Some(url) = app.pending_open.take()
            && let Err(e) = browser::open(app.settings.browser_command.as_deref(), &url)
        {
            tracing::warn!(%url, error = %e, "could not open test source");
            app.notifier.error(e.to_string());
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
