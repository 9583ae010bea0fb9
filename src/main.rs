use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;

use mentions::app::App;
use mentions::cli::{Args, Settings};
use mentions::config;
use mentions::mention::{LookupClient, NextcloudClient, QueryController};

/// How long to wait for input before checking for lookup results
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();
    let loaded = match &args.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    let settings = Settings::resolve(&args, &loaded.config)?;

    if let Some(path) = &settings.log_file {
        init_logging(path)?;
    }
    if let Some(warning) = &loaded.warning {
        log::warn!("{}", warning);
    }

    let client: Arc<dyn LookupClient> = Arc::new(NextcloudClient::new()?);
    let Settings {
        session,
        policy,
        limit,
        ..
    } = settings;
    let mut app = App::new(|view, sink| {
        let mut controller = QueryController::with_worker(session, client, policy, view, sink)?;
        controller.set_limit(limit);
        Ok(controller)
    })?;
    app.status = loaded.warning;

    // Initialize terminal (handles raw mode, alternate screen, etc.)
    let terminal = ratatui::init();

    let result = run(terminal, &mut app);

    // Restore terminal (automatic cleanup)
    ratatui::restore();

    result
}

fn run(mut terminal: DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        app.handle_events(TICK)?;
        app.tick();

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Send log output to `path`; the terminal belongs to the UI
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}
