use anyhow::Result;

mod app;
mod client;
mod config;
mod handler;
mod logging;
mod message;
mod tui;
mod ui;

use app::App;
use config::Config;
use handler::handle_event;
use tui::Events;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = logging::init()?;

    let config = Config::load_or_init().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to load config, using defaults");
        Config::default()
    });
    tracing::info!(endpoint = config.endpoint(), "starting civic-assist");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(&config);
    let mut events = Events::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handle_event(&mut app, event)?,
            None => app.should_quit = true,
        }

        // Fold any finished request back into the conversation; the tick
        // guarantees this runs even when the user is idle
        app.poll_response().await;
    }

    tui::restore()?;
    Ok(())
}
