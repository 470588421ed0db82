//! Terminal lifecycle, event loop, and cleanup for the palette TUI.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;

use bk_palette::app::App;
use bk_palette::backend::BuildkiteClient;
use bk_palette::builds::BuildSource;
use bk_palette::config::Config;
use bk_palette::events::TICK_RATE;
use bk_palette::store::{KeyValueStore, MemoryStore};
use bk_palette::{logging, ui};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(config.debug, &config.log_file)?;

    let source: Option<Arc<dyn BuildSource>> = match &config.buildkite {
        Some(bk) => match BuildkiteClient::new(bk) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Buildkite client unavailable");
                None
            }
        },
        None => None,
    };
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut app = App::new(&config, store, source)?;
    app.bootstrap();
    app.show();

    // Set up the terminal in raw / alternate-screen mode.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, DisableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.show_cursor()?;

    let result = run_loop(&mut terminal, &mut app);

    // Always restore the terminal, even on error.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick = app.tick.wrapping_add(1);
        app.poll_results(Instant::now());

        if app.should_quit {
            return Ok(());
        }

        let size = terminal.size()?;
        app.set_viewport_rows(ui::palette_rows(size.height));

        let tick = app.tick;
        terminal.draw(|frame| ui::render(frame, app, tick))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.on_key(&key);
                if app.should_quit {
                    return Ok(());
                }
            }
        }
    }
}
