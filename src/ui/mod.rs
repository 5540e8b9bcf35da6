//! Terminal front end for the analysis API.
//!
//! A three-page wizard (home, form, result) that submits requests to a
//! running `serve` instance and renders the answer.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;
use tracing::info;

use crate::config::UiConfig;

pub mod analysis;
pub mod app;
pub mod backend;
mod view;

use app::{Action, App};
use backend::BackendClient;

pub fn run(config: &UiConfig) -> Result<()> {
    let backend = BackendClient::new(config)?;
    info!("Using analysis backend at {}", backend.endpoint());

    let mut app = App::new();
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, &mut app, &backend);
    ratatui::restore();
    result
}

fn run_loop(terminal: &mut DefaultTerminal, app: &mut App, backend: &BackendClient) -> Result<()> {
    loop {
        terminal.draw(|frame| view::draw(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app.handle_key(key.code, key.modifiers) {
                    Action::None => {}
                    Action::Submit(request) => {
                        app.busy = true;
                        terminal.draw(|frame| view::draw(frame, app))?;
                        let outcome = backend.analyze(&request);
                        app.apply_outcome(outcome);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
