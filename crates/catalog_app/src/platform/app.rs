use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use catalog_core::{update, AppState, Msg};
use catalog_engine::{CatalogSettings, EngineHandle};
use catalog_logging::{catalog_info, catalog_warn};

use super::effects::EffectRunner;
use super::input::{self, Command};
use super::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app(settings: &CatalogSettings) -> anyhow::Result<()> {
    let engine = EngineHandle::new(settings).context("starting catalog engine")?;
    let runner = EffectRunner::new(engine, settings.page_size);
    let state = AppState::new().with_debounce_delay(settings.debounce_delay());
    let mut app = App::new(state, runner);

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if cmd_tx.send(input::parse_line(&line)).is_err() {
                break;
            }
        }
        let _ = cmd_tx.send(Command::Quit);
    });

    println!("{}", input::HELP);
    app.dispatch(Msg::Started);
    app.render_if_dirty()?;

    loop {
        match cmd_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Ok(command) => app.handle_command(command),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
        app.process_engine_events();
        app.render_if_dirty()?;
    }

    catalog_info!("Catalog host shutting down");
    Ok(())
}

struct App {
    state: AppState,
    runner: EffectRunner,
    search_focused: bool,
    /// Host-only changes (focus) that still need a redraw.
    needs_render: bool,
}

impl App {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self {
            state,
            runner,
            search_focused: true,
            needs_render: false,
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Dispatch(msg) => {
                self.set_search_focus(matches!(
                    msg,
                    Msg::SearchInputChanged(_)
                        | Msg::CompositionStarted
                        | Msg::CompositionEnded(_)
                        | Msg::EnterPressed
                ));
                self.dispatch(msg);
            }
            Command::SelectFile(path) => match input::load_selected_file(&path) {
                Ok(file) => self.dispatch(Msg::FileSelected(Some(file))),
                Err(err) => {
                    catalog_warn!("Failed to read {:?}: {}", path, err);
                    println!("Cannot read {}: {}", path.display(), err);
                }
            },
            Command::Help => println!("{}", input::HELP),
            Command::Unknown(line) => println!("Unknown command: {line} (:help lists commands)"),
            Command::Quit => {}
        }
    }

    fn process_engine_events(&mut self) {
        while let Some(msg) = self.runner.try_recv() {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        let host = self.runner.run(effects);
        if host.focus_search {
            self.set_search_focus(true);
        }
    }

    fn set_search_focus(&mut self, focused: bool) {
        if self.search_focused != focused {
            self.search_focused = focused;
            self.needs_render = true;
        }
    }

    fn render_if_dirty(&mut self) -> anyhow::Result<()> {
        let state_dirty = self.state.consume_dirty();
        let host_dirty = std::mem::take(&mut self.needs_render);
        if !(state_dirty || host_dirty) {
            return Ok(());
        }
        let view = self.state.view();
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", ui::render::render(&view, self.search_focused))?;
        stdout.flush()?;
        Ok(())
    }
}
