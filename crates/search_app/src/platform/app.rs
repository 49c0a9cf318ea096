use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use search_core::{update, Msg, SearchConfig, SearchPhase, SearchState};
use search_engine::EngineHandle;
use search_logging::{search_info, search_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::parse_line;
use super::persistence::HistoryStore;
use super::{render, Cli, Inbox};

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    search_logging::initialize(cli.log.destination(), cli.level());

    let config = AppConfig::load(&cli.config)?;
    let mut search_config = config.search_config();
    search_config.save_history |= cli.save_history;
    for name in &cli.disabled {
        match search_config.sources.iter_mut().find(|spec| spec.name == *name) {
            Some(spec) => spec.enabled = false,
            None => search_warn!("--disable {}: no such source", name),
        }
    }

    let dispatcher = config.build_dispatcher()?;
    let engine = EngineHandle::new(dispatcher).context("starting search engine")?;

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let effects = EffectRunner::new(engine, inbox_tx.clone());
    spawn_stdin_reader(inbox_tx);

    let history = HistoryStore::new(config.state_dir.clone());
    let restored = history.load();
    let mut driver = Driver::new(SearchState::new(search_config), effects, history, io::stdout());
    driver.dispatch_msg(Msg::RestoreRecentQueries(restored));

    let mut quitting = false;
    while let Ok(input) = inbox_rx.recv() {
        match input {
            Inbox::Core(msg) => driver.dispatch_msg(msg),
            Inbox::Quit => quitting = true,
        }
        // Let the last typed query finish before leaving.
        if quitting && driver.phase() == SearchPhase::Idle {
            break;
        }
    }

    driver.effects.shutdown();
    search_info!("Search session finished at generation {}", driver.state.generation());
    Ok(())
}

fn spawn_stdin_reader(inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match parse_line(&line) {
                Some(input) => {
                    if inbox.send(input).is_err() {
                        return;
                    }
                }
                None => eprintln!("unknown command: {line}"),
            }
        }
        let _ = inbox.send(Inbox::Quit);
    });
}

struct Driver<W: Write> {
    state: SearchState,
    effects: EffectRunner,
    history: HistoryStore,
    recent: Vec<String>,
    out: W,
}

impl<W: Write> Driver<W> {
    fn new(state: SearchState, effects: EffectRunner, history: HistoryStore, out: W) -> Self {
        Self {
            recent: state.recent_queries(),
            state,
            effects,
            history,
            out,
        }
    }

    fn phase(&self) -> SearchPhase {
        self.state.phase()
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        if let Some(name) = unknown_toggle(self.state.config(), &msg) {
            search_warn!("Toggle for unknown source {:?} ignored", name);
        }
        let restoring = matches!(msg, Msg::RestoreRecentQueries(_));
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;
        self.effects.enqueue(effects);

        if !was_dirty {
            return;
        }
        if view.recent_queries != self.recent {
            self.recent = view.recent_queries.clone();
            if !restoring {
                self.history.save(&self.recent);
            }
        }
        for line in render::render(&view) {
            if let Err(err) = writeln!(self.out, "{line}") {
                search_warn!("Failed to write results: {}", err);
                return;
            }
        }
        let _ = self.out.flush();
    }
}

/// Name of a source a toggle refers to when the configuration has no such source.
fn unknown_toggle<'a>(config: &SearchConfig, msg: &'a Msg) -> Option<&'a str> {
    match msg {
        Msg::SourceToggled { source, .. } if !config.has_source(source) => Some(source),
        _ => None,
    }
}
