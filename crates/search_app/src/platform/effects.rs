use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use search_core::{Effect, Msg};
use search_engine::{EngineEvent, EngineHandle};
use search_logging::{search_debug, search_info};

use super::Inbox;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, inbox: mpsc::Sender<Inbox>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(inbox);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Debounce { text, delay } => {
                    search_debug!("Debounce text_len={} delay={:?}", text.len(), delay);
                    self.engine.debounce(text, delay);
                }
                Effect::CancelDebounce => self.engine.cancel_debounce(),
                Effect::Dispatch(request) => {
                    search_info!(
                        "Dispatch generation={} query={:?} sources={}",
                        request.generation,
                        request.query,
                        request.sources.join(",")
                    );
                    self.engine.dispatch(request);
                }
            }
        }
    }

    pub fn shutdown(&self) {
        self.engine.shutdown();
    }

    fn spawn_event_loop(&self, inbox: mpsc::Sender<Inbox>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let event = match engine.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    search_debug!("engine event channel closed; stopping event pump");
                    break;
                }
            };
            let msg = match event {
                EngineEvent::InputSettled(text) => Msg::InputSettled(text),
                EngineEvent::BatchReady(batch) => Msg::BatchReceived(batch),
            };
            if inbox.send(Inbox::Core(msg)).is_err() {
                break;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use search_engine::{DispatchSettings, Dispatcher, NoToken};

    use super::*;

    #[test]
    fn event_pump_stops_when_engine_exits() {
        let dispatcher = Dispatcher::new(Vec::new(), Arc::new(NoToken), DispatchSettings::default());
        let engine = EngineHandle::new(dispatcher).unwrap();
        let (inbox_tx, inbox_rx) = mpsc::channel();
        let runner = EffectRunner::new(engine.clone(), inbox_tx);

        engine.shutdown();

        // The pump owned the only sender; its exit disconnects the inbox.
        assert_eq!(
            inbox_rx.recv_timeout(Duration::from_secs(2)),
            Err(RecvTimeoutError::Disconnected)
        );
        drop(runner);
    }
}
