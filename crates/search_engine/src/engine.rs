use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use search_core::DispatchRequest;
use search_logging::search_debug;

use crate::debounce::Debouncer;
use crate::dispatch::{ChannelBatchSink, Dispatcher};
use crate::EngineEvent;

enum EngineCommand {
    Debounce { text: String, delay: Duration },
    CancelDebounce,
    Dispatch(DispatchRequest),
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Handle to the engine thread. Cloning shares the same thread and event queue.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(dispatcher: Dispatcher) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let settled_tx = event_tx.clone();
            let mut debouncer = Debouncer::new(runtime.handle().clone(), move |text: String| {
                let _ = settled_tx.send(EngineEvent::InputSettled(text));
            });

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Debounce { text, delay } => debouncer.schedule(text, delay),
                    EngineCommand::CancelDebounce => debouncer.cancel(),
                    EngineCommand::Dispatch(request) => {
                        let dispatcher = dispatcher.clone();
                        let sink = ChannelBatchSink::new(event_tx.clone());
                        runtime.spawn(async move {
                            dispatcher.run(request, &sink).await;
                        });
                    }
                    EngineCommand::Shutdown => break,
                }
            }

            search_debug!("engine shutting down");
            debouncer.dispose();
            // Dropping the runtime drops in-flight sinks, closing the event channel.
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn debounce(&self, text: impl Into<String>, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::Debounce {
            text: text.into(),
            delay,
        });
    }

    pub fn cancel_debounce(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelDebounce);
    }

    pub fn dispatch(&self, request: DispatchRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Dispatch(request));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Stops the engine thread; pending timers and dispatches are dropped.
    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }

    /// `Err(Disconnected)` once the engine thread has exited.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.event_rx
            .lock()
            .map_err(|_| RecvTimeoutError::Disconnected)?
            .recv_timeout(timeout)
    }
}
