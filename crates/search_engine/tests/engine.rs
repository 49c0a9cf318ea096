use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use search_core::{DispatchRequest, LocationHit, UnifiedResult};
use search_engine::{
    DispatchSettings, Dispatcher, EngineEvent, EngineHandle, FetchError, NoToken, SearchSource,
    SourceRequest,
};

struct EchoSource(&'static str);

#[async_trait::async_trait]
impl SearchSource for EchoSource {
    fn name(&self) -> &str {
        self.0
    }

    async fn search(&self, request: &SourceRequest<'_>) -> Result<Vec<UnifiedResult>, FetchError> {
        Ok(vec![UnifiedResult::Location(LocationHit {
            code: self.0.to_string(),
            name: request.query.to_string(),
            full_name: None,
        })])
    }
}

fn engine() -> EngineHandle {
    search_logging::initialize_for_tests();
    let dispatcher = Dispatcher::new(
        vec![Arc::new(EchoSource("north")), Arc::new(EchoSource("south"))],
        Arc::new(NoToken),
        DispatchSettings::default(),
    );
    EngineHandle::new(dispatcher).expect("engine starts")
}

fn drain(engine: &EngineHandle, window: Duration) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = engine.recv_timeout(window) {
        events.push(event);
    }
    events
}

#[test]
fn rapid_debounce_requests_settle_once() {
    let engine = engine();
    let delay = Duration::from_millis(50);
    engine.debounce("강", delay);
    engine.debounce("강남", delay);

    let events = drain(&engine, Duration::from_millis(300));
    assert_eq!(events, vec![EngineEvent::InputSettled("강남".to_string())]);
}

#[test]
fn cancelled_debounce_never_settles() {
    let engine = engine();
    engine.debounce("강남", Duration::from_millis(50));
    engine.cancel_debounce();

    assert!(drain(&engine, Duration::from_millis(200)).is_empty());
}

#[test]
fn dispatch_reports_one_batch_per_source() {
    let engine = engine();
    engine.dispatch(DispatchRequest {
        generation: 4,
        query: "강남".to_string(),
        sources: vec!["north".to_string(), "south".to_string()],
        save_history: false,
    });

    let mut sources: Vec<String> = drain(&engine, Duration::from_millis(500))
        .into_iter()
        .map(|event| match event {
            EngineEvent::BatchReady(batch) => {
                assert_eq!(batch.generation, 4);
                batch.source
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    sources.sort();
    assert_eq!(sources, vec!["north".to_string(), "south".to_string()]);
}

#[test]
fn shutdown_closes_the_event_channel() {
    let engine = engine();
    engine.debounce("강남", Duration::from_secs(60));
    engine.shutdown();

    assert_eq!(
        engine.recv_timeout(Duration::from_secs(2)),
        Err(RecvTimeoutError::Disconnected)
    );
}
