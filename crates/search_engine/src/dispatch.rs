use std::sync::{mpsc, Arc};
use std::time::Duration;

use futures_util::future::{self, BoxFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use search_core::{DispatchRequest, SourceBatch};
use search_logging::{search_debug, search_warn};

use crate::{EngineEvent, FailureKind, FetchError, SearchSource, SourceRequest, TokenProvider};

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Lazy, generation-tagged fetch for one source. Never fails.
pub type PendingBatch = BoxFuture<'static, SourceBatch>;

pub trait BatchSink: Send + Sync {
    fn emit(&self, batch: SourceBatch);
}

pub struct ChannelBatchSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelBatchSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl BatchSink for ChannelBatchSink {
    fn emit(&self, batch: SourceBatch) {
        let _ = self.tx.send(EngineEvent::BatchReady(batch));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// `None` waits as long as the source's own transport allows.
    pub source_timeout: Option<Duration>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            source_timeout: Some(DEFAULT_SOURCE_TIMEOUT),
        }
    }
}

/// Fans one settled query out to the requested sources.
///
/// Every requested source yields exactly one batch: errors, timeouts and
/// unknown names are logged and turned into empty batches.
#[derive(Clone)]
pub struct Dispatcher {
    sources: Arc<Vec<Arc<dyn SearchSource>>>,
    tokens: Arc<dyn TokenProvider>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(
        sources: Vec<Arc<dyn SearchSource>>,
        tokens: Arc<dyn TokenProvider>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            sources: Arc::new(sources),
            tokens,
            settings,
        }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Builds one pending batch per requested source, in request order.
    ///
    /// Nothing is sent until the returned futures are polled.
    pub async fn dispatch(&self, request: &DispatchRequest) -> Vec<PendingBatch> {
        let token = self.token_for(request).await;
        request
            .sources
            .iter()
            .map(|name| self.pending(name, request, token.clone()))
            .collect()
    }

    /// Issues every request at once and emits each batch as it resolves.
    pub async fn run(&self, request: DispatchRequest, sink: &dyn BatchSink) {
        search_debug!(
            "dispatch generation={} query={:?} sources={:?}",
            request.generation,
            request.query,
            request.sources
        );
        let mut in_flight: FuturesUnordered<PendingBatch> =
            self.dispatch(&request).await.into_iter().collect();
        while let Some(batch) = in_flight.next().await {
            sink.emit(batch);
        }
    }

    /// Awaits every batch; output follows request order.
    pub async fn collect(&self, request: &DispatchRequest) -> Vec<SourceBatch> {
        future::join_all(self.dispatch(request).await).await
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn SearchSource>> {
        self.sources.iter().find(|source| source.name() == name)
    }

    async fn token_for(&self, request: &DispatchRequest) -> Option<String> {
        if !request.save_history {
            return None;
        }
        let wants_token = request
            .sources
            .iter()
            .filter_map(|name| self.find(name))
            .any(|source| source.records_history());
        if !wants_token {
            return None;
        }
        self.tokens.token().await
    }

    fn pending(&self, name: &str, request: &DispatchRequest, token: Option<String>) -> PendingBatch {
        let generation = request.generation;
        let Some(source) = self.find(name).cloned() else {
            search_warn!("unknown source {} requested for generation {}", name, generation);
            return Box::pin(future::ready(SourceBatch::empty(name, generation)));
        };

        let query = request.query.clone();
        let save_history = request.save_history;
        let timeout = self.settings.source_timeout;
        Box::pin(async move {
            let source_request = SourceRequest {
                query: &query,
                token: token.as_deref(),
                save_history,
            };
            let outcome = match timeout {
                Some(limit) => tokio::time::timeout(limit, source.search(&source_request))
                    .await
                    .unwrap_or_else(|_| {
                        Err(FetchError::new(
                            FailureKind::Timeout,
                            format!("no response within {limit:?}"),
                        ))
                    }),
                None => source.search(&source_request).await,
            };

            let results = outcome.unwrap_or_else(|err| {
                search_warn!(
                    "source {} failed for generation {}: {}",
                    source.name(),
                    generation,
                    err
                );
                Vec::new()
            });
            SourceBatch {
                source: source.name().to_string(),
                generation,
                results,
            }
        })
    }
}
