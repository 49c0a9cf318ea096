use std::time::Duration;

use reqwest::StatusCode;
use search_core::{ApartmentHit, LocationHit, UnifiedResult};
use url::Url;

use crate::{FailureKind, FetchError, HitKind, SourceRequest};

/// Query parameter added when a source should record the search server-side.
pub const SAVE_HISTORY_PARAM: &str = "save";

/// One independent backend contributing a slice of the unified list.
#[async_trait::async_trait]
pub trait SearchSource: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this source can record history for authenticated users.
    fn records_history(&self) -> bool {
        false
    }

    async fn search(&self, request: &SourceRequest<'_>) -> Result<Vec<UnifiedResult>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpSourceSettings {
    pub name: String,
    pub endpoint: String,
    pub query_param: String,
    pub kind: HitKind,
    pub records_history: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpSourceSettings {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, kind: HitKind) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            query_param: "q".to_string(),
            kind,
            records_history: false,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// REST source: `GET {endpoint}?{query_param}={query}` returning a JSON array.
#[derive(Debug, Clone)]
pub struct HttpSource {
    settings: HttpSourceSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(settings: HttpSourceSettings) -> Result<Self, FetchError> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    fn request_url(&self, query: &str, save_history: bool) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(&self.settings.query_param, query);
            if save_history {
                pairs.append_pair(SAVE_HISTORY_PARAM, "true");
            }
        }
        url
    }
}

#[async_trait::async_trait]
impl SearchSource for HttpSource {
    fn name(&self) -> &str {
        &self.settings.name
    }

    fn records_history(&self) -> bool {
        self.settings.records_history
    }

    async fn search(&self, request: &SourceRequest<'_>) -> Result<Vec<UnifiedResult>, FetchError> {
        let save_history = request.save_history && self.settings.records_history;
        let url = self.request_url(request.query, save_history);

        let mut builder = self.client.get(url.as_str());
        if save_history {
            if let Some(token) = request.token {
                builder = builder.bearer_auth(token);
            }
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::new(FailureKind::Unauthorized, status.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        decode_hits(self.settings.kind, &body)
    }
}

/// Decodes a JSON array body into unified results of the given kind.
pub fn decode_hits(kind: HitKind, body: &[u8]) -> Result<Vec<UnifiedResult>, FetchError> {
    let decode_err = |err: serde_json::Error| FetchError::new(FailureKind::Decode, err.to_string());
    let hits = match kind {
        HitKind::Location => serde_json::from_slice::<Vec<LocationHit>>(body)
            .map_err(decode_err)?
            .into_iter()
            .map(UnifiedResult::Location)
            .collect(),
        HitKind::Apartment => serde_json::from_slice::<Vec<ApartmentHit>>(body)
            .map_err(decode_err)?
            .into_iter()
            .map(UnifiedResult::Apartment)
            .collect(),
    };
    Ok(hits)
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return FetchError::new(FailureKind::InvalidUrl, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
