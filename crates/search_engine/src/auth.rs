/// Supplies an optional bearer token for history-saving requests.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Option<String>;
}

/// Anonymous user.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoToken;

#[async_trait::async_trait]
impl TokenProvider for NoToken {
    async fn token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait::async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call, so a login
/// elsewhere is picked up without restarting.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait::async_trait]
impl TokenProvider for EnvToken {
    async fn token(&self) -> Option<String> {
        std::env::var(&self.var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
