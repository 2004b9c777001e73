//! Redis-backed list store.
//!
//! # Responsibilities
//! - Build the connection URL from configured options
//! - Keep a reconnecting connection to the server
//! - Map LPUSH / LLEN / LRANGE onto [`ListStore`]
//! - Publish connection lifecycle transitions as [`ConnectionEvent`]s

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use url::Url;

use crate::config::schema::StoreConnectionConfig;
use crate::observability::OPS_TARGET;
use crate::resilience::timeouts::bounded;
use crate::store::{ConnectionEvent, ConnectionEvents, ListStore, StoreError, StoreResult};

/// Redis list store with optional per-call bounded waits.
pub struct RedisStore {
    manager: ConnectionManager,
    events: ConnectionEvents,
    op_timeout: Option<Duration>,
    endpoint: String,
}

impl RedisStore {
    /// Connect to the server described by `options`.
    ///
    /// Lifecycle events are published on `events`; subscribe before calling
    /// to observe the initial `Connecting`/`Connected`/`Ready` sequence.
    ///
    /// The initial connection, retries included, is bounded by
    /// `options.connect_timeout_ms`. A failure emits `Error` and is returned.
    pub async fn connect(
        options: &StoreConnectionConfig,
        op_timeout: Option<Duration>,
        events: ConnectionEvents,
    ) -> StoreResult<Self> {
        let endpoint = format!("{}:{}", options.host, options.port);
        events.emit(ConnectionEvent::Connecting {
            endpoint: endpoint.clone(),
        });

        let manager = match Self::open(options).await {
            Ok(manager) => manager,
            Err(e) => {
                events.emit(ConnectionEvent::Error(e.to_string()));
                return Err(e);
            }
        };
        events.emit(ConnectionEvent::Connected);

        let store = Self {
            manager,
            events,
            op_timeout,
            endpoint,
        };

        match store.ping().await {
            Ok(()) => store.events.emit(ConnectionEvent::Ready),
            Err(e) => {
                // Commands may still succeed once the manager reconnects.
                tracing::warn!(
                    target: OPS_TARGET,
                    endpoint = %store.endpoint,
                    error = %e,
                    "Store connected but health probe failed"
                );
            }
        }

        Ok(store)
    }

    async fn open(options: &StoreConnectionConfig) -> StoreResult<ConnectionManager> {
        let url = connection_url(options)?;
        let client = redis::Client::open(url.as_str())?;
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(options.connect_retries)
            .set_connection_timeout(options.connect_timeout());
        bounded(
            Some(options.connect_timeout()),
            ConnectionManager::new_with_config(client, config),
        )
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        let result = bounded(self.op_timeout, async move {
            let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(())
        })
        .await;
        self.observe(result)
    }

    /// Subscribe to this store's connection events.
    pub fn events(&self) -> &ConnectionEvents {
        &self.events
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn observe<T>(&self, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(e) = &result {
            self.events.emit(ConnectionEvent::Error(e.to_string()));
        }
        result
    }
}

#[async_trait]
impl ListStore for RedisStore {
    async fn push(&self, key: &str, value: String) -> StoreResult<u64> {
        let mut conn = self.manager.clone();
        let result = bounded(self.op_timeout, async move {
            let len: u64 = conn.lpush(key, value).await?;
            Ok::<_, redis::RedisError>(len)
        })
        .await;
        self.observe(result)
    }

    async fn length(&self, key: &str) -> StoreResult<u64> {
        let mut conn = self.manager.clone();
        let result = bounded(self.op_timeout, async move {
            let len: u64 = conn.llen(key).await?;
            Ok::<_, redis::RedisError>(len)
        })
        .await;
        self.observe(result)
    }

    async fn range(&self, key: &str, start: i64, end: i64) -> StoreResult<Vec<String>> {
        let (start, end) = (to_index(start)?, to_index(end)?);
        let mut conn = self.manager.clone();
        let result = bounded(self.op_timeout, async move {
            let items: Vec<String> = conn.lrange(key, start, end).await?;
            Ok::<_, redis::RedisError>(items)
        })
        .await;
        self.observe(result)
    }
}

impl Drop for RedisStore {
    fn drop(&mut self) {
        self.events.emit(ConnectionEvent::End);
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("endpoint", &self.endpoint)
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

fn to_index(index: i64) -> StoreResult<isize> {
    isize::try_from(index)
        .map_err(|_| StoreError::Command(format!("list index {index} out of range")))
}

/// Build a `redis://` URL; credentials are percent-encoded.
pub fn connection_url(options: &StoreConnectionConfig) -> StoreResult<Url> {
    let invalid = |what: &str| StoreError::Connection(format!("invalid store {what}"));

    let mut url = Url::parse(&format!(
        "redis://{}:{}/{}",
        options.host, options.port, options.db
    ))
    .map_err(|e| StoreError::Connection(format!("invalid store address: {e}")))?;

    if let Some(username) = &options.username {
        url.set_username(username).map_err(|_| invalid("username"))?;
    }
    if let Some(password) = &options.password {
        url.set_password(Some(password.as_str()))
            .map_err(|_| invalid("password"))?;
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn options() -> StoreConnectionConfig {
        StoreConnectionConfig {
            host: "localhost".to_string(),
            port: 6379,
            db: 2,
            ..StoreConnectionConfig::default()
        }
    }

    #[test]
    fn test_connection_url() {
        let url = connection_url(&options()).unwrap();
        assert_eq!(url.as_str(), "redis://localhost:6379/2");
    }

    #[test]
    fn test_credentials_are_encoded() {
        let mut opts = options();
        opts.username = Some("ops".to_string());
        opts.password = Some("p@ss/word".to_string());

        let url = connection_url(&opts).unwrap();
        assert_eq!(url.username(), "ops");
        assert_eq!(url.password(), Some("p%40ss%2Fword"));
        assert_eq!(url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_invalid_host_rejected() {
        let mut opts = options();
        opts.host = "bad host".to_string();
        assert!(matches!(
            connection_url(&opts),
            Err(StoreError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_fails_fast_with_events() {
        let events = ConnectionEvents::default();
        let mut rx = events.subscribe();
        let opts = StoreConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout_ms: 500,
            connect_retries: 0,
            ..StoreConnectionConfig::default()
        };

        let started = Instant::now();
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            RedisStore::connect(&opts, None, events),
        )
        .await
        .expect("connect must be bounded");

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(
            rx.recv().await.unwrap(),
            ConnectionEvent::Connecting {
                endpoint: "127.0.0.1:1".to_string()
            }
        );
        assert!(matches!(rx.recv().await.unwrap(), ConnectionEvent::Error(_)));
    }
}
