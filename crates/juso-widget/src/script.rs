//! Idempotent loading of the third-party postal-code script.
//!
//! The popup cannot open until its script is available. `ScriptLoader`
//! memoizes a single load attempt: however many callers race on
//! [`ScriptLoader::load`], the underlying source runs once and every
//! caller observes the same outcome. A failed load stays failed for the
//! lifetime of the loader; hosts construct a fresh loader to retry.

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised while fetching the postal-code script.
///
/// Cloneable so a single failure can be handed to every waiting caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptLoadError {
    /// Script endpoint could not be reached
    #[error("failed to load postal-code script from {url}: {reason}")]
    Unreachable {
        /// Script URL
        url: String,
        /// Transport-level reason
        reason: String,
    },

    /// Script endpoint answered with a non-success status
    #[error("postal-code script endpoint returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// HTTP client could not be created
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

/// Source of the third-party script.
///
/// Production hosts fetch over HTTP ([`HttpScriptSource`]); tests inject
/// counting or failing doubles.
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Fetch the script, making the popup available.
    async fn fetch(&self) -> Result<(), ScriptLoadError>;
}

type SharedLoad = Shared<BoxFuture<'static, Result<(), ScriptLoadError>>>;

/// Memoizing loader sharing one load attempt between all callers.
pub struct ScriptLoader {
    source: Arc<dyn ScriptSource>,
    inflight: Mutex<Option<SharedLoad>>,
}

impl ScriptLoader {
    /// Create a loader over the given source. Nothing is fetched until the
    /// first [`load`](Self::load) call.
    #[must_use]
    pub fn new(source: Arc<dyn ScriptSource>) -> Self {
        Self {
            source,
            inflight: Mutex::new(None),
        }
    }

    /// Ensure the script is loaded.
    ///
    /// The first call starts the fetch; concurrent and later calls await
    /// the same shared attempt. Already-resolved attempts return
    /// immediately.
    pub async fn load(&self) -> Result<(), ScriptLoadError> {
        let shared = {
            let mut slot = self.inflight.lock().expect("acquire script loader lock");
            if let Some(existing) = slot.as_ref() {
                existing.clone()
            } else {
                let source = Arc::clone(&self.source);
                let load: BoxFuture<'static, Result<(), ScriptLoadError>> =
                    async move { source.fetch().await }.boxed();
                let shared = load.shared();
                *slot = Some(shared.clone());
                shared
            }
        };

        shared.await
    }
}

/// HTTP-backed script source fetching the configured script URL.
pub struct HttpScriptSource {
    client: reqwest::Client,
    url: String,
}

impl HttpScriptSource {
    /// Create a source for the given script URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>) -> Result<Self, ScriptLoadError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ScriptLoadError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ScriptSource for HttpScriptSource {
    async fn fetch(&self) -> Result<(), ScriptLoadError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            ScriptLoadError::Unreachable {
                url: self.url.clone(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(url = %self.url, "postal-code script fetched");
            Ok(())
        } else {
            Err(ScriptLoadError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl ScriptSource for CountingSource {
        async fn fetch(&self) -> Result<(), ScriptLoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Simulate network latency so concurrent callers overlap
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            if self.fail {
                Err(ScriptLoadError::Status { status: 503 })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_loads_share_one_fetch() {
        let source = CountingSource::new(false);
        let loader = ScriptLoader::new(Arc::clone(&source) as Arc<dyn ScriptSource>);

        let (a, b, c) = tokio::join!(loader.load(), loader.load(), loader.load());

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_loads_reuse_resolved_attempt() {
        let source = CountingSource::new(false);
        let loader = ScriptLoader::new(Arc::clone(&source) as Arc<dyn ScriptSource>);

        loader.load().await.expect("first load");
        loader.load().await.expect("second load");

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_shared_and_sticky() {
        let source = CountingSource::new(true);
        let loader = ScriptLoader::new(Arc::clone(&source) as Arc<dyn ScriptSource>);

        let (a, b) = tokio::join!(loader.load(), loader.load());
        assert_eq!(a, Err(ScriptLoadError::Status { status: 503 }));
        assert_eq!(a, b);

        // A later call does not retry; the failure is memoized.
        let c = loader.load().await;
        assert_eq!(c, Err(ScriptLoadError::Status { status: 503 }));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
