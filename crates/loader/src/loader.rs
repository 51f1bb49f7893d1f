//! One-shot plugin loading with per-source isolation.
//!
//! The default mode runs all sources as independent concurrent futures:
//! one source failing or timing out is logged and recorded in the report,
//! and every other source still loads. Strict mode runs sources
//! sequentially and aborts the whole load at the first failure.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use {
    futures::future::join_all,
    serde::Serialize,
    tracing::{info, warn},
};

use ferrule_registry::PluginRegistry;

use crate::{
    error::{Error, Result},
    source::PluginSource,
};

/// Per-source timeout applied when none is configured.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives one-time discovery and registration of all installed plugins
/// before any dispatcher adapter queries the registry.
pub struct Loader {
    sources: Vec<Arc<dyn PluginSource>>,
    per_source_timeout: Duration,
    deadline: Option<Duration>,
    strict: bool,
    loaded: AtomicBool,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            per_source_timeout: DEFAULT_SOURCE_TIMEOUT,
            deadline: None,
            strict: false,
            loaded: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn PluginSource>) -> Self {
        self.sources.push(source);
        self
    }

    #[must_use]
    pub fn with_sources(
        mut self,
        sources: impl IntoIterator<Item = Arc<dyn PluginSource>>,
    ) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Bound each source's registration call. A source exceeding the
    /// timeout is treated as failed, isolated like any other failure.
    #[must_use]
    pub fn with_per_source_timeout(mut self, timeout: Duration) -> Self {
        self.per_source_timeout = timeout;
        self
    }

    /// Overall deadline for `load_all`. On expiry the report marks sources
    /// that never completed instead of failing the process.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// In strict mode sources run sequentially and the first failure
    /// aborts the whole load.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Run every source's registration code exactly once. A second call on
    /// the same loader fails with [`Error::AlreadyLoaded`].
    pub async fn load_all(&self, registry: &PluginRegistry) -> Result<LoadReport> {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyLoaded);
        }
        info!(
            sources = self.sources.len(),
            strict = self.strict,
            "loading plugin sources"
        );
        if self.strict {
            self.load_strict(registry).await
        } else {
            self.load_isolated(registry).await
        }
    }

    async fn load_strict(&self, registry: &PluginRegistry) -> Result<LoadReport> {
        let mut outcomes = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            match self.run_source(source.as_ref(), registry).await {
                SourceStatus::Loaded => outcomes.push(SourceOutcome {
                    source: source.name().to_string(),
                    status: SourceStatus::Loaded,
                }),
                SourceStatus::TimedOut => {
                    return Err(Error::source_load_failed(
                        source.name(),
                        format!("timed out after {:?}", self.per_source_timeout),
                    ));
                },
                SourceStatus::Failed { reason } | SourceStatus::DeadlineExceeded { reason } => {
                    return Err(Error::source_load_failed(source.name(), reason));
                },
            }
        }
        Ok(LoadReport { outcomes })
    }

    async fn load_isolated(&self, registry: &PluginRegistry) -> Result<LoadReport> {
        let completed: Mutex<Vec<SourceOutcome>> = Mutex::new(Vec::new());
        let run_all = join_all(self.sources.iter().map(|source| {
            let completed = &completed;
            async move {
                let status = self.run_source(source.as_ref(), registry).await;
                completed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(SourceOutcome {
                        source: source.name().to_string(),
                        status,
                    });
            }
        }));

        match self.deadline {
            Some(deadline) => {
                if tokio::time::timeout(deadline, run_all).await.is_err() {
                    warn!(?deadline, "plugin load deadline expired");
                }
            },
            None => {
                run_all.await;
            },
        }

        let completed = completed
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        // Report in source order; sources with no recorded outcome never
        // completed before the deadline.
        let outcomes = self
            .sources
            .iter()
            .map(|source| {
                completed
                    .iter()
                    .find(|outcome| outcome.source == source.name())
                    .cloned()
                    .unwrap_or_else(|| SourceOutcome {
                        source: source.name().to_string(),
                        status: SourceStatus::DeadlineExceeded {
                            reason: "did not complete before the load deadline".to_string(),
                        },
                    })
            })
            .collect();
        Ok(LoadReport { outcomes })
    }

    async fn run_source(&self, source: &dyn PluginSource, registry: &PluginRegistry) -> SourceStatus {
        match tokio::time::timeout(self.per_source_timeout, source.register(registry)).await {
            Ok(Ok(())) => {
                info!(source = source.name(), "plugin source loaded");
                SourceStatus::Loaded
            },
            Ok(Err(e)) => {
                warn!(source = source.name(), error = %e, "plugin source failed to load");
                SourceStatus::Failed {
                    reason: e.to_string(),
                }
            },
            Err(_) => {
                warn!(
                    source = source.name(),
                    timeout = ?self.per_source_timeout,
                    "plugin source timed out"
                );
                SourceStatus::TimedOut
            },
        }
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// How one source's load attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SourceStatus {
    Loaded,
    Failed { reason: String },
    TimedOut,
    DeadlineExceeded { reason: String },
}

/// Load outcome for one named source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceOutcome {
    pub source: String,
    pub status: SourceStatus,
}

/// Per-source outcomes of one `load_all` invocation, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub outcomes: Vec<SourceOutcome>,
}

impl LoadReport {
    /// Names of the sources that loaded successfully.
    pub fn loaded(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == SourceStatus::Loaded)
            .map(|outcome| outcome.source.as_str())
    }

    /// Outcomes for sources that did not load.
    pub fn failed(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status != SourceStatus::Loaded)
    }

    pub fn is_fully_loaded(&self) -> bool {
        self.failed().next().is_none()
    }
}
