use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::fetch::ArticleClient;
use crate::filter::FilterRecord;
use crate::models::Article;

/// Fetch failure as surfaced to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    /// HTTP status code, when the server answered with a non-2xx status.
    pub status: Option<u16>,
}

impl From<&FetchError> for ErrorInfo {
    fn from(err: &FetchError) -> Self {
        let status = match err {
            FetchError::Http(code) => Some(code.as_u16()),
            _ => None,
        };
        Self {
            message: err.to_string(),
            status,
        }
    }
}

/// What the rendering layer reads: the latest applied article list, whether a
/// fetch is in flight, and the last fetch failure, if any. A fetch resolves
/// to articles or an error, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub loading: bool,
    pub articles: Vec<Article>,
    pub error: Option<ErrorInfo>,
}

pub type SharedFetchState = Arc<RwLock<FetchState>>;

/// Empty state, loading from the start: the initial load is always pending
/// when the viewer comes up.
pub fn shared_fetch_state() -> SharedFetchState {
    Arc::new(RwLock::new(FetchState {
        loading: true,
        ..FetchState::default()
    }))
}

/// Turns accepted filter records into fetches and owns all writes to the
/// shared `FetchState`. Every dispatch takes the next value of a monotonic
/// sequence number; a completion is applied only if no later dispatch has
/// been applied already, so a slow stale response can never overwrite a
/// newer result. In-flight requests are not cancelled, just outvoted.
#[derive(Debug, Clone)]
pub struct SearchOrchestrator {
    client: ArticleClient,
    state: SharedFetchState,
    issued: Arc<AtomicU64>,
    applied: Arc<AtomicU64>,
}

impl SearchOrchestrator {
    pub fn new(client: ArticleClient, state: SharedFetchState) -> Self {
        Self {
            client,
            state,
            issued: Arc::new(AtomicU64::new(0)),
            applied: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> SharedFetchState {
        Arc::clone(&self.state)
    }

    /// Fetch with no filters applied, awaited to completion.
    pub async fn initial_load(&self) -> Result<(), FetchError> {
        self.on_filter_change(FilterRecord::default()).await?;
        Ok(())
    }

    /// Dispatch a fetch for `record`. Returns the handle of the spawned
    /// fetch task; the searcher loop drops it and lets the sequence guard
    /// arbitrate completions.
    pub fn on_filter_change(&self, record: FilterRecord) -> JoinHandle<()> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let this = self.clone();
        tokio::spawn(async move {
            // Same guard on entry as on completion: a task whose first poll
            // is delayed past a newer dispatch's completion must not touch
            // the state at all, or it would leave `loading` wedged on.
            {
                let mut state = this.state.write().await;
                if seq <= this.applied.load(Ordering::SeqCst) {
                    debug!(seq, "skipping superseded fetch");
                    return;
                }
                state.loading = true;
            }

            let result = this.client.fetch(&record).await;

            // The guard is read and advanced under the state write lock, so
            // completions settle one at a time.
            let mut state = this.state.write().await;
            if seq <= this.applied.load(Ordering::SeqCst) {
                debug!(seq, "discarding stale fetch result");
                return;
            }
            this.applied.store(seq, Ordering::SeqCst);

            match result {
                Ok(articles) => {
                    debug!(seq, count = articles.len(), "applying fetch result");
                    state.articles = articles;
                    state.error = None;
                }
                Err(err) => {
                    // Previous articles stay in place on failure.
                    warn!(seq, error = %err, "article fetch failed");
                    state.error = Some(ErrorInfo::from(&err));
                }
            }
            state.loading = false;
        })
    }
}

pub struct SearchHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SearchHandle {
    pub async fn stop(self) -> Result<(), FetchError> {
        let _ = self.cancel_tx.send(());
        self.join.await.map_err(FetchError::from)
    }
}

/// Run the search loop: one unfiltered initial load, then a fetch for every
/// debounced filter record arriving on `updates`, until cancelled or the
/// filter side is dropped.
pub fn spawn_searcher(
    orchestrator: SearchOrchestrator,
    mut updates: mpsc::Receiver<FilterRecord>,
) -> SearchHandle {
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let _ = orchestrator.on_filter_change(FilterRecord::default());
        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("searcher shutdown requested");
                    break;
                }
                update = updates.recv() => match update {
                    Some(record) => {
                        let _ = orchestrator.on_filter_change(record);
                    }
                    None => {
                        debug!("filter channel closed");
                        break;
                    }
                }
            }
        }
    });

    SearchHandle { cancel_tx, join }
}
