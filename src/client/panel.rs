//! Per-panel state container
//!
//! A panel owns one location and the last snapshot fetched for it. Every
//! transition is published on a `watch` channel. Each request takes a new
//! generation number; a response is applied only while its generation is
//! still the latest, so a slow answer for an older location is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::FetchError;

/// Where a panel gets its snapshots from
#[async_trait]
pub trait PanelSource: Send + Sync + 'static {
    type Snapshot: Send + Sync + 'static;

    async fn fetch(&self, location: &str) -> Result<Self::Snapshot, FetchError>;
}

#[derive(Debug)]
pub enum PanelState<S> {
    /// No location requested yet
    Idle,
    /// A request is outstanding; `previous` stays visible meanwhile
    Fetching {
        location: String,
        previous: Option<Arc<S>>,
    },
    Displaying {
        location: String,
        snapshot: Arc<S>,
    },
    /// The last request failed
    Unavailable {
        location: String,
        reason: String,
        previous: Option<Arc<S>>,
    },
}

impl<S> Clone for PanelState<S> {
    fn clone(&self) -> Self {
        match self {
            PanelState::Idle => PanelState::Idle,
            PanelState::Fetching { location, previous } => PanelState::Fetching {
                location: location.clone(),
                previous: previous.clone(),
            },
            PanelState::Displaying { location, snapshot } => PanelState::Displaying {
                location: location.clone(),
                snapshot: Arc::clone(snapshot),
            },
            PanelState::Unavailable {
                location,
                reason,
                previous,
            } => PanelState::Unavailable {
                location: location.clone(),
                reason: reason.clone(),
                previous: previous.clone(),
            },
        }
    }
}

impl<S> PanelState<S> {
    /// Location of the latest request
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            PanelState::Idle => None,
            PanelState::Fetching { location, .. }
            | PanelState::Displaying { location, .. }
            | PanelState::Unavailable { location, .. } => Some(location),
        }
    }

    /// Snapshot that should currently be on screen, if any
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<S>> {
        match self {
            PanelState::Idle => None,
            PanelState::Displaying { snapshot, .. } => Some(snapshot),
            PanelState::Fetching { previous, .. } | PanelState::Unavailable { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        matches!(self, PanelState::Fetching { .. })
    }

    #[must_use]
    pub fn is_displaying(&self) -> bool {
        matches!(self, PanelState::Displaying { .. })
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PanelState::Unavailable { .. })
    }
}

struct PanelInner<Src: PanelSource> {
    name: &'static str,
    source: Src,
    generation: Mutex<u64>,
    state: watch::Sender<PanelState<Src::Snapshot>>,
}

/// Cheaply cloneable handle to one display panel
pub struct Panel<Src: PanelSource> {
    inner: Arc<PanelInner<Src>>,
}

impl<Src: PanelSource> Clone for Panel<Src> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Src: PanelSource> std::fmt::Debug for Panel<Src> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("name", &self.inner.name)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

impl<Src: PanelSource> Panel<Src> {
    pub fn new(name: &'static str, source: Src) -> Self {
        let (state, _) = watch::channel(PanelState::Idle);
        Self {
            inner: Arc::new(PanelInner {
                name,
                source,
                generation: Mutex::new(0),
                state,
            }),
        }
    }

    /// Receiver notified on every state transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PanelState<Src::Snapshot>> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> PanelState<Src::Snapshot> {
        self.inner.state.borrow().clone()
    }

    /// Generation of the most recent request
    #[must_use]
    pub fn generation(&self) -> u64 {
        *self.inner.generation.lock()
    }

    /// Start fetching `location`, superseding any outstanding request.
    ///
    /// The returned handle resolves to whether the response was applied.
    pub fn request(&self, location: impl Into<String>) -> JoinHandle<bool> {
        let location = location.into();
        let generation = self.inner.begin(&location);
        debug!(panel = self.inner.name, generation, %location, "Fetching");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.source.fetch(&location).await;
            inner.complete(generation, location, result)
        })
    }
}

impl<Src: PanelSource> PanelInner<Src> {
    fn begin(&self, location: &str) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;

        let previous = self.state.borrow().snapshot().cloned();
        self.state.send_replace(PanelState::Fetching {
            location: location.to_string(),
            previous,
        });
        *generation
    }

    fn complete(
        &self,
        generation: u64,
        location: String,
        result: Result<Src::Snapshot, FetchError>,
    ) -> bool {
        let latest = self.generation.lock();
        if *latest != generation {
            debug!(
                panel = self.name,
                generation,
                latest = *latest,
                %location,
                "Discarding superseded response"
            );
            return false;
        }

        let next = match result {
            Ok(snapshot) => PanelState::Displaying {
                location,
                snapshot: Arc::new(snapshot),
            },
            Err(e) => {
                warn!(panel = self.name, %location, "Fetch failed: {}", e);
                let previous = self.state.borrow().snapshot().cloned();
                PanelState::Unavailable {
                    location,
                    reason: e.reason(),
                    previous,
                }
            }
        };
        self.state.send_replace(next);
        true
    }
}
