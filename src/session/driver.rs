//! Runs a [`SearchSession`] on a tokio task.
//!
//! The driver is the only place with real time and real I/O. It owns one
//! event queue, sleeps until the session's next debounce deadline, carries
//! out effects through the injected [`Capabilities`], and runs fetches and
//! resolutions as tasks that post their completion back onto the queue.
//! All state changes still happen one event at a time on the driver task.
//!
//! Snapshots go to the UI over a crossbeam channel, so any thread (the UI
//! thread included) can drain them without an async runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, info_span, instrument, trace, warn, Instrument};

use crate::announcement::FeedLoader;
use crate::capability::Capabilities;
use crate::catalog::CatalogLoader;
use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::types::SessionId;

use super::{Effect, SearchSession, SearchSessionState, SessionEvent};

/// What the UI receives.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionUpdate {
    /// A new snapshot; published only when something changed.
    State(SearchSessionState),
    /// Move keyboard focus to the search input.
    FocusInput,
    /// The session was torn down; no further updates follow.
    Closed,
}

enum Command {
    Event(SessionEvent),
    Shutdown,
}

/// Entry point for running sessions.
#[derive(Debug)]
pub struct SessionDriver;

impl SessionDriver {
    /// Mounts a session and runs it on a new tokio task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use byrdocs::{Capabilities, Config, HttpSource, SessionDriver, SessionEvent};
    ///
    /// # async fn run() -> byrdocs::Result<()> {
    /// let config = Config::default();
    /// let source = Arc::new(HttpSource::from_config(&config)?);
    /// let handle = SessionDriver::spawn(config, Capabilities::new(source), "?q=calculus")?;
    ///
    /// handle.send(SessionEvent::KeywordChanged("linear algebra".into()))?;
    /// for update in handle.updates().try_iter() {
    ///     println!("{:?}", update);
    /// }
    /// handle.shutdown();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(query = %initial_query))]
    pub fn spawn(
        config: Config,
        capabilities: Capabilities,
        initial_query: &str,
    ) -> Result<SessionHandle> {
        let width = capabilities.viewport.width();
        let (session, effects) =
            SearchSession::mount(config, initial_query, width, Arc::clone(&capabilities.flags))?;
        let id = session.id();

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = crossbeam_channel::unbounded();
        let closed = Arc::new(AtomicBool::new(false));

        let runner = Runner {
            session,
            capabilities,
            updates: updates_tx,
            tasks: JoinSet::new(),
            last_published: None,
        };
        let span = info_span!("session", session_id = %id);
        let task = tokio::spawn(runner.run(events_rx, effects).instrument(span));

        info!(session_id = %id, "Session driver started");

        Ok(SessionHandle {
            id,
            events: events_tx,
            updates: updates_rx,
            closed,
            task,
        })
    }
}

/// Handle to a running session.
///
/// Dropping every handle tears the session down, as does
/// [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    events: mpsc::UnboundedSender<Command>,
    updates: Receiver<SessionUpdate>,
    closed: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queues an event.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::SessionClosed`] once the session is torn down.
    pub fn send(&self, event: SessionEvent) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SearchError::SessionClosed);
        }
        self.events
            .send(Command::Event(event))
            .map_err(|_| SearchError::SessionClosed)
    }

    /// The channel snapshots and focus requests arrive on.
    pub fn updates(&self) -> &Receiver<SessionUpdate> {
        &self.updates
    }

    /// Tears the session down. Idempotent.
    ///
    /// Pending debounce windows are dropped and in-flight fetches and
    /// resolutions aborted; their results are never applied.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // The loop may already be gone if every event sender failed
        let _ = self.events.send(Command::Shutdown);
    }

    /// Waits for the driver task to finish.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            warn!(session_id = %self.id, error = %e, "Session task ended abnormally");
        }
    }

    /// The session id.
    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// True after [`shutdown`](Self::shutdown).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

struct Runner {
    session: SearchSession,
    capabilities: Capabilities,
    updates: Sender<SessionUpdate>,
    tasks: JoinSet<()>,
    last_published: Option<SearchSessionState>,
}

impl Runner {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<Command>,
        initial: Vec<Effect>,
    ) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<SessionEvent>();

        self.apply(initial, &done_tx);
        self.publish();

        loop {
            let deadline = self.session.next_deadline();

            tokio::select! {
                command = events.recv() => {
                    let Some(Command::Event(event)) = command else { break };
                    let effects = self.session.handle(event, Instant::now());
                    self.apply(effects, &done_tx);
                }
                Some(event) = done_rx.recv() => {
                    let effects = self.session.handle(event, Instant::now());
                    self.apply(effects, &done_tx);
                }
                _ = async {
                    if let Some(deadline) = deadline {
                        tokio::time::sleep_until(deadline).await;
                    }
                }, if deadline.is_some() => {
                    let effects = self.session.tick(Instant::now());
                    self.apply(effects, &done_tx);
                }
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    if let Err(e) = joined {
                        warn!(error = %e, "Session task failed");
                    }
                }
            }

            self.publish();
        }

        self.tasks.shutdown().await;
        self.session.close();
        self.publish();
        let _ = self.updates.send(SessionUpdate::Closed);
        debug!("Session driver stopped");
    }

    fn apply(&mut self, effects: Vec<Effect>, done: &mpsc::UnboundedSender<SessionEvent>) {
        for effect in effects {
            match effect {
                Effect::ReplaceUrl(query) => self.capabilities.navigator.replace_query(&query),
                Effect::FocusInput => {
                    let _ = self.updates.send(SessionUpdate::FocusInput);
                }
                Effect::Notify(notice) => self.capabilities.notifier.notify(notice),
                Effect::Layout(change) => self.capabilities.layout.layout_changed(change),
                Effect::LoadCatalog => {
                    let loader = CatalogLoader::new(self.session.config());
                    let source = Arc::clone(&self.capabilities.source);
                    let done = done.clone();
                    self.tasks.spawn(async move {
                        let result = loader.load(source.as_ref()).await;
                        let _ = done.send(SessionEvent::CatalogLoaded(result));
                    });
                }
                Effect::LoadAnnouncements => {
                    let loader = FeedLoader::new(self.session.config());
                    let source = Arc::clone(&self.capabilities.source);
                    let done = done.clone();
                    self.tasks.spawn(async move {
                        let result = loader.load(source.as_ref()).await;
                        let _ = done.send(SessionEvent::AnnouncementsLoaded(result));
                    });
                }
                Effect::Resolve(ticket) => {
                    let catalog = self.session.catalog().clone();
                    let resolver = Arc::clone(&self.capabilities.resolver);
                    let done = done.clone();
                    trace!(generation = ticket.generation, "Spawning resolution");
                    self.tasks.spawn(async move {
                        let results =
                            resolver.search(catalog.documents(), &ticket.keyword, ticket.category);
                        let _ = done.send(SessionEvent::ResolutionCompleted { ticket, results });
                    });
                }
            }
        }
    }

    fn publish(&mut self) {
        let state = self.session.state();
        if self.last_published.as_ref() == Some(&state) {
            return;
        }
        // A dropped receiver just means nobody is rendering
        let _ = self.updates.send(SessionUpdate::State(state.clone()));
        self.last_published = Some(state);
    }
}
