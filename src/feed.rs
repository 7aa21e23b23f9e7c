//! Paginated feed: accumulates pages of results for the current query.
//!
//! A [`PagedFeed`] is a single tokio task that owns a [`FeedState`] and
//! publishes every change through a `watch` channel. Two inputs drive it:
//!
//! - the **query** (`watch::Receiver<String>`): every changed value starts
//!   over from page 1 and cancels whatever was in flight for the previous
//!   query (switch semantics);
//! - **next-page requests** from the [`FeedHandle`]: ignored while another
//!   next page is loading, while page 1 is still loading, or once the last
//!   page has arrived (exhaust semantics).
//!
//! ```text
//!   query ──changed──▶ ┌────────┐ ──spawn(gen, page 1)──▶ fetch task ─┐
//!   handle ─NextPage─▶ │ driver │ ──spawn(gen, page n)──▶ fetch task ─┤
//!                      └────────┘ ◀──────── Outcome { gen, .. } ───────┘
//!                          │
//!                          └──publish──▶ watch::Receiver<FeedState>
//! ```
//!
//! Fetch tasks are aborted when superseded; outcomes still carry the
//! generation they were started under and anything older than the current
//! generation is discarded when it arrives. Fetch errors are recorded in the
//! state and never stop the driver. Dropping the handle stops it.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::rest::QueryError;

/// One page of results as returned by a [`PageSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Where a feed gets its pages from.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Fetch page `page` (1-based) of the results for `query`.
    async fn fetch_page(&self, query: &str, page: u32)
    -> Result<PageResult<Self::Item>, QueryError>;
}

/// Accumulated results and pagination state for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState<T> {
    pub query: String,
    pub items: Vec<T>,
    pub total_pages: u32,
    /// Last page applied; 0 before page 1 arrives.
    pub current_page: u32,
    pub initial_loading: bool,
    pub has_more: bool,
    pub loading_more: bool,
    /// Message of the last failed fetch for this query.
    pub error: Option<String>,
}

impl<T> FeedState<T> {
    /// Fresh state for a query whose first page is about to be fetched.
    pub fn loading(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            items: Vec::new(),
            total_pages: 1,
            current_page: 0,
            initial_loading: true,
            has_more: true,
            loading_more: false,
            error: None,
        }
    }

    /// Loaded successfully with nothing to show.
    pub fn is_empty_result(&self) -> bool {
        !self.initial_loading && self.error.is_none() && self.items.is_empty()
    }

    /// No fetch in flight.
    pub fn is_settled(&self) -> bool {
        !self.initial_loading && !self.loading_more
    }
}

#[derive(Debug)]
enum FeedCommand {
    NextPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Initial,
    Next,
}

struct Outcome<T> {
    generation: u64,
    kind: FetchKind,
    result: Result<PageResult<T>, QueryError>,
}

/// Control and observation handle for a running feed.
///
/// Dropping the handle stops the driver and aborts in-flight fetches.
pub struct FeedHandle<T> {
    state: watch::Receiver<FeedState<T>>,
    commands: mpsc::UnboundedSender<FeedCommand>,
    task: JoinHandle<()>,
}

impl<T: Clone> FeedHandle<T> {
    /// Ask for the page after the last one applied.
    pub fn request_next_page(&self) {
        // The driver only goes away with the handle, so a failed send can't be observed.
        let _ = self.commands.send(FeedCommand::NextPage);
    }

    /// Snapshot of the latest published state.
    pub fn state(&self) -> FeedState<T> {
        self.state.borrow().clone()
    }

    /// A receiver that sees every state published from now on.
    pub fn subscribe(&self) -> watch::Receiver<FeedState<T>> {
        self.state.clone()
    }

    /// Wait until the published state satisfies `predicate`.
    ///
    /// Returns `None` if the driver stopped first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&FeedState<T>) -> bool,
    ) -> Option<FeedState<T>> {
        self.state
            .wait_for(predicate)
            .await
            .ok()
            .map(|state| state.clone())
    }

    /// Stop the driver and wait for it to finish.
    pub async fn shutdown(self) {
        let Self {
            state: _,
            commands,
            task,
        } = self;
        drop(commands);
        let _ = task.await;
    }
}

/// Entry point for spawning feeds.
pub struct PagedFeed;

impl PagedFeed {
    /// Start a feed over `source`, following `query`.
    ///
    /// Page 1 of the query's current value is fetched right away. Must be
    /// called from within a tokio runtime.
    pub fn spawn<S: PageSource>(
        source: Arc<S>,
        query: watch::Receiver<String>,
    ) -> FeedHandle<S::Item> {
        let initial = query.borrow().clone();
        let (state_tx, state_rx) = watch::channel(FeedState::loading(initial));
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            source,
            state: FeedState::loading(String::new()),
            publisher: state_tx,
            generation: 0,
            in_flight: Vec::new(),
            outcomes: outcome_tx,
        };
        let task = tokio::spawn(driver.run(query, command_rx, outcome_rx));

        FeedHandle {
            state: state_rx,
            commands: command_tx,
            task,
        }
    }
}

struct Driver<S: PageSource> {
    source: Arc<S>,
    state: FeedState<S::Item>,
    publisher: watch::Sender<FeedState<S::Item>>,
    generation: u64,
    in_flight: Vec<JoinHandle<()>>,
    outcomes: mpsc::UnboundedSender<Outcome<S::Item>>,
}

impl<S: PageSource> Driver<S> {
    async fn run(
        mut self,
        mut query: watch::Receiver<String>,
        mut commands: mpsc::UnboundedReceiver<FeedCommand>,
        mut outcomes: mpsc::UnboundedReceiver<Outcome<S::Item>>,
    ) {
        let initial = query.borrow_and_update().clone();
        self.switch_query(initial);

        let mut query_open = true;
        loop {
            tokio::select! {
                changed = query.changed(), if query_open => {
                    if changed.is_err() {
                        tracing::debug!("query source closed; keeping current query");
                        query_open = false;
                        continue;
                    }
                    let next = query.borrow_and_update().clone();
                    if next == self.state.query {
                        tracing::debug!(query = %next, "query unchanged");
                    } else {
                        self.switch_query(next);
                    }
                }
                command = commands.recv() => match command {
                    Some(FeedCommand::NextPage) => self.next_page(),
                    None => break,
                },
                Some(outcome) = outcomes.recv() => self.apply(outcome),
            }
        }

        self.abort_in_flight();
        tracing::debug!("feed stopped");
    }

    fn switch_query(&mut self, query: String) {
        self.generation += 1;
        self.abort_in_flight();
        tracing::debug!(%query, generation = self.generation, "switching query");
        self.state = FeedState::loading(query.clone());
        self.publish();
        self.start_fetch(FetchKind::Initial, query, 1);
    }

    fn next_page(&mut self) {
        if self.state.initial_loading {
            tracing::debug!("next page dropped: first page still loading");
            return;
        }
        if self.state.loading_more {
            tracing::debug!("next page dropped: already loading");
            return;
        }
        if !self.state.has_more {
            tracing::debug!("next page dropped: no more pages");
            return;
        }
        let page = self.state.current_page + 1;
        self.state.loading_more = true;
        self.state.error = None;
        self.publish();
        self.start_fetch(FetchKind::Next, self.state.query.clone(), page);
    }

    fn start_fetch(&mut self, kind: FetchKind, query: String, page: u32) {
        let source = Arc::clone(&self.source);
        let outcomes = self.outcomes.clone();
        let generation = self.generation;
        tracing::debug!(%query, page, ?kind, "fetching page");
        self.in_flight.retain(|task| !task.is_finished());
        self.in_flight.push(tokio::spawn(async move {
            let result = source.fetch_page(&query, page).await;
            let _ = outcomes.send(Outcome {
                generation,
                kind,
                result,
            });
        }));
    }

    fn apply(&mut self, outcome: Outcome<S::Item>) {
        if outcome.generation != self.generation {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "discarding stale page"
            );
            return;
        }

        let state = &mut self.state;
        match (outcome.kind, outcome.result) {
            (FetchKind::Initial, Ok(page)) => {
                state.items = page.items;
                state.current_page = page.current_page;
                state.total_pages = page.total_pages;
                state.has_more = page.current_page < page.total_pages;
                state.initial_loading = false;
                state.error = None;
            }
            (FetchKind::Initial, Err(e)) => {
                tracing::warn!(query = %state.query, error = %e, "first page failed");
                state.initial_loading = false;
                state.has_more = false;
                state.error = Some(e.to_string());
            }
            (FetchKind::Next, Ok(page)) => {
                state.items.extend(page.items);
                state.current_page = page.current_page;
                state.total_pages = page.total_pages;
                state.has_more = page.current_page < page.total_pages;
                state.loading_more = false;
            }
            (FetchKind::Next, Err(e)) => {
                tracing::warn!(query = %state.query, error = %e, "next page failed");
                state.loading_more = false;
                state.error = Some(e.to_string());
            }
        }
        self.publish();
    }

    fn publish(&self) {
        self.publisher.send_replace(self.state.clone());
    }

    fn abort_in_flight(&mut self) {
        for task in self.in_flight.drain(..) {
            task.abort();
        }
    }
}
