//! Generic paginated list controller
//!
//! `PagedResourceList` owns the query state, the last page of rows, the load
//! state and the notice banner of one list screen. Requests are queued as
//! futures and only make progress while the owner awaits `next_update`, so the
//! controller never spawns tasks and dropping it cancels everything in flight.
//!
//! Every fetch is tagged with a sequence number. A completion whose number is
//! below the latest issued one belongs to a superseded query and is discarded.

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::models::{ActionKind, LoadState, ResourcePage, ResourceQuery, RowAction};
use crate::pagination::{self, PageWindow};
use crate::resources::{ActionEffect, ActionPlan, Record, Resource, SearchMode};
use crate::source::ResourceSource;
use crate::status::{Notice, NoticeBoard};

/// Finished request waiting to be applied to the list state
enum Completion<T> {
    Fetched {
        seq: u64,
        result: Result<ResourcePage<T>, ApiError>,
    },
    Acted {
        action: RowAction,
        effect: ActionEffect,
        result: Result<(), ApiError>,
    },
}

/// Result of dispatching a row action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Mutation queued; the outcome arrives through `next_update`
    Pending,
    /// Presentation layer should open this route
    Navigate(String),
    /// Not supported by the resource; an error notice was posted
    Rejected,
}

/// What `next_update` applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Loaded,
    /// The page fell outside the reported total; a clamped fetch was issued
    Refetching,
    LoadFailed(String),
    /// Response of a superseded fetch, dropped
    Stale,
    ActionSucceeded(RowAction),
    ActionFailed(RowAction, String),
}

pub struct PagedResourceList<R: Resource> {
    resource: Arc<R>,
    source: Arc<dyn ResourceSource<R::Row>>,
    query: ResourceQuery,
    page: ResourcePage<R::Row>,
    state: LoadState,
    notices: NoticeBoard,
    pending: FuturesUnordered<BoxFuture<'static, Completion<R::Row>>>,
    latest_seq: u64,
    has_loaded: bool,
    disposed: bool,
}

impl<R: Resource> PagedResourceList<R> {
    /// The resource's own page size wins over `default_page_size`
    pub fn new(
        resource: Arc<R>,
        source: Arc<dyn ResourceSource<R::Row>>,
        default_page_size: u32,
        notice_ttl: Duration,
    ) -> Self {
        let page_size = resource.page_size().unwrap_or(default_page_size);
        Self {
            resource,
            source,
            query: ResourceQuery::new(page_size),
            page: ResourcePage::empty(page_size),
            state: LoadState::Idle,
            notices: NoticeBoard::new(notice_ttl),
            pending: FuturesUnordered::new(),
            latest_seq: 0,
            has_loaded: false,
            disposed: false,
        }
    }

    /// Initial search term, applied by the first fetch
    pub fn with_search(mut self, term: &str) -> Self {
        self.query.search = term.to_string();
        self
    }

    /// Initial filter value, applied by the first fetch
    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.query.set_filter(key, value);
        self
    }

    /// Explicit page size, overriding the resource's own
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.query.page_size = page_size.max(1);
        self.page.page_size = self.query.page_size;
        self
    }

    /// Initial page; checked against the total once the first page arrives
    pub fn starting_at(mut self, page: u32) -> Self {
        self.query.page = page.max(1);
        self
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn query(&self) -> &ResourceQuery {
        &self.query
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn page(&self) -> &ResourcePage<R::Row> {
        &self.page
    }

    pub fn current_page(&self) -> u32 {
        self.query.page
    }

    pub fn total_count(&self) -> u64 {
        self.page.total_count
    }

    pub fn total_pages(&self) -> u32 {
        pagination::total_pages(self.page.total_count, self.query.page_size)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.query.page, self.total_pages())
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    /// Drop an expired success notice; true when the banner changed
    pub fn prune_notice(&mut self) -> bool {
        self.notices.prune()
    }

    pub fn clear_notice(&mut self) {
        self.notices.clear();
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Rows to display: the visibility rule and any local search applied
    pub fn visible_rows(&self) -> Vec<&R::Row> {
        let local_term = match self.resource.search_mode() {
            SearchMode::Local => Some(self.query.search.trim()).filter(|t| !t.is_empty()),
            _ => None,
        };
        self.page
            .rows
            .iter()
            .filter(|row| self.resource.is_visible(row))
            .filter(|row| local_term.map_or(true, |term| row.matches_search(term)))
            .collect()
    }

    /// Serial number shown next to the visible row at `index`
    pub fn row_number(&self, index: usize) -> u64 {
        (self.query.page as u64 - 1) * self.query.page_size as u64 + index as u64 + 1
    }

    pub fn find_row(&self, id: &str) -> Option<&R::Row> {
        self.page.rows.iter().find(|row| row.id() == id)
    }

    /// Issue the first fetch when the screen appears
    pub fn mount(&mut self) {
        if self.state == LoadState::Idle {
            self.fetch();
        }
    }

    /// Update the search term and restart from the first page
    pub fn set_search(&mut self, term: &str) {
        self.query.search = term.to_string();
        self.query.page = 1;
        self.fetch();
    }

    /// Update one filter (empty removes it) and restart from the first page
    pub fn set_filter(&mut self, key: &str, value: &str) {
        self.query.set_filter(key, value);
        self.query.page = 1;
        self.fetch();
    }

    /// Move to page `n`, clamped to the known page range; true if a fetch was issued
    pub fn set_page(&mut self, n: i64) -> bool {
        let target = pagination::clamp_page(n, self.total_pages());
        if target == self.query.page {
            return false;
        }
        self.query.page = target;
        self.fetch();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.query.page as i64 + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.set_page(self.query.page as i64 - 1)
    }

    pub fn first_page(&mut self) -> bool {
        self.set_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.set_page(self.total_pages() as i64)
    }

    /// Re-fetch the current query without resetting the page
    pub fn refresh(&mut self) {
        self.fetch();
    }

    /// Queue a fetch of the current query, superseding earlier ones
    pub fn fetch(&mut self) {
        if self.disposed {
            return;
        }
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let source = Arc::clone(&self.source);
        let query = self.query.clone();
        debug!(
            "Fetching {} page {} (seq {})",
            self.resource.name(),
            query.page,
            seq
        );

        self.state = LoadState::Loading;
        self.pending.push(
            async move {
                let result = source.fetch_page(&query).await;
                Completion::Fetched { seq, result }
            }
            .boxed(),
        );
    }

    /// Resolve a row action through the resource descriptor
    pub fn perform_action(&mut self, action: RowAction) -> Dispatch {
        if self.disposed {
            return Dispatch::Rejected;
        }
        match self.resource.plan(&action) {
            None => {
                warn!(
                    "{} does not support {} ({})",
                    self.resource.name(),
                    action.kind.as_str(),
                    action.id
                );
                self.notices.post(Notice::error(format!(
                    "{} is not available for {}",
                    capitalize(action.kind.as_str()),
                    self.resource.title()
                )));
                Dispatch::Rejected
            }
            Some(ActionPlan::Navigate(route)) => Dispatch::Navigate(route),
            Some(ActionPlan::Mutate(request)) => {
                info!(
                    "{} {} {} via {} {}",
                    capitalize(action.kind.as_str()),
                    self.resource.name(),
                    action.id,
                    request.method,
                    request.path
                );
                let source = Arc::clone(&self.source);
                self.pending.push(
                    async move {
                        let result = source.execute(&request).await;
                        Completion::Acted {
                            action,
                            effect: request.effect,
                            result,
                        }
                    }
                    .boxed(),
                );
                Dispatch::Pending
            }
        }
    }

    /// Wait for the next queued request and apply it; `None` when idle
    pub async fn next_update(&mut self) -> Option<ListEvent> {
        let completion = self.pending.next().await?;
        Some(self.apply(completion))
    }

    /// Apply every queued request, including follow-up fetches
    pub async fn settle(&mut self) -> Vec<ListEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_update().await {
            events.push(event);
        }
        events
    }

    /// Drop all in-flight requests; the list ignores further commands
    pub fn dispose(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                "Cancelling {} pending {} requests",
                self.pending.len(),
                self.resource.name()
            );
        }
        self.pending = FuturesUnordered::new();
        self.disposed = true;
    }

    fn apply(&mut self, completion: Completion<R::Row>) -> ListEvent {
        match completion {
            Completion::Fetched { seq, result } => self.apply_fetch(seq, result),
            Completion::Acted {
                action,
                effect,
                result,
            } => self.apply_action(action, effect, result),
        }
    }

    fn apply_fetch(&mut self, seq: u64, result: Result<ResourcePage<R::Row>, ApiError>) -> ListEvent {
        if seq < self.latest_seq {
            debug!(
                "Discarding stale {} response (seq {} < {})",
                self.resource.name(),
                seq,
                self.latest_seq
            );
            return ListEvent::Stale;
        }

        match result {
            Ok(page) => {
                self.page = page;
                self.has_loaded = true;
                self.state = LoadState::Loaded;
                if self.clamp_to_total() {
                    return ListEvent::Refetching;
                }
                ListEvent::Loaded
            }
            Err(e) => {
                let reason = e.user_message();
                warn!("Failed to load {}: {}", self.resource.name(), e);
                // Page number follows the rows still on screen
                if self.has_loaded {
                    self.query.page = self.page.page;
                }
                self.state = LoadState::Failed(reason.clone());
                ListEvent::LoadFailed(reason)
            }
        }
    }

    fn apply_action(
        &mut self,
        action: RowAction,
        effect: ActionEffect,
        result: Result<(), ApiError>,
    ) -> ListEvent {
        if let Err(e) = result {
            let reason = e.user_message();
            warn!(
                "{} {} failed: {}",
                capitalize(action.kind.as_str()),
                action.id,
                e
            );
            self.notices.post(Notice::error(format!(
                "{} failed: {}",
                capitalize(action.kind.as_str()),
                reason
            )));
            return ListEvent::ActionFailed(action, reason);
        }

        match effect {
            ActionEffect::Remove => {
                let before = self.page.rows.len();
                self.page.rows.retain(|row| row.id() != action.id);
                if self.page.rows.len() < before {
                    self.page.total_count = self.page.total_count.saturating_sub(1);
                }
                self.clamp_to_total();
            }
            ActionEffect::SetStatus(status) => {
                if let Some(row) = self.page.rows.iter_mut().find(|row| row.id() == action.id) {
                    row.set_status(status);
                }
            }
            ActionEffect::Refresh => self.fetch(),
        }

        self.notices.post(Notice::success(success_message(action.kind)));
        ListEvent::ActionSucceeded(action)
    }

    // Keeps `page` inside the range implied by `total_count`
    fn clamp_to_total(&mut self) -> bool {
        let total_pages = self.total_pages();
        if self.query.page <= total_pages {
            return false;
        }
        debug!(
            "Page {} beyond {} pages of {}, clamping",
            self.query.page,
            total_pages,
            self.resource.name()
        );
        self.query.page = total_pages;
        self.fetch();
        true
    }
}

fn success_message(kind: ActionKind) -> String {
    match kind {
        ActionKind::Delete => "Deleted successfully",
        ActionKind::Approve => "Approved successfully",
        ActionKind::Reject => "Rejected successfully",
        ActionKind::MarkPaid => "Marked as paid",
        ActionKind::Edit | ActionKind::ViewDetail => "Done",
    }
    .to_string()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
