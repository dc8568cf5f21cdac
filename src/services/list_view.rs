//! List view composer.
//!
//! Owns the state of one list screen: filters, search, paging, the current
//! page of rows, the detail overlay and the fetch generation. Every change
//! that affects the backend query is followed by a refetch; row actions
//! never edit the rows locally.

use crate::error::AppError;
use crate::models::{
    Decision, DispatchOutcome, FilterValue, ListQuery, ListResult, ListRow, RowActionRequest,
    StatusTransition, TotalCount,
};
use crate::services::api_client::Transport;
use crate::services::debounce::SearchDebouncer;
use crate::services::list_fetcher::{fetch_page, FetchTicket};
use crate::services::notifications::{Notice, Notifier};
use crate::services::pagination::PaginationController;
use crate::services::query_builder::build_query;
use crate::services::row_actions::RowActionDispatcher;
use crate::services::session::Session;
use crate::services::text::normalize_text;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// User-facing texts of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewMessages {
    pub title: String,
    pub empty: String,
    pub load_error: String,
    pub approved: String,
    pub rejected: String,
    pub action_error: String,
}

/// Static description of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpec {
    /// Collection path segment under the session scope (e.g. `companies`).
    pub entity: String,
    /// Key of the item array inside `data`.
    pub collection_key: String,
    /// Key every item is nested under, if any.
    pub item_wrapper: Option<String>,
    /// Status the view is pinned to.
    pub fixed_status: Option<String>,
    pub messages: ViewMessages,
}

/// What a view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ViewState {
    /// First fetch still running, nothing to show yet.
    Loading,
    /// No rows.
    Empty,
    /// Rows available; `faded` while a refetch is running.
    Ready { faded: bool },
}

/// Result of handing a fetch response to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCompletion {
    /// Rows replaced.
    Applied,
    /// Rows replaced, but the page was out of range and has been moved down.
    Reclamped,
    /// Fetch failed; rows cleared.
    Failed,
    /// A newer fetch was issued; response dropped.
    Stale,
}

/// One list screen over rows of type `T`.
pub struct ListView<T> {
    spec: ViewSpec,
    endpoint: String,
    query: ListQuery,
    pagination: PaginationController,
    search: SearchDebouncer,
    rows: Vec<T>,
    loading: bool,
    generation: u64,
    detail: Option<String>,
    transport: Arc<dyn Transport>,
    dispatcher: RowActionDispatcher,
    notifier: Arc<dyn Notifier>,
}

impl<T> ListView<T>
where
    T: ListRow + DeserializeOwned,
{
    /// Create a view for the session's scope.
    ///
    /// # Arguments
    /// * `spec` - Which collection to list and how
    /// * `session` - Logged-in account; decides the endpoint scope
    /// * `transport` - HTTP verbs
    /// * `notifier` - Sink for success and error notices
    pub fn new(
        spec: ViewSpec,
        session: &Session,
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AppError> {
        let endpoint = format!("{}/{}", session.scope_path()?, spec.entity);
        let query = match &spec.fixed_status {
            Some(status) => ListQuery::with_status(status.clone()),
            None => ListQuery::default(),
        };

        Ok(Self {
            spec,
            endpoint,
            query,
            pagination: PaginationController::default(),
            search: SearchDebouncer::default(),
            rows: Vec::new(),
            loading: false,
            generation: 0,
            detail: None,
            dispatcher: RowActionDispatcher::new(Arc::clone(&transport)),
            transport,
            notifier,
        })
    }

    /// Use a different search quiet period.
    pub fn with_search_debounce(mut self, quiet: Duration) -> Self {
        self.search = SearchDebouncer::new(quiet);
        self
    }

    /// Start with a different page size.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, AppError> {
        self.set_page_size(page_size)?;
        Ok(self)
    }

    pub fn spec(&self) -> &ViewSpec {
        &self.spec
    }

    /// Collection endpoint, e.g. `/linkers/7/companies`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn sync_paging(&mut self) {
        self.query.page = self.pagination.current_page();
        self.query.page_size = self.pagination.page_size();
    }

    // Search and filters

    /// Record typed search text. Nothing is fetched until [`Self::poll_search`]
    /// commits it.
    pub fn set_search_input(&mut self, text: impl Into<String>, now: Instant) {
        self.search.input(text, now);
    }

    /// Commit pending search text if the quiet period has passed.
    ///
    /// # Returns
    /// `true` when the search changed and page 1 should be fetched.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(text) => {
                log::debug!("Search committed for {}: '{}'", self.endpoint, text);
                self.query.search = text;
                self.pagination.reset();
                self.sync_paging();
                true
            }
            None => false,
        }
    }

    /// Apply search text right away, as when the field is submitted.
    pub fn commit_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        let now = Instant::now();
        self.search.input(text.clone(), now);
        self.search.poll(now + self.search.quiet_period());
        if self.query.search != text {
            self.query.search = text;
            self.pagination.reset();
            self.sync_paging();
        }
    }

    /// Deadline of the pending search, for timers.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Set a field filter and return to page 1.
    pub fn set_filter(&mut self, key: impl Into<String>, value: FilterValue) {
        self.query.filters.insert(key.into(), value);
        self.pagination.reset();
        self.sync_paging();
    }

    /// Remove a field filter and return to page 1.
    pub fn clear_filter(&mut self, key: &str) {
        if self.query.filters.remove(key).is_some() {
            self.pagination.reset();
            self.sync_paging();
        }
    }

    pub fn clear_filters(&mut self) {
        self.query.filters.clear();
        self.pagination.reset();
        self.sync_paging();
    }

    // Paging

    pub fn go_to_page(&mut self, page: u32) -> u32 {
        let page = self.pagination.go_to_page(page);
        self.sync_paging();
        page
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), AppError> {
        self.pagination.set_page_size(page_size)?;
        self.sync_paging();
        Ok(())
    }

    /// Select `page` before the total is known; the next fetch clamps it.
    pub fn seek_page(&mut self, page: u32) {
        self.pagination.seek(page);
        self.sync_paging();
    }

    pub fn first_page(&mut self) -> u32 {
        self.go_to_page(1)
    }

    pub fn previous_page(&mut self) -> u32 {
        let page = self.pagination.previous();
        self.sync_paging();
        page
    }

    pub fn next_page(&mut self) -> u32 {
        let page = self.pagination.next();
        self.sync_paging();
        page
    }

    pub fn last_page(&mut self) -> u32 {
        let page = self.pagination.last();
        self.sync_paging();
        page
    }

    // Fetching

    /// Issue a ticket for the current query. Tickets issued earlier become
    /// stale.
    pub fn begin_fetch(&mut self) -> Result<FetchTicket, AppError> {
        self.sync_paging();
        self.query.validate()?;

        self.generation += 1;
        self.loading = true;

        Ok(FetchTicket {
            generation: self.generation,
            endpoint: self.endpoint.clone(),
            params: build_query(&self.query),
            offset: self.query.offset(),
            page_size: self.query.page_size,
            collection_key: self.spec.collection_key.clone(),
            item_wrapper: self.spec.item_wrapper.clone(),
        })
    }

    /// Apply the response of `ticket` if it is still the latest fetch.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ListResult<T>, AppError>,
    ) -> FetchCompletion {
        if ticket.generation != self.generation {
            log::warn!(
                "Dropping stale response for {} (generation {}, latest {})",
                ticket.endpoint,
                ticket.generation,
                self.generation
            );
            return FetchCompletion::Stale;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                self.rows = page.items;
                if let Some(row_id) = &self.detail {
                    if !self.rows.iter().any(|row| row.row_id() == row_id) {
                        self.detail = None;
                    }
                }
                let moved = self.pagination.apply_total(page.total);
                self.sync_paging();
                if moved {
                    FetchCompletion::Reclamped
                } else {
                    FetchCompletion::Applied
                }
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", ticket.endpoint, e);
                self.rows.clear();
                self.detail = None;
                self.pagination.apply_total(TotalCount::Exact(0));
                self.sync_paging();
                self.notifier
                    .notify(Notice::error(self.spec.messages.load_error.clone()));
                FetchCompletion::Failed
            }
        }
    }

    /// Fetch the current page and apply it.
    ///
    /// When the page turns out to be past the end, the last page is fetched
    /// once more.
    pub async fn refresh(&mut self) -> FetchCompletion {
        let mut completion = self.fetch_once().await;
        if completion == FetchCompletion::Reclamped {
            completion = self.fetch_once().await;
        }
        completion
    }

    async fn fetch_once(&mut self) -> FetchCompletion {
        let ticket = match self.begin_fetch() {
            Ok(ticket) => ticket,
            Err(e) => {
                log::error!("Invalid query for {}: {}", self.endpoint, e);
                self.notifier
                    .notify(Notice::error(self.spec.messages.load_error.clone()));
                return FetchCompletion::Failed;
            }
        };
        let result = fetch_page::<T>(self.transport.as_ref(), &ticket).await;
        self.complete_fetch(&ticket, result)
    }

    pub fn view_state(&self) -> ViewState {
        match (self.rows.is_empty(), self.loading) {
            (true, true) => ViewState::Loading,
            (true, false) => ViewState::Empty,
            (false, faded) => ViewState::Ready { faded },
        }
    }

    /// Rows of the current page matching `local_filter`, ignoring case and
    /// accents. An empty filter keeps every row.
    pub fn visible_rows(&self, local_filter: &str) -> Vec<&T> {
        let needle = normalize_text(local_filter.trim());
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| row.search_text().contains(&needle))
            .collect()
    }

    // Detail overlay

    /// Open the detail overlay of a row on the current page.
    pub fn open_detail(&mut self, row_id: &str) -> bool {
        if self.rows.iter().any(|row| row.row_id() == row_id) {
            self.detail = Some(row_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail(&self) -> Option<&T> {
        let row_id = self.detail.as_deref()?;
        self.rows.iter().find(|row| row.row_id() == row_id)
    }

    // Row actions

    /// Whether a row's action controls should be enabled.
    pub fn can_act(&self, row_id: &str) -> bool {
        !self.dispatcher.is_in_flight(&self.endpoint, row_id)
    }

    /// Approve or reject a row, then refetch.
    ///
    /// # Returns
    /// `true` when the backend accepted the decision.
    pub async fn review_row(&mut self, request: &RowActionRequest) -> bool {
        let outcome = self.dispatcher.dispatch(&self.endpoint, request).await;
        let message = match request.decision {
            Decision::Approve => &self.spec.messages.approved,
            Decision::Reject => &self.spec.messages.rejected,
        };
        let message = message.clone();
        self.finish_action(outcome, message).await
    }

    /// Move a row to another status, then refetch.
    pub async fn transition_row(
        &mut self,
        transition: &StatusTransition,
        success_message: impl Into<String>,
    ) -> bool {
        let outcome = self.dispatcher.transition(&self.endpoint, transition).await;
        self.finish_action(outcome, success_message.into()).await
    }

    async fn finish_action(
        &mut self,
        outcome: Result<DispatchOutcome, AppError>,
        success_message: String,
    ) -> bool {
        match outcome {
            Ok(DispatchOutcome::InFlight) => false,
            Ok(_) => {
                self.close_detail();
                self.notifier.notify(Notice::success(success_message));
                self.refresh().await;
                true
            }
            Err(AppError::InvalidInput { field, message }) => {
                log::warn!("Row action on {} rejected: {}", self.endpoint, message);
                let text = match field.as_deref() {
                    Some("reason") => "Indica el motivo del rechazo.".to_string(),
                    _ => self.spec.messages.action_error.clone(),
                };
                self.notifier.notify(Notice::error(text));
                false
            }
            Err(e) => {
                log::error!("Row action on {} failed: {}", self.endpoint, e);
                self.notifier
                    .notify(Notice::error(self.spec.messages.action_error.clone()));
                false
            }
        }
    }
}
