//! Paginated list pages.
//!
//! A [`ListPage`] owns the rows, cursor, filter and selection for one
//! resource. Fetches run as spawned tasks and report back through the event
//! channel; [`ListPage::finish_fetch`] applies a result only when it carries
//! the latest ticket. A failed fetch leaves the previous rows on screen.

use crate::events::TuiEvent;
use crate::fetch::{FetchMode, FetchOutcome, FetchTicket, Generation};
use async_trait::async_trait;
use rediver_client::{ApiClient, ApiClientError};
use rediver_core::{Entity, EntityId, Page, Pagination};
use tokio::sync::mpsc;

/// Filter and cursor for one list call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub filter: F,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Cycled through a fixed vocabulary.
    Choice,
    /// Typed in a prompt.
    Text,
}

/// One filter as shown in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub label: &'static str,
    pub value: Option<String>,
    pub kind: FilterKind,
}

impl FilterField {
    pub fn choice(label: &'static str, value: Option<impl ToString>) -> Self {
        Self {
            label,
            value: value.map(|v| v.to_string()),
            kind: FilterKind::Choice,
        }
    }

    pub fn text(label: &'static str, value: Option<&str>) -> Self {
        Self {
            label,
            value: value.map(str::to_string),
            kind: FilterKind::Text,
        }
    }
}

/// A listable admin resource.
#[async_trait]
pub trait ListResource: Clone + Send + Sync + 'static {
    type Item: Entity + Clone + Send + 'static;
    type Filter: Clone + Default + PartialEq + Send + Sync + 'static;

    /// Lowercase plural used in notifications and logs.
    fn label(&self) -> &'static str;

    fn per_page(&self) -> u32;

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<Self::Filter>,
    ) -> Result<Page<Self::Item>, ApiClientError>;

    /// Wrap a finished fetch for the event loop.
    fn loaded(
        &self,
        ticket: FetchTicket,
        result: Result<Page<Self::Item>, ApiClientError>,
    ) -> TuiEvent;

    fn filter_fields(&self, _filter: &Self::Filter) -> Vec<FilterField> {
        Vec::new()
    }

    /// Advance a choice filter to its next value.
    fn cycle_filter(&self, _filter: &mut Self::Filter, _index: usize) {}

    fn set_text_filter(&self, _filter: &mut Self::Filter, _index: usize, _value: Option<String>) {}
}

pub struct ListPage<R: ListResource> {
    resource: R,
    pub items: Vec<R::Item>,
    pub pagination: Pagination,
    pub filter: R::Filter,
    pub selected: Option<EntityId>,
    pub loading: bool,
    pub refreshing: bool,
    /// Message of the last failed fetch, cleared by the next success.
    pub last_error: Option<String>,
    filter_focus: usize,
    generation: Generation,
}

impl<R: ListResource> ListPage<R> {
    pub fn new(resource: R) -> Self {
        let per_page = resource.per_page();
        Self {
            resource,
            items: Vec::new(),
            pagination: Pagination::new(per_page),
            filter: R::Filter::default(),
            selected: None,
            loading: false,
            refreshing: false,
            last_error: None,
            filter_focus: 0,
            generation: Generation::default(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn label(&self) -> &'static str {
        self.resource.label()
    }

    pub fn query(&self) -> ListQuery<R::Filter> {
        ListQuery {
            filter: self.filter.clone(),
            page: self.pagination.page(),
            per_page: self.pagination.per_page(),
        }
    }

    // ========================================================================
    // FETCHING
    // ========================================================================

    pub fn begin_fetch(&mut self, mode: FetchMode) -> FetchTicket {
        match mode {
            FetchMode::Load => self.loading = true,
            FetchMode::Refresh => self.refreshing = true,
            FetchMode::Background => {}
        }
        self.generation.issue(mode)
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page<R::Item>, ApiClientError>,
    ) -> FetchOutcome {
        if !self.generation.is_current(ticket) {
            tracing::debug!(
                resource = self.label(),
                generation = ticket.generation(),
                "discarding stale list response"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        self.refreshing = false;

        match result {
            Ok(page) => {
                self.items = page.data;
                self.pagination.set_total(page.total);
                self.last_error = None;
                self.reconcile_selection();
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(resource = self.label(), error = %err, "list fetch failed");
                self.last_error = Some(err.message().to_string());
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Issue one list call for the current filter and page.
    pub fn fetch(
        &mut self,
        api: &ApiClient,
        events: &mpsc::Sender<TuiEvent>,
        mode: FetchMode,
    ) -> FetchTicket {
        let ticket = self.begin_fetch(mode);
        let query = self.query();
        let resource = self.resource.clone();
        let api = api.clone();
        let events = events.clone();
        tokio::spawn(async move {
            let result = resource.fetch(&api, &query).await;
            let _ = events.send(resource.loaded(ticket, result)).await;
        });
        ticket
    }

    /// Drop any in-flight result, e.g. when the view unmounts.
    pub fn cancel_pending(&mut self) {
        self.generation.invalidate();
        self.loading = false;
        self.refreshing = false;
    }

    pub fn reset(&mut self) {
        self.cancel_pending();
        self.items.clear();
        self.pagination = Pagination::new(self.resource.per_page());
        self.filter = R::Filter::default();
        self.selected = None;
        self.last_error = None;
        self.filter_focus = 0;
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    pub fn go_to_page(&mut self, requested: i64) -> bool {
        self.pagination.go_to(requested)
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.prev()
    }

    pub fn first_page(&mut self) -> bool {
        self.pagination.go_to(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.pagination.go_to(i64::from(self.pagination.total_pages()))
    }

    /// Pull the cursor back inside the reported total, e.g. after the last
    /// row of the last page was deleted. True when the page moved.
    pub fn clamp_to_total(&mut self) -> bool {
        let page = i64::from(self.pagination.page());
        self.pagination.go_to(page)
    }

    // ========================================================================
    // FILTERS
    // ========================================================================

    pub fn filter_fields(&self) -> Vec<FilterField> {
        self.resource.filter_fields(&self.filter)
    }

    pub fn filter_focus(&self) -> usize {
        self.filter_focus
    }

    pub fn focused_filter(&self) -> Option<FilterField> {
        self.filter_fields().into_iter().nth(self.filter_focus)
    }

    pub fn focus_next_filter(&mut self) {
        let count = self.filter_fields().len();
        if count > 0 {
            self.filter_focus = (self.filter_focus + 1) % count;
        }
    }

    /// Replace the filter; a change always returns to page 1.
    pub fn set_filter(&mut self, filter: R::Filter) -> bool {
        if filter == self.filter {
            return false;
        }
        self.filter = filter;
        self.pagination.reset();
        true
    }

    pub fn cycle_focused_filter(&mut self) -> bool {
        let mut filter = self.filter.clone();
        self.resource.cycle_filter(&mut filter, self.filter_focus);
        self.set_filter(filter)
    }

    pub fn set_focused_text(&mut self, value: Option<String>) -> bool {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let mut filter = self.filter.clone();
        self.resource
            .set_text_filter(&mut filter, self.filter_focus, value);
        self.set_filter(filter)
    }

    pub fn clear_filters(&mut self) -> bool {
        self.set_filter(R::Filter::default())
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    pub fn select_next(&mut self) {
        select_next_id(&self.items, &mut self.selected);
    }

    pub fn select_previous(&mut self) {
        select_prev_id(&self.items, &mut self.selected);
    }

    pub fn selected_item(&self) -> Option<&R::Item> {
        let id = self.selected?;
        self.items.iter().find(|item| item.entity_id() == id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.items.iter().position(|item| item.entity_id() == id)
    }

    fn reconcile_selection(&mut self) {
        if self.selected_index().is_none() {
            self.selected = self.items.first().map(|item| item.entity_id());
        }
    }
}

// ============================================================================
// TYPE-ERASED CONTROLS
// ============================================================================

/// The operations the event loop drives on whichever list is mounted.
pub trait ListControl {
    fn label(&self) -> &'static str;
    fn reload(
        &mut self,
        api: &ApiClient,
        events: &mpsc::Sender<TuiEvent>,
        mode: FetchMode,
    ) -> FetchTicket;
    fn cancel_pending(&mut self);
    fn reset(&mut self);
    fn next_page(&mut self) -> bool;
    fn prev_page(&mut self) -> bool;
    fn first_page(&mut self) -> bool;
    fn last_page(&mut self) -> bool;
    fn select_next(&mut self);
    fn select_previous(&mut self);
    fn focused_filter(&self) -> Option<FilterField>;
    fn focus_next_filter(&mut self);
    fn cycle_focused_filter(&mut self) -> bool;
    fn set_focused_text(&mut self, value: Option<String>) -> bool;
    fn clear_filters(&mut self) -> bool;
}

impl<R: ListResource> ListControl for ListPage<R> {
    fn label(&self) -> &'static str {
        ListPage::label(self)
    }

    fn reload(
        &mut self,
        api: &ApiClient,
        events: &mpsc::Sender<TuiEvent>,
        mode: FetchMode,
    ) -> FetchTicket {
        self.fetch(api, events, mode)
    }

    fn cancel_pending(&mut self) {
        ListPage::cancel_pending(self)
    }

    fn reset(&mut self) {
        ListPage::reset(self)
    }

    fn next_page(&mut self) -> bool {
        ListPage::next_page(self)
    }

    fn prev_page(&mut self) -> bool {
        ListPage::prev_page(self)
    }

    fn first_page(&mut self) -> bool {
        ListPage::first_page(self)
    }

    fn last_page(&mut self) -> bool {
        ListPage::last_page(self)
    }

    fn select_next(&mut self) {
        ListPage::select_next(self)
    }

    fn select_previous(&mut self) {
        ListPage::select_previous(self)
    }

    fn focused_filter(&self) -> Option<FilterField> {
        ListPage::focused_filter(self)
    }

    fn focus_next_filter(&mut self) {
        ListPage::focus_next_filter(self)
    }

    fn cycle_focused_filter(&mut self) -> bool {
        ListPage::cycle_focused_filter(self)
    }

    fn set_focused_text(&mut self, value: Option<String>) -> bool {
        ListPage::set_focused_text(self, value)
    }

    fn clear_filters(&mut self) -> bool {
        ListPage::clear_filters(self)
    }
}

fn select_next_id<T: Entity>(items: &[T], selected: &mut Option<EntityId>) {
    if items.is_empty() {
        *selected = None;
        return;
    }
    let next = selected
        .and_then(|id| items.iter().position(|item| item.entity_id() == id))
        .map(|index| (index + 1) % items.len())
        .unwrap_or(0);
    *selected = Some(items[next].entity_id());
}

fn select_prev_id<T: Entity>(items: &[T], selected: &mut Option<EntityId>) {
    if items.is_empty() {
        *selected = None;
        return;
    }
    let index = selected
        .and_then(|id| items.iter().position(|item| item.entity_id() == id))
        .unwrap_or(0);
    let prev = if index == 0 { items.len() - 1 } else { index - 1 };
    *selected = Some(items[prev].entity_id());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{AgentFilter, Agents};
    use rediver_core::{Agent, AgentHealth, AgentStatus};
    use uuid::Uuid;

    fn agent(name: &str) -> Agent {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": name,
            "status": "active",
            "created_at": "2026-03-01T12:00:00Z",
            "updated_at": "2026-03-01T12:00:00Z",
        }))
        .unwrap()
    }

    fn page_of(items: Vec<Agent>, total: u64) -> Page<Agent> {
        Page {
            data: items,
            total,
            page: 1,
            per_page: 20,
            total_pages: rediver_core::total_pages(total, 20),
        }
    }

    #[test]
    fn test_applies_latest_result_and_selects_first() {
        let mut list = ListPage::new(Agents);
        let ticket = list.begin_fetch(FetchMode::Load);
        assert!(list.loading);

        let rows = vec![agent("a"), agent("b")];
        let first = rows[0].id;
        let outcome = list.finish_fetch(ticket, Ok(page_of(rows, 45)));

        assert!(matches!(outcome, FetchOutcome::Applied));
        assert!(!list.loading);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.pagination.total_pages(), 3);
        assert_eq!(list.selected, Some(first));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut list = ListPage::new(Agents);
        let older = list.begin_fetch(FetchMode::Load);
        let newer = list.begin_fetch(FetchMode::Load);

        let fresh = vec![agent("fresh")];
        list.finish_fetch(newer, Ok(page_of(fresh, 1)));
        let outcome = list.finish_fetch(older, Ok(page_of(vec![agent("old"), agent("old2")], 2)));

        assert!(matches!(outcome, FetchOutcome::Stale));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].name, "fresh");
    }

    #[test]
    fn test_failure_keeps_previous_rows() {
        let mut list = ListPage::new(Agents);
        let ticket = list.begin_fetch(FetchMode::Load);
        list.finish_fetch(ticket, Ok(page_of(vec![agent("kept")], 1)));

        let ticket = list.begin_fetch(FetchMode::Refresh);
        assert!(list.refreshing);
        let outcome = list.finish_fetch(ticket, Err(ApiClientError::transport("connection refused")));

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(!list.refreshing);
        assert_eq!(list.items.len(), 1);
        assert!(list.last_error.is_some());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut list = ListPage::new(Agents);
        list.pagination.set_total(100);
        assert!(list.go_to_page(3));

        let changed = list.set_filter(AgentFilter {
            status: Some(AgentStatus::Disabled),
            health: None,
        });
        assert!(changed);
        assert_eq!(list.pagination.page(), 1);
        assert!(!list.set_filter(list.filter.clone()));
    }

    #[test]
    fn test_cycle_focused_filter_walks_vocabulary() {
        let mut list = ListPage::new(Agents);
        assert!(list.cycle_focused_filter());
        assert_eq!(list.filter.status, Some(AgentStatus::ALL[0]));

        list.focus_next_filter();
        assert!(list.cycle_focused_filter());
        assert_eq!(list.filter.health, Some(AgentHealth::ALL[0]));
    }

    #[test]
    fn test_page_navigation_clamps() {
        let mut list = ListPage::new(Agents);
        list.pagination.set_total(45);
        assert!(!list.prev_page());
        assert!(list.last_page());
        assert_eq!(list.pagination.page(), 3);
        assert!(!list.next_page());
        assert!(list.go_to_page(0));
        assert_eq!(list.pagination.page(), 1);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut list = ListPage::new(Agents);
        list.pagination.set_total(45);
        list.last_page();
        list.pagination.set_total(40);
        assert!(list.clamp_to_total());
        assert_eq!(list.pagination.page(), 2);
    }

    #[test]
    fn test_selection_wraps() {
        let mut list = ListPage::new(Agents);
        let ticket = list.begin_fetch(FetchMode::Load);
        list.finish_fetch(ticket, Ok(page_of(vec![agent("a"), agent("b")], 2)));

        list.select_next();
        assert_eq!(list.selected_index(), Some(1));
        list.select_next();
        assert_eq!(list.selected_index(), Some(0));
        list.select_previous();
        assert_eq!(list.selected_index(), Some(1));
    }
}
