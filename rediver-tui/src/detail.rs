//! Single-entity detail state for the agent and job pages.

use crate::fetch::{FetchMode, FetchOutcome, FetchTicket, Generation};
use rediver_client::ApiClientError;
use rediver_core::EntityId;

#[derive(Debug)]
pub struct DetailState<T> {
    id: Option<EntityId>,
    pub item: Option<T>,
    pub loading: bool,
    pub refreshing: bool,
    /// Set when the first load failed and there is nothing to show.
    pub error: Option<String>,
    generation: Generation,
}

impl<T> Default for DetailState<T> {
    fn default() -> Self {
        Self {
            id: None,
            item: None,
            loading: false,
            refreshing: false,
            error: None,
            generation: Generation::default(),
        }
    }
}

impl<T> DetailState<T> {
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Point at `id`. Switching entities drops whatever was shown before.
    pub fn open(&mut self, id: EntityId) {
        if self.id != Some(id) {
            self.item = None;
            self.error = None;
        }
        self.id = Some(id);
    }

    pub fn begin_fetch(&mut self, mode: FetchMode) -> Option<(EntityId, FetchTicket)> {
        let id = self.id?;
        match mode {
            FetchMode::Load => self.loading = true,
            FetchMode::Refresh => self.refreshing = true,
            FetchMode::Background => {}
        }
        Some((id, self.generation.issue(mode)))
    }

    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<T, ApiClientError>,
    ) -> FetchOutcome {
        if !self.generation.is_current(ticket) {
            tracing::debug!("discarding stale detail response");
            return FetchOutcome::Stale;
        }
        self.loading = false;
        self.refreshing = false;
        match result {
            Ok(item) => {
                self.item = Some(item);
                self.error = None;
                FetchOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "detail fetch failed");
                if self.item.is_none() {
                    self.error = Some(err.message().to_string());
                }
                FetchOutcome::Failed(err)
            }
        }
    }

    pub fn close(&mut self) {
        self.generation.invalidate();
        self.id = None;
        self.item = None;
        self.error = None;
        self.loading = false;
        self.refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_after_success_keeps_item() {
        let mut detail = DetailState::<u32>::default();
        detail.open(EntityId::nil());
        let (_, ticket) = detail.begin_fetch(FetchMode::Load).unwrap();
        detail.finish_fetch(ticket, Ok(7));

        let (_, ticket) = detail.begin_fetch(FetchMode::Background).unwrap();
        let outcome = detail.finish_fetch(ticket, Err(ApiClientError::transport("timeout")));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(detail.item, Some(7));
        assert!(detail.error.is_none());
    }

    #[test]
    fn test_result_after_close_is_stale() {
        let mut detail = DetailState::<u32>::default();
        detail.open(EntityId::nil());
        let (_, ticket) = detail.begin_fetch(FetchMode::Load).unwrap();
        detail.close();
        assert!(matches!(detail.finish_fetch(ticket, Ok(1)), FetchOutcome::Stale));
        assert!(detail.item.is_none());
    }

    #[test]
    fn test_no_fetch_without_id() {
        let mut detail = DetailState::<u32>::default();
        assert!(detail.begin_fetch(FetchMode::Load).is_none());
    }
}
