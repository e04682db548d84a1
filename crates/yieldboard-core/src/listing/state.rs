// ── Listing state machine ──
//
// Pure transition logic: events in, fetch requests out. The async
// controller wraps this in a lock and performs the fetches.

use serde::Serialize;
use tracing::debug;

use crate::model::Identified;
use crate::normalize::ListResult;

/// Where the listing is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Errored { message: String },
}

/// Inputs that drive a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingEvent<F> {
    /// Initial load or explicit refresh.
    Load,
    /// The filter controls changed; nothing is fetched.
    PendingChanged(F),
    /// Promote the pending filters and go back to page 1.
    ApplyFilters,
    /// Drop every filter and go back to page 1.
    ClearFilters,
    PageChanged(u32),
    NextPage,
    PreviousPage,
}

/// Observable listing state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingState<T, F> {
    pub items: Vec<T>,
    pub total: u64,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    /// Bound to the filter controls.
    pub pending: F,
    /// Drives the fetch.
    pub applied: F,
    pub phase: Phase,
}

impl<T, F: Default> ListingState<T, F> {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: page_size.max(1),
            pending: F::default(),
            applied: F::default(),
            phase: Phase::Idle,
        }
    }
}

impl<T, F> ListingState<T, F> {
    /// Last page implied by the server-reported total (at least 1).
    pub fn last_page(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Errored { message } => Some(message),
            _ => None,
        }
    }
}

/// A fetch the controller must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest<F> {
    pub token: u64,
    pub page: u32,
    pub page_size: u32,
    pub filter: F,
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// The result (success or error) is now the listing state.
    Committed,
    /// Committed as an error, and the error was the session-expiry sentinel.
    SessionExpired,
    /// A newer fetch was initiated since; the result was dropped.
    Stale,
}

#[derive(Debug)]
pub(crate) struct ListingMachine<T, F> {
    state: ListingState<T, F>,
    latest_token: u64,
}

impl<T, F: Clone + Default + PartialEq> ListingMachine<T, F> {
    pub(crate) fn new(page_size: u32) -> Self {
        Self {
            state: ListingState::new(page_size),
            latest_token: 0,
        }
    }

    pub(crate) fn state(&self) -> &ListingState<T, F> {
        &self.state
    }

    /// Apply an event. Returns the fetch to perform, if the event calls
    /// for one.
    pub(crate) fn handle(&mut self, event: ListingEvent<F>) -> Option<FetchRequest<F>> {
        let state = &mut self.state;
        let fetch = match event {
            ListingEvent::Load => true,
            ListingEvent::PendingChanged(filter) => {
                state.pending = filter;
                false
            }
            ListingEvent::ApplyFilters => {
                state.applied = state.pending.clone();
                state.page = 1;
                true
            }
            ListingEvent::ClearFilters => {
                state.pending = F::default();
                state.applied = F::default();
                state.page = 1;
                true
            }
            ListingEvent::PageChanged(page) => {
                let page = page.max(1);
                if page == state.page {
                    false
                } else {
                    state.page = page;
                    true
                }
            }
            ListingEvent::NextPage => {
                if state.page < state.last_page() {
                    state.page += 1;
                    true
                } else {
                    false
                }
            }
            ListingEvent::PreviousPage => {
                if state.page > 1 {
                    state.page -= 1;
                    true
                } else {
                    false
                }
            }
        };
        fetch.then(|| self.begin_fetch())
    }

    fn begin_fetch(&mut self) -> FetchRequest<F> {
        self.latest_token += 1;
        self.state.phase = Phase::Loading;
        debug!(token = self.latest_token, page = self.state.page, "listing fetch initiated");
        FetchRequest {
            token: self.latest_token,
            page: self.state.page,
            page_size: self.state.page_size,
            filter: self.state.applied.clone(),
        }
    }

    /// Settle a completed fetch. Only the most recently initiated token
    /// may change state.
    pub(crate) fn commit(&mut self, token: u64, result: ListResult<T>) -> Commit {
        if token != self.latest_token {
            return Commit::Stale;
        }
        match result {
            Ok(page) => {
                self.state.items = page.items;
                self.state.total = page.total;
                self.state.phase = Phase::Loaded;
                Commit::Committed
            }
            Err(failure) => {
                self.state.items.clear();
                self.state.total = 0;
                let expired = failure.is_session_expired();
                self.state.phase = Phase::Errored {
                    message: failure.into_message(),
                };
                if expired {
                    Commit::SessionExpired
                } else {
                    Commit::Committed
                }
            }
        }
    }
}

impl<T: Identified, F> ListingMachine<T, F> {
    /// Replace the held item with the same identity. Returns `false` if the
    /// item is not on the current page.
    pub(crate) fn patch(&mut self, item: T) -> bool {
        match self
            .state
            .items
            .iter_mut()
            .find(|held| held.identity() == item.identity())
        {
            Some(held) => {
                *held = item;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ProductFilter, RiskLevel};
    use crate::normalize::{Failure, Page};
    use pretty_assertions::assert_eq;

    type Machine = ListingMachine<u32, ProductFilter>;

    fn moderate() -> ProductFilter {
        ProductFilter {
            risk_level: Some(RiskLevel::Moderate),
            investment_type: None,
        }
    }

    fn loaded(total: u64) -> Machine {
        let mut m = Machine::new(6);
        let req = m.handle(ListingEvent::Load).unwrap();
        m.commit(req.token, Ok(Page { items: vec![1, 2, 3], total }));
        m
    }

    #[test]
    fn pending_change_schedules_nothing() {
        let mut m = Machine::new(6);
        assert_eq!(m.handle(ListingEvent::PendingChanged(moderate())), None);
        assert_eq!(m.state().pending, moderate());
        assert_eq!(m.state().applied, ProductFilter::default());
        assert_eq!(m.state().phase, Phase::Idle);
    }

    #[test]
    fn apply_promotes_pending_and_resets_page() {
        let mut m = loaded(30);
        m.handle(ListingEvent::PageChanged(4)).unwrap();
        m.handle(ListingEvent::PendingChanged(moderate()));
        let req = m.handle(ListingEvent::ApplyFilters).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.filter, moderate());
        assert_eq!(m.state().applied, moderate());
    }

    #[test]
    fn apply_refetches_even_when_unchanged() {
        let mut m = loaded(3);
        let first = m.handle(ListingEvent::ApplyFilters).unwrap();
        let second = m.handle(ListingEvent::ApplyFilters).unwrap();
        assert!(second.token > first.token);
    }

    #[test]
    fn clear_resets_everything() {
        let mut m = loaded(30);
        m.handle(ListingEvent::PendingChanged(moderate()));
        m.handle(ListingEvent::ApplyFilters);
        m.handle(ListingEvent::PageChanged(3));
        let req = m.handle(ListingEvent::ClearFilters).unwrap();
        assert_eq!(req.page, 1);
        assert!(req.filter.is_empty());
        assert!(m.state().pending.is_empty());
        assert!(m.state().applied.is_empty());
    }

    #[test]
    fn page_change_is_clamped_and_deduplicated() {
        let mut m = loaded(30);
        assert_eq!(m.handle(ListingEvent::PageChanged(0)), None);
        assert_eq!(m.state().page, 1);
        assert_eq!(m.handle(ListingEvent::PageChanged(1)), None);
        assert_eq!(m.handle(ListingEvent::PageChanged(2)).unwrap().page, 2);
    }

    #[test]
    fn next_and_previous_stay_in_bounds() {
        // 13 rows at 6 per page -> 3 pages
        let mut m = loaded(13);
        assert_eq!(m.state().last_page(), 3);
        assert_eq!(m.handle(ListingEvent::PreviousPage), None);
        assert_eq!(m.handle(ListingEvent::NextPage).unwrap().page, 2);
        assert_eq!(m.handle(ListingEvent::NextPage).unwrap().page, 3);
        assert_eq!(m.handle(ListingEvent::NextPage), None);
        assert_eq!(m.handle(ListingEvent::PreviousPage).unwrap().page, 2);
    }

    #[test]
    fn loading_keeps_previous_rows() {
        let mut m = loaded(3);
        m.handle(ListingEvent::Load).unwrap();
        assert_eq!(m.state().phase, Phase::Loading);
        assert_eq!(m.state().items, vec![1, 2, 3]);
        assert_eq!(m.state().total, 3);
    }

    #[test]
    fn only_latest_token_commits() {
        let mut m = Machine::new(6);
        let old = m.handle(ListingEvent::Load).unwrap();
        let new = m.handle(ListingEvent::Load).unwrap();

        let page = |items: Vec<u32>| Ok(Page { total: 2, items });
        assert_eq!(m.commit(new.token, page(vec![9, 9])), Commit::Committed);
        assert_eq!(m.commit(old.token, page(vec![1, 1])), Commit::Stale);
        assert_eq!(m.state().items, vec![9, 9]);
    }

    #[test]
    fn errors_settle_to_empty_page() {
        let mut m = loaded(3);
        let req = m.handle(ListingEvent::Load).unwrap();
        assert_eq!(
            m.commit(req.token, Err(Failure::new("Something went wrong!"))),
            Commit::Committed
        );
        assert!(m.state().items.is_empty());
        assert_eq!(m.state().total, 0);
        assert_eq!(m.state().error(), Some("Something went wrong!"));

        let req = m.handle(ListingEvent::Load).unwrap();
        assert_eq!(
            m.commit(req.token, Err(Failure::session_expired())),
            Commit::SessionExpired
        );
    }
}
