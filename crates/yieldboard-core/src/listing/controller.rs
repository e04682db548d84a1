// ── Listing controller ──
//
// Async driver around `ListingMachine`. The lock is held only while a
// transition runs, never across the network await, so fetches may
// overlap; the request token decides which one lands.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, trace};

use super::state::{Commit, ListingEvent, ListingMachine, ListingState};
use crate::gateway::ListSource;
use crate::model::Identified;
use crate::session::{Navigator, Route};

type Snapshot<S> = Arc<ListingState<<S as ListSource>::Item, <S as ListSource>::Filter>>;

/// Paginated, filtered view over a [`ListSource`].
///
/// Cheaply cloneable; clones drive the same listing.
pub struct ListingController<S: ListSource> {
    inner: Arc<Inner<S>>,
}

struct Inner<S: ListSource> {
    source: S,
    navigator: Arc<dyn Navigator>,
    machine: Mutex<ListingMachine<S::Item, S::Filter>>,
    snapshot: watch::Sender<Snapshot<S>>,
}

impl<S: ListSource> Clone for ListingController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListSource> ListingController<S> {
    pub fn new(source: S, page_size: u32, navigator: Arc<dyn Navigator>) -> Self {
        let machine = ListingMachine::new(page_size);
        let (snapshot, _) = watch::channel(Arc::new(machine.state().clone()));
        Self {
            inner: Arc::new(Inner {
                source,
                navigator,
                machine: Mutex::new(machine),
                snapshot,
            }),
        }
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Snapshot<S> {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver that wakes on every published state change.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S>> {
        self.inner.snapshot.subscribe()
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    fn publish(&self, machine: &ListingMachine<S::Item, S::Filter>) {
        self.inner
            .snapshot
            .send_replace(Arc::new(machine.state().clone()));
    }

    /// Apply an event and, if it schedules a fetch, run it to completion.
    ///
    /// Returns `None` when the event did not call for a fetch.
    pub async fn dispatch(&self, event: ListingEvent<S::Filter>) -> Option<Commit> {
        let request = {
            let mut machine = self.inner.machine.lock().await;
            let request = machine.handle(event);
            self.publish(&machine);
            request
        }?;

        let result = self
            .inner
            .source
            .fetch(request.page, request.page_size, &request.filter)
            .await;

        let commit = {
            let mut machine = self.inner.machine.lock().await;
            let commit = machine.commit(request.token, result);
            if commit != Commit::Stale {
                self.publish(&machine);
            }
            commit
        };

        match commit {
            Commit::Stale => trace!(token = request.token, "discarding stale listing result"),
            Commit::SessionExpired => {
                debug!(token = request.token, "session expired during listing fetch");
                self.inner.navigator.navigate(Route::Login);
            }
            Commit::Committed => {
                debug!(token = request.token, page = request.page, "listing result committed");
            }
        }
        Some(commit)
    }

    /// Re-fetch the current page with the applied filters.
    pub async fn refresh(&self) -> Option<Commit> {
        self.dispatch(ListingEvent::Load).await
    }
}

impl<S> ListingController<S>
where
    S: ListSource,
    S::Item: Identified,
{
    /// Swap in a just-confirmed item without re-fetching.
    pub async fn patch_item(&self, item: S::Item) -> bool {
        let mut machine = self.inner.machine.lock().await;
        let patched = machine.patch(item);
        if patched {
            self.publish(&machine);
        }
        patched
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;
    use crate::listing::Phase;
    use crate::model::{ProductFilter, RiskLevel};
    use crate::normalize::{Failure, ListResult, Page};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        label: &'static str,
    }

    impl Identified for Row {
        type Id = u32;

        fn identity(&self) -> &u32 {
            &self.id
        }
    }

    fn row(id: u32, label: &'static str) -> Row {
        Row { id, label }
    }

    /// Source whose responses are released by the test through oneshots.
    #[derive(Default)]
    struct ScriptedSource {
        gates: StdMutex<VecDeque<oneshot::Receiver<ListResult<Row>>>>,
        calls: StdMutex<Vec<(u32, ProductFilter)>>,
    }

    impl ScriptedSource {
        fn gated(n: usize) -> (Self, Vec<oneshot::Sender<ListResult<Row>>>) {
            let source = Self::default();
            let mut senders = Vec::new();
            for _ in 0..n {
                let (tx, rx) = oneshot::channel();
                source.gates.lock().unwrap().push_back(rx);
                senders.push(tx);
            }
            (source, senders)
        }

        fn ready(results: Vec<ListResult<Row>>) -> Self {
            let (source, senders) = Self::gated(results.len());
            for (tx, result) in senders.into_iter().zip(results) {
                tx.send(result).unwrap();
            }
            source
        }

        fn calls(&self) -> Vec<(u32, ProductFilter)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ListSource for ScriptedSource {
        type Item = Row;
        type Filter = ProductFilter;

        async fn fetch(&self, page: u32, _page_size: u32, filter: &ProductFilter) -> ListResult<Row> {
            self.calls.lock().unwrap().push((page, *filter));
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(Failure::fallback())),
                None => Err(Failure::new("no scripted response")),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: StdMutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    fn controller(
        source: ScriptedSource,
    ) -> (ListingController<ScriptedSource>, Arc<RecordingNavigator>) {
        let nav = Arc::new(RecordingNavigator::default());
        let ctrl = ListingController::new(source, 6, Arc::clone(&nav) as Arc<dyn Navigator>);
        (ctrl, nav)
    }

    fn page(items: Vec<Row>, total: u64) -> ListResult<Row> {
        Ok(Page { items, total })
    }

    async fn wait_for_calls(ctrl: &ListingController<ScriptedSource>, n: usize) {
        while ctrl.source().calls().len() < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn successful_load_is_committed() {
        let (ctrl, nav) = controller(ScriptedSource::ready(vec![page(
            vec![row(1, "P1"), row(2, "P2")],
            2,
        )]));

        assert_eq!(ctrl.dispatch(ListingEvent::Load).await, Some(Commit::Committed));

        let snap = ctrl.snapshot();
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.total, 2);
        assert_eq!(snap.phase, Phase::Loaded);
        assert!(nav.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn session_expiry_navigates_to_login_once() {
        let (ctrl, nav) = controller(ScriptedSource::ready(vec![
            page(vec![row(1, "P1")], 1),
            Err(Failure::session_expired()),
        ]));
        ctrl.dispatch(ListingEvent::Load).await;

        assert_eq!(
            ctrl.dispatch(ListingEvent::Load).await,
            Some(Commit::SessionExpired)
        );
        let snap = ctrl.snapshot();
        assert!(snap.items.is_empty());
        assert_eq!(snap.total, 0);
        assert_eq!(snap.error(), Some("Unauthorized"));
        assert_eq!(*nav.routes.lock().unwrap(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn other_errors_do_not_navigate() {
        let (ctrl, nav) = controller(ScriptedSource::ready(vec![Err(Failure::fallback())]));
        ctrl.dispatch(ListingEvent::Load).await;
        assert_eq!(ctrl.snapshot().error(), Some("Something went wrong!"));
        assert!(nav.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pending_changes_never_fetch() {
        let (ctrl, _) = controller(ScriptedSource::default());
        let filter = ProductFilter {
            risk_level: Some(RiskLevel::High),
            investment_type: None,
        };
        assert_eq!(ctrl.dispatch(ListingEvent::PendingChanged(filter)).await, None);
        assert!(ctrl.source().calls().is_empty());
        assert_eq!(ctrl.snapshot().pending, filter);
    }

    #[tokio::test]
    async fn applied_filters_reach_the_source() {
        let (ctrl, _) = controller(ScriptedSource::ready(vec![
            page(vec![], 20),
            page(vec![], 20),
            page(vec![], 4),
        ]));
        let moderate = ProductFilter {
            risk_level: Some(RiskLevel::Moderate),
            investment_type: None,
        };

        ctrl.dispatch(ListingEvent::Load).await;
        ctrl.dispatch(ListingEvent::PageChanged(3)).await;
        ctrl.dispatch(ListingEvent::PendingChanged(moderate)).await;
        ctrl.dispatch(ListingEvent::ApplyFilters).await;

        let calls = ctrl.source().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], (3, ProductFilter::default()));
        assert_eq!(calls[2], (1, moderate));
    }

    #[tokio::test]
    async fn stale_completion_does_not_overwrite_latest() {
        let (source, mut gates) = ScriptedSource::gated(2);
        let (ctrl, _) = controller(source);
        let second_gate = gates.pop().unwrap();
        let first_gate = gates.pop().unwrap();

        let c1 = ctrl.clone();
        let first = tokio::spawn(async move { c1.dispatch(ListingEvent::PageChanged(2)).await });
        wait_for_calls(&ctrl, 1).await;
        let c2 = ctrl.clone();
        let second = tokio::spawn(async move { c2.dispatch(ListingEvent::PageChanged(3)).await });
        wait_for_calls(&ctrl, 2).await;

        // Latest finishes first, then the older request straggles in.
        second_gate.send(page(vec![row(3, "latest")], 18)).unwrap();
        assert_eq!(second.await.unwrap(), Some(Commit::Committed));
        first_gate.send(page(vec![row(2, "stale")], 18)).unwrap();
        assert_eq!(first.await.unwrap(), Some(Commit::Stale));

        let snap = ctrl.snapshot();
        assert_eq!(snap.items, vec![row(3, "latest")]);
        assert_eq!(snap.page, 3);
        assert_eq!(snap.phase, Phase::Loaded);
    }

    #[tokio::test]
    async fn in_order_completion_also_keeps_latest() {
        let (source, mut gates) = ScriptedSource::gated(3);
        let (ctrl, _) = controller(source);

        let mut handles = Vec::new();
        for (i, page_no) in [2_u32, 3, 4].into_iter().enumerate() {
            let c = ctrl.clone();
            handles.push(tokio::spawn(async move {
                c.dispatch(ListingEvent::PageChanged(page_no)).await
            }));
            wait_for_calls(&ctrl, i + 1).await;
        }

        let labels = ["first", "second", "third"];
        for (gate, label) in gates.drain(..).zip(labels) {
            gate.send(page(vec![row(0, label)], 30)).unwrap();
            tokio::task::yield_now().await;
        }

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }
        assert_eq!(
            outcomes,
            vec![Some(Commit::Stale), Some(Commit::Stale), Some(Commit::Committed)]
        );
        assert_eq!(ctrl.snapshot().items, vec![row(0, "third")]);
    }

    #[tokio::test]
    async fn clear_after_apply_returns_to_page_one_unfiltered() {
        let (ctrl, _) = controller(ScriptedSource::ready(vec![
            page(vec![], 40),
            page(vec![], 40),
            page(vec![], 40),
        ]));
        let filter = ProductFilter {
            risk_level: Some(RiskLevel::Low),
            investment_type: None,
        };
        ctrl.dispatch(ListingEvent::PendingChanged(filter)).await;
        ctrl.dispatch(ListingEvent::ApplyFilters).await;
        ctrl.dispatch(ListingEvent::NextPage).await;
        ctrl.dispatch(ListingEvent::ClearFilters).await;

        let snap = ctrl.snapshot();
        assert_eq!(snap.page, 1);
        assert!(snap.applied.is_empty());
        assert!(snap.pending.is_empty());
        assert_eq!(ctrl.source().calls().last(), Some(&(1, ProductFilter::default())));
    }

    #[tokio::test]
    async fn patch_replaces_only_matching_row() {
        let (ctrl, _) = controller(ScriptedSource::ready(vec![page(
            vec![row(1, "a"), row(2, "b")],
            2,
        )]));
        ctrl.dispatch(ListingEvent::Load).await;

        assert!(ctrl.patch_item(row(2, "b2")).await);
        assert!(!ctrl.patch_item(row(9, "ghost")).await);
        assert_eq!(ctrl.snapshot().items, vec![row(1, "a"), row(2, "b2")]);
        assert_eq!(ctrl.source().calls().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_observe_loading_then_loaded() {
        let (source, mut gates) = ScriptedSource::gated(1);
        let (ctrl, _) = controller(source);
        let mut rx = ctrl.subscribe();

        let c = ctrl.clone();
        let task = tokio::spawn(async move { c.dispatch(ListingEvent::Load).await });
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());

        gates.pop().unwrap().send(page(vec![row(1, "x")], 1)).unwrap();
        task.await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().phase, Phase::Loaded);
    }
}
