// ── Resource gateways ──
//
// One method per backend operation: build the request, call the client,
// normalize. Controllers talk to the traits below so tests can swap in
// in-memory fakes.

mod products;
mod session;
mod transactions;

use std::future::Future;

use tracing::warn;

pub use products::ProductsGateway;
pub use session::SessionGateway;
pub use transactions::TransactionsGateway;

use crate::convert::UnrecognizedValue;
use crate::model::{ProductDraft, ProductId};
use crate::normalize::{Failure, ListResult, Normalized, Page};

/// Paged, filtered source of listing rows.
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;
    type Filter: Clone + Default + PartialEq + std::fmt::Debug + Send + Sync + 'static;

    fn fetch(
        &self,
        page: u32,
        page_size: u32,
        filter: &Self::Filter,
    ) -> impl Future<Output = ListResult<Self::Item>> + Send;
}

/// Product mutations. Each call resolves to the server's acknowledgement
/// message, if it sent one.
pub trait ProductGateway: Send + Sync + 'static {
    fn create(&self, draft: &ProductDraft) -> impl Future<Output = Normalized<Option<String>>> + Send;

    fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Normalized<Option<String>>> + Send;

    fn delete(&self, id: &ProductId) -> impl Future<Output = Normalized<Option<String>>> + Send;
}

/// Convert every wire record of a page, or settle the page as the fallback
/// failure if any record is unrepresentable.
fn convert_page<R, T>(records: Vec<R>, total: u64) -> ListResult<T>
where
    T: TryFrom<R, Error = UnrecognizedValue>,
{
    let items = records
        .into_iter()
        .map(T::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            warn!(error = %e, "discarding malformed listing payload");
            Failure::fallback()
        })?;
    Ok(Page { items, total })
}
