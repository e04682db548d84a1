// ── Domain model ──
//
// Canonical types consumed by the controllers and the CLI. Raw wire
// records from `yieldboard-api` are converted in `crate::convert`.

pub mod account;
pub mod product;
pub mod transaction;

pub use account::{DashboardSummary, ProfileChange, ProfileOutcome, TopProduct};
pub use product::{InvestmentType, Product, ProductDraft, ProductFilter, ProductId, RiskLevel};
pub use transaction::{HttpMethod, TransactionFilter, TransactionLog};

/// An entity with a stable identity, used to patch listings in place.
pub trait Identified {
    type Id: PartialEq;

    fn identity(&self) -> &Self::Id;
}
