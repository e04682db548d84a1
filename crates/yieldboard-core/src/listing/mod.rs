// ── Paginated, filtered listings ──
//
// `state` holds the transition table; `controller` runs fetches against a
// `ListSource` and publishes snapshots. The product catalog and the
// transaction log are both instances of the same controller.

mod controller;
mod state;

pub use controller::ListingController;
pub use state::{Commit, FetchRequest, ListingEvent, ListingState, Phase};

use crate::gateway::{ProductsGateway, TransactionsGateway};

/// Product catalog listing.
pub type ProductListing = ListingController<ProductsGateway>;
/// Transaction log listing.
pub type TransactionListing = ListingController<TransactionsGateway>;
