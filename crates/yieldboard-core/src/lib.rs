//! Catalog state management between `yieldboard-api` and the CLI.
//!
//! - **[`normalize`]**: every backend call settles into a [`Normalized`]
//!   result: the body, or a message-only [`Failure`]. Session expiry is the
//!   `"Unauthorized"` sentinel.
//!
//! - **Gateways** ([`gateway`]): one method per backend operation
//!   (products, transactions, session), each built on the normalizer.
//!
//! - **[`ListingController`]**: paginated, filtered listing driven by
//!   [`ListingEvent`]s. Pending filters follow the controls; applied filters
//!   drive fetches. Request tokens make the last-initiated fetch win.
//!
//! - **[`ProductDialog`]**: one create/update dialog over a tagged
//!   [`DialogForm`], plus [`delete_product`] behind a [`ConfirmGate`].
//!
//! - **[`SessionContext`] / [`Router`]**: observable authenticated flag and
//!   a guarded [`Navigator`] that listings use to redirect on expiry.

pub mod config;
pub mod convert;
pub mod dialog;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod model;
pub mod normalize;
pub mod notification;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, Credentials, PageSizes, TlsVerification};
pub use dialog::{
    ConfirmGate, DeleteOutcome, DialogForm, DialogState, FieldError, FormField, ListingEffect,
    ProductDialog, ProductForm, SubmitOutcome, UpdatePolicy, delete_product,
};
pub use error::CoreError;
pub use gateway::{
    ListSource, ProductGateway, ProductsGateway, SessionGateway, TransactionsGateway,
};
pub use listing::{
    Commit, ListingController, ListingEvent, ListingState, Phase, ProductListing,
    TransactionListing,
};
pub use normalize::{Envelope, Failure, ListEnvelope, ListResult, Normalized, Page, normalize};
pub use notification::{Notification, Notifications, Severity};
pub use session::{Navigator, Route, RouteGuard, Router, SessionContext};

pub use model::{
    DashboardSummary, HttpMethod, Identified, InvestmentType, Product, ProductDraft,
    ProductFilter, ProductId, ProfileChange, ProfileOutcome, RiskLevel, TopProduct,
    TransactionFilter, TransactionLog,
};
