// Admin API request/response types
//
// Wire models for the admin backend's JSON API. Enumerated fields
// (investment type, risk level, HTTP method) stay as strings here;
// `yieldboard-core` converts them into typed domain values. Counts come
// back from SQL aggregates and may arrive as strings, so they go through
// the lenient `flex` deserializers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ── Lenient scalars ──────────────────────────────────────────────────

/// Identifier that the backend may send as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

pub(crate) mod flex {
    use serde::{Deserialize, Deserializer, de::Error as _};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(u64),
        Text(String),
    }

    /// Accept `12`, `"12"`, or a missing value (as 0).
    pub(crate) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match Option::<Loose>::deserialize(d)? {
            None => Ok(0),
            Some(Loose::Int(n)) => Ok(n),
            Some(Loose::Text(s)) => s.trim().parse().map_err(D::Error::custom),
        }
    }
}

// ── Products ─────────────────────────────────────────────────────────

/// A product row from `GET /products/list-products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub investment_type: String,
    pub tenure_months: u32,
    #[serde(default)]
    pub annual_yield: Option<Decimal>,
    pub risk_level: String,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
}

/// Query string for the product listing. `None` filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_type: Option<String>,
}

/// Response envelope for the product listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub data: Vec<ProductRecord>,
    #[serde(default, deserialize_with = "flex::count")]
    pub total: u64,
}

/// Body for `POST /products/add-product` and `PATCH /products/update-product`.
///
/// Amounts are sent as JSON numbers; `id` is only present on update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub investment_type: String,
    pub tenure_months: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_yield: Decimal,
    pub risk_level: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_investment: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_investment: Decimal,
}

/// Body for `DELETE /products/delete-product`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductBody<'a> {
    pub product_id: &'a str,
}

// ── Generic acknowledgement ──────────────────────────────────────────

/// `{ "message": "..." }` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Transactions ─────────────────────────────────────────────────────

/// A request-log row from `GET /admin/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: RecordId,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub endpoint: String,
    pub http_method: String,
    pub status_code: u16,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query string for the transaction log. `None` filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Response envelope for the transaction log.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionListResponse {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
    #[serde(default, deserialize_with = "flex::count")]
    pub total: u64,
}

// ── Session / user ───────────────────────────────────────────────────

/// Body for `POST /user/login`. The backend names the field `password_hash`
/// even though it receives the plaintext password.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Body for `POST /user/update-profile`.
#[derive(Serialize)]
pub(crate) struct ProfileBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
    pub risk_appetite: &'a str,
}

/// Response of `POST /user/update-profile`.
///
/// The backend has used both `suggestion` and `suggestions` for the same
/// field.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProfileUpdateResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "suggestions")]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

// ── Dashboard ────────────────────────────────────────────────────────

/// `GET /admin/dashboard`: every counter is wrapped in a single-key object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_products: ProductCount,
    pub total_users: UserCount,
    pub total_investments: InvestmentTotal,
    #[serde(default)]
    pub most_selling_products: Vec<TopProductRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCount {
    #[serde(default, deserialize_with = "flex::count")]
    pub total_products: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCount {
    #[serde(default, deserialize_with = "flex::count")]
    pub total_users: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTotal {
    #[serde(default)]
    pub total_investments: Option<Decimal>,
}

/// One row of the most-selling products table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "flex::count")]
    pub total_investments: u64,
}
