// ── API-to-domain type conversions ──
//
// Bridges raw `yieldboard_api::models` records into `crate::model` types.
// Enumerated strings are parsed strictly; a record the domain cannot
// represent is reported as `UnrecognizedValue` and the gateway settles the
// whole response into the fallback failure.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use yieldboard_api::models::{
    DashboardResponse, ProductPayload, ProductRecord, ProfileUpdateResponse, RecordId,
    TopProductRecord, TransactionRecord,
};

use crate::model::{
    DashboardSummary, HttpMethod, InvestmentType, Product, ProductDraft, ProductId,
    ProfileOutcome, RiskLevel, TopProduct, TransactionLog,
};

/// A wire value with no domain counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized {field} value: {value:?}")]
pub struct UnrecognizedValue {
    pub field: &'static str,
    pub value: String,
}

fn parse_enum<T: FromStr>(field: &'static str, raw: &str) -> Result<T, UnrecognizedValue> {
    raw.trim().parse().map_err(|_| UnrecognizedValue {
        field,
        value: raw.to_owned(),
    })
}

fn product_id(id: RecordId) -> ProductId {
    ProductId::new(id.to_string())
}

// ── Products ─────────────────────────────────────────────────────────

impl TryFrom<ProductRecord> for Product {
    type Error = UnrecognizedValue;

    fn try_from(r: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Product {
            investment_type: parse_enum::<InvestmentType>("investment_type", &r.investment_type)?,
            risk_level: parse_enum::<RiskLevel>("risk_level", &r.risk_level)?,
            id: product_id(r.id),
            name: r.name,
            description: r.description.filter(|d| !d.trim().is_empty()),
            tenure_months: r.tenure_months,
            annual_yield: r.annual_yield.unwrap_or(Decimal::ZERO),
            min_investment: r.min_investment,
            max_investment: r.max_investment,
        })
    }
}

impl ProductDraft {
    /// Wire payload for create (`id: None`) or update.
    pub fn to_payload(&self, id: Option<&ProductId>) -> ProductPayload {
        ProductPayload {
            id: id.map(|id| id.as_str().to_owned()),
            name: self.name.clone(),
            investment_type: self.investment_type.to_string(),
            tenure_months: self.tenure_months,
            annual_yield: self.annual_yield,
            risk_level: self.risk_level.to_string(),
            min_investment: self.min_investment,
            max_investment: self.max_investment,
        }
    }
}

// ── Transactions ─────────────────────────────────────────────────────

impl TryFrom<TransactionRecord> for TransactionLog {
    type Error = UnrecognizedValue;

    fn try_from(r: TransactionRecord) -> Result<Self, Self::Error> {
        let id = match r.id {
            RecordId::Number(n) => n,
            RecordId::Text(s) => s.trim().parse().map_err(|_| UnrecognizedValue {
                field: "id",
                value: s.clone(),
            })?,
        };
        Ok(TransactionLog {
            id,
            http_method: parse_enum::<HttpMethod>("http_method", &r.http_method)?,
            user_id: r.user_id,
            email: r.email,
            endpoint: r.endpoint,
            status_code: r.status_code,
            error_message: r.error_message.filter(|m| !m.is_empty()),
            created_at: r.created_at,
        })
    }
}

// ── Dashboard / profile ──────────────────────────────────────────────

impl From<TopProductRecord> for TopProduct {
    fn from(r: TopProductRecord) -> Self {
        TopProduct {
            id: product_id(r.id),
            name: r.name,
            investments: r.total_investments,
        }
    }
}

impl From<DashboardResponse> for DashboardSummary {
    fn from(r: DashboardResponse) -> Self {
        DashboardSummary {
            total_products: r.total_products.total_products,
            total_users: r.total_users.total_users,
            total_investments: r.total_investments.total_investments.unwrap_or(Decimal::ZERO),
            top_products: r
                .most_selling_products
                .into_iter()
                .map(TopProduct::from)
                .collect(),
        }
    }
}

impl From<ProfileUpdateResponse> for ProfileOutcome {
    fn from(r: ProfileUpdateResponse) -> Self {
        ProfileOutcome {
            message: r.message,
            suggestion: r.suggestion,
            warning: r.warning,
        }
    }
}
