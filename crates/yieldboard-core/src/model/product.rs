// ── Product domain types ──

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::Identified;

/// Opaque product identity assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Investment category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InvestmentType {
    Bond,
    Fd,
    Mf,
    Etf,
    Other,
}

impl InvestmentType {
    /// Human-readable label for selection lists.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bond => "Bond",
            Self::Fd => "Fixed Deposit",
            Self::Mf => "Mutual Fund",
            Self::Etf => "ETF",
            Self::Other => "Other",
        }
    }
}

/// Risk classification, shared by products and operator risk appetite.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// A catalog entry as held by the listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub investment_type: InvestmentType,
    pub tenure_months: u32,
    pub annual_yield: Decimal,
    pub risk_level: RiskLevel,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
}

impl Identified for Product {
    type Id = ProductId;

    fn identity(&self) -> &ProductId {
        &self.id
    }
}

/// Fully typed product fields, produced by coercing a dialog form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub investment_type: InvestmentType,
    pub tenure_months: u32,
    pub annual_yield: Decimal,
    pub risk_level: RiskLevel,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
}

impl ProductDraft {
    /// The product this draft describes once the backend accepted it.
    pub fn into_product(self, id: ProductId, description: Option<String>) -> Product {
        Product {
            id,
            name: self.name,
            description,
            investment_type: self.investment_type,
            tenure_months: self.tenure_months,
            annual_yield: self.annual_yield,
            risk_level: self.risk_level,
            min_investment: self.min_investment,
            max_investment: self.max_investment,
        }
    }
}

/// Product listing filters. `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    pub risk_level: Option<RiskLevel>,
    pub investment_type: Option<InvestmentType>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.risk_level.is_none() && self.investment_type.is_none()
    }
}
