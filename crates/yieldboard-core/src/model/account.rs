// ── Dashboard and operator profile types ──

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Serialize;

use super::product::{ProductId, RiskLevel};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_products: u64,
    pub total_users: u64,
    pub total_investments: Decimal,
    pub top_products: Vec<TopProduct>,
}

/// A most-selling product with its investment count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopProduct {
    pub id: ProductId,
    pub name: String,
    pub investments: u64,
}

/// Profile fields sent by `profile update`.
#[derive(Debug, Clone)]
pub struct ProfileChange {
    pub first_name: String,
    pub last_name: String,
    pub password: SecretString,
    pub risk_appetite: RiskLevel,
}

/// What the backend said about a profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileOutcome {
    pub message: Option<String>,
    pub suggestion: Option<String>,
    pub warning: Option<String>,
}
