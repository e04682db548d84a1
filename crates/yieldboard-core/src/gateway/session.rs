use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;
use yieldboard_api::{AdminClient, ProfileUpdate};

use crate::model::{DashboardSummary, ProfileChange, ProfileOutcome};
use crate::normalize::{Normalized, normalize};

/// Login, logout, dashboard and profile calls.
///
/// Credentials live in the client's cookie jar, so a successful `login`
/// authorizes every other gateway sharing the same `AdminClient`.
#[derive(Debug, Clone)]
pub struct SessionGateway {
    client: Arc<AdminClient>,
}

impl SessionGateway {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Normalized<Option<String>> {
        let resp = normalize(|| self.client.login(email, password)).await?;
        info!(email, "operator logged in");
        Ok(resp.message)
    }

    pub async fn logout(&self) -> Normalized<Option<String>> {
        let resp = normalize(|| self.client.logout()).await?;
        Ok(resp.message)
    }

    pub async fn dashboard(&self) -> Normalized<DashboardSummary> {
        normalize(|| self.client.dashboard())
            .await
            .map(DashboardSummary::from)
    }

    pub async fn update_profile(&self, change: &ProfileChange) -> Normalized<ProfileOutcome> {
        let update = ProfileUpdate {
            first_name: change.first_name.clone(),
            last_name: change.last_name.clone(),
            password: change.password.clone(),
            risk_appetite: change.risk_appetite.to_string(),
        };
        normalize(|| self.client.update_profile(&update))
            .await
            .map(ProfileOutcome::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, SessionGateway) {
        let server = MockServer::start().await;
        let client = AdminClient::with_client(
            reqwest::Client::new(),
            Url::parse(&server.uri()).unwrap(),
        );
        (server, SessionGateway::new(Arc::new(client)))
    }

    #[tokio::test]
    async fn dashboard_summary_is_flattened() {
        let (server, gateway) = setup().await;
        Mock::given(method("GET"))
            .and(path("/admin/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalProducts": { "totalProducts": 3 },
                "totalUsers": { "totalUsers": 8 },
                "totalInvestments": { "totalInvestments": null },
                "mostSellingProducts": [{ "id": 4, "name": "ETF 1", "totalInvestments": 2 }]
            })))
            .mount(&server)
            .await;

        let summary = gateway.dashboard().await.unwrap();
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_investments, dec!(0));
        assert_eq!(summary.top_products[0].id.as_str(), "4");
    }

    #[tokio::test]
    async fn profile_update_surfaces_suggestion_and_warning() {
        let (server, gateway) = setup().await;
        Mock::given(method("POST"))
            .and(path("/user/update-profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Profile updated successfully",
                "suggestion": "Consider bonds",
                "warning": "High risk"
            })))
            .mount(&server)
            .await;

        let outcome = gateway
            .update_profile(&ProfileChange {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                password: "correct horse".to_string().into(),
                risk_appetite: RiskLevel::High,
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ProfileOutcome {
                message: Some("Profile updated successfully".into()),
                suggestion: Some("Consider bonds".into()),
                warning: Some("High risk".into()),
            }
        );
    }

    #[tokio::test]
    async fn expired_session_yields_sentinel() {
        let (server, gateway) = setup().await;
        Mock::given(method("GET"))
            .and(path("/user/logout"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = gateway.logout().await.unwrap_err();
        assert!(err.is_session_expired());
    }
}
