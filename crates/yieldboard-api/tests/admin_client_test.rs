#![allow(clippy::unwrap_used)]
// Integration tests for `AdminClient` using wiremock.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use yieldboard_api::models::{ProductListQuery, ProductPayload, TransactionListQuery};
use yieldboard_api::{AdminClient, Error, ProfileUpdate};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = AdminClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn payload(id: Option<&str>) -> ProductPayload {
    ProductPayload {
        id: id.map(String::from),
        name: "Treasury Ladder".into(),
        investment_type: "bond".into(),
        tenure_months: 24,
        annual_yield: dec!(7.1),
        risk_level: "low".into(),
        min_investment: dec!(500),
        max_investment: dec!(1000),
    }
}

// ── Session tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({
            "email": "ops@example.com",
            "password_hash": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter22".to_string().into();
    let resp = client.login("ops@example.com", &secret).await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("Login successful"));
}

#[tokio::test]
async fn test_login_failure_keeps_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let err = client.login("ops@example.com", &secret).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.server_message(), Some("Invalid credentials"));
    assert!(!err.is_auth_expired());
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Logged out successfully"
        })))
        .mount(&server)
        .await;

    let resp = client.logout().await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("Logged out successfully"));
}

#[tokio::test]
async fn test_login_with_empty_body_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter22".to_string().into();
    let resp = client.login("ops@example.com", &secret).await.unwrap();
    assert!(resp.message.is_none());
}

#[tokio::test]
async fn test_logout_with_plain_text_body_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Logged out"))
        .mount(&server)
        .await;

    let resp = client.logout().await.unwrap();
    assert!(resp.message.is_none());
}

#[tokio::test]
async fn test_dashboard() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalProducts": { "totalProducts": 50 },
            "totalUsers": { "totalUsers": "100" },
            "totalInvestments": { "totalInvestments": 2500 },
            "mostSellingProducts": [
                { "id": "p-1", "name": "Gilt 2030", "totalInvestments": 9 }
            ]
        })))
        .mount(&server)
        .await;

    let d = client.dashboard().await.unwrap();
    assert_eq!(d.total_products.total_products, 50);
    assert_eq!(d.total_users.total_users, 100);
    assert_eq!(d.most_selling_products.len(), 1);
    assert_eq!(d.most_selling_products[0].name, "Gilt 2030");
}

#[tokio::test]
async fn test_update_profile_reads_suggestions_alias() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/user/update-profile"))
        .and(body_json(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "password": "newpassword",
            "risk_appetite": "high"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Profile updated successfully",
            "suggestions": "Consider diversifying your portfolio",
            "warning": "High risk investments detected"
        })))
        .mount(&server)
        .await;

    let update = ProfileUpdate {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        password: "newpassword".to_string().into(),
        risk_appetite: "high".into(),
    };
    let resp = client.update_profile(&update).await.unwrap();
    assert_eq!(
        resp.suggestion.as_deref(),
        Some("Consider diversifying your portfolio")
    );
    assert_eq!(resp.warning.as_deref(), Some("High risk investments detected"));
}

// ── Product tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_products_with_one_filter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/list-products"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "6"))
        .and(query_param("risk_level", "moderate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "p-1",
                "name": "Balanced Fund",
                "description": "60/40 blend",
                "investment_type": "mf",
                "tenure_months": 12,
                "annual_yield": 8.5,
                "risk_level": "moderate",
                "min_investment": "500.00",
                "max_investment": "50000.00"
            }],
            "total": 7
        })))
        .mount(&server)
        .await;

    let query = ProductListQuery {
        page: 2,
        limit: 6,
        risk_level: Some("moderate".into()),
        investment_type: None,
    };
    let resp = client.list_products(&query).await.unwrap();

    assert_eq!(resp.total, 7);
    assert_eq!(resp.data.len(), 1);
    assert_eq!(resp.data[0].name, "Balanced Fund");
    assert_eq!(resp.data[0].min_investment, dec!(500.00));

    let received = server.received_requests().await.unwrap();
    let query = received[0].url.query().unwrap_or_default().to_owned();
    assert!(
        !query.contains("investment_type"),
        "absent filter leaked into query: {query}"
    );
}

#[tokio::test]
async fn test_add_product_posts_numeric_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/products/add-product"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Product added"
        })))
        .mount(&server)
        .await;

    let resp = client.add_product(&payload(None)).await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("Product added"));

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["tenure_months"], json!(24));
    assert_eq!(body["min_investment"], json!(500.0));
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_update_product_uses_patch_with_id() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/products/update-product"))
        .respond_with(|req: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
            if body["id"] == json!("p-42") {
                ResponseTemplate::new(200).set_body_json(json!({ "message": "Product updated" }))
            } else {
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Product not found" }))
            }
        })
        .mount(&server)
        .await;

    let ok = client.update_product(&payload(Some("p-42"))).await.unwrap();
    assert_eq!(ok.message.as_deref(), Some("Product updated"));

    let err = client
        .update_product(&payload(Some("p-missing")))
        .await
        .unwrap_err();
    assert_eq!(err.server_message(), Some("Product not found"));
}

#[tokio::test]
async fn test_delete_product_sends_identity_in_body() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/delete-product"))
        .and(body_json(json!({ "productId": "p-7" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Product deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.delete_product("p-7").await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("Product deleted"));
}

// ── Transaction tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_list_transactions() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/transactions"))
        .and(query_param("email", "ops@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions": [{
                "id": 1,
                "user_id": "u-1",
                "email": "ops@example.com",
                "endpoint": "/products/add-product",
                "http_method": "POST",
                "status_code": 201,
                "error_message": null,
                "created_at": "2024-06-15T10:30:00Z"
            }],
            "total": "1"
        })))
        .mount(&server)
        .await;

    let query = TransactionListQuery {
        page: 1,
        limit: 10,
        user_id: None,
        email: Some("ops@example.com".into()),
    };
    let resp = client.list_transactions(&query).await.unwrap();
    assert_eq!(resp.total, 1);
    assert_eq!(resp.transactions[0].status_code, 201);
    assert_eq!(resp.transactions[0].http_method, "POST");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_is_auth_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let err = client
        .list_products(&ProductListQuery {
            page: 1,
            limit: 6,
            ..ProductListQuery::default()
        })
        .await
        .unwrap_err();

    assert!(err.is_auth_expired(), "expected auth error, got: {err:?}");
    assert_eq!(err.server_message(), Some("Unauthorized"));
}

#[tokio::test]
async fn test_non_json_error_body_has_no_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client.dashboard().await.unwrap_err();
    match err {
        Error::Http { status, ref body } => {
            assert_eq!(status, 502);
            assert!(body.is_none());
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.dashboard().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body == "not json"),
        "expected Deserialization error, got: {err:?}"
    );
}

#[tokio::test]
async fn test_delete_product_no_content_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/delete-product"))
        .and(body_json(json!({ "productId": "p-3" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.delete_product("p-3").await.unwrap();
    assert!(resp.message.is_none());
}

#[tokio::test]
async fn test_ack_endpoints_still_report_http_errors() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/products/update-product"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Product not found"
        })))
        .mount(&server)
        .await;

    let err = client.update_product(&payload(Some("p-1"))).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Product not found"));
}
