//! Request construction for PlanClient and AgreementClient, driven through
//! the `PaymentProvider` trait the web layer uses.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/v1/payments/billing-plans` | `list_plans_*` |
//! | POST   | `/v1/payments/billing-plans` | `create_plan_*` |
//! | PATCH  | `/v1/payments/billing-plans/{id}` | `activate_plan_*` |
//! | GET    | `/v1/payments/billing-plans/{id}` | `get_plan_*` |
//! | POST   | `/v1/payments/billing-agreements` | `create_agreement_*` |
//! | GET    | `/v1/payments/billing-agreements/{id}` | `get_agreement_*` |
//! | GET    | `/v1/payments/billing-agreements/{id}/transactions` | `search_transactions_*` |
//! | POST   | `/v1/payments/billing-agreements/{token}/agreement-execute` | `execute_agreement_*` |
//! | POST   | `/v1/payments/billing-agreements/{id}/cancel` | `cancel_agreement_*` |
//! | POST   | `/v1/payments/billing-agreements/{id}/suspend` | `suspend_agreement_*` |

use std::sync::Arc;

use paygate_provider::agreements::{Payer, PlanReference};
use paygate_provider::plans::{MerchantPreferences, PaymentDefinition};
use paygate_provider::types::Money;
use paygate_provider::{
    approval_href, AgreementStateNote, BillingAgreementRequest, BillingPlanRequest,
    PaymentProvider, PaypalClient, PlanListQuery, ProviderConfig, ProviderMode, TransactionSearch,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn test_provider(mock_server: &MockServer) -> Arc<dyn PaymentProvider> {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A21AAtest",
            "token_type": "Bearer",
            "expires_in": 32400
        })))
        .mount(mock_server)
        .await;

    let config = ProviderConfig::new(ProviderMode::Sandbox, "id", "secret")
        .unwrap()
        .with_base_url(&mock_server.uri())
        .unwrap();
    Arc::new(PaypalClient::new(&config).unwrap())
}

// ── Billing plans ────────────────────────────────────────────────────

#[tokio::test]
async fn list_plans_sends_default_query() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/payments/billing-plans"))
        .and(query_param("status", "active"))
        .and(query_param("page", "0"))
        .and(query_param("page_size", "3"))
        .and(header("authorization", "Bearer A21AAtest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plans": [{"id": "P-1"}, {"id": "P-2"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let listed = provider.list_plans(&PlanListQuery::default()).await.unwrap();
    assert_eq!(listed["plans"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_plan_mirrors_amounts() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payments/billing-plans"))
        .and(body_json(json!({
            "name": "Gold",
            "description": "Monthly gold",
            "type": "INFINITE",
            "payment_definitions": [{
                "name": "Regular",
                "type": "REGULAR",
                "frequency_interval": "1",
                "frequency": "MONTH",
                "cycles": "0",
                "amount": {"currency": "USD", "value": "10"}
            }],
            "merchant_preferences": {
                "setup_fee": {"currency": "USD", "value": "1"},
                "cancel_url": "http://localhost:3000/subscriptions/callback/cancel",
                "return_url": "http://localhost:3000/subscriptions/callback/success",
                "auto_bill_amount": "YES",
                "initial_fail_amount_action": "CONTINUE"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "P-94458432VR012762KRWBZEUA",
            "state": "CREATED"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let req = BillingPlanRequest {
        name: Some("Gold".into()),
        description: Some("Monthly gold".into()),
        plan_type: Some("INFINITE".into()),
        payment_definitions: vec![PaymentDefinition {
            name: Some("Regular".into()),
            definition_type: Some("REGULAR".into()),
            frequency_interval: Some("1".into()),
            frequency: Some("MONTH".into()),
            cycles: Some("0".into()),
            amount: Money::new(Some("USD".into()), Some("10".into())),
        }],
        merchant_preferences: MerchantPreferences {
            setup_fee: Money::new(Some("USD".into()), Some("1".into())),
            cancel_url: Some("http://localhost:3000/subscriptions/callback/cancel".into()),
            return_url: Some("http://localhost:3000/subscriptions/callback/success".into()),
            auto_bill_amount: Some("YES".into()),
            initial_fail_amount_action: Some("CONTINUE".into()),
        },
    };
    let created = provider.create_plan(&req).await.unwrap();
    assert_eq!(created["state"], "CREATED");
}

#[tokio::test]
async fn activate_plan_patches_state() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("PATCH"))
        .and(path("/v1/payments/billing-plans/P-1"))
        .and(body_json(json!([{
            "op": "replace",
            "path": "/",
            "value": {"state": "ACTIVE"}
        }])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_eq!(provider.activate_plan("P-1").await.unwrap(), json!({}));
}

#[tokio::test]
async fn get_plan_returns_body() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/payments/billing-plans/P-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "P-1",
            "state": "ACTIVE"
        })))
        .mount(&mock_server)
        .await;

    let plan = provider.get_plan("P-1").await.unwrap();
    assert_eq!(plan, json!({"id": "P-1", "state": "ACTIVE"}));
}

// ── Billing agreements ───────────────────────────────────────────────

#[tokio::test]
async fn create_agreement_returns_approval_link() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payments/billing-agreements"))
        .and(body_json(json!({
            "name": "Gold agreement",
            "description": "Gold",
            "start_date": "2026-11-01T00:00:00.000Z",
            "payer": {"payment_method": "paypal"},
            "plan": {"id": "P-1"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "name": "Gold agreement",
            "links": [
                {"href": "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-0JP008296V451950C", "rel": "approval_url", "method": "REDIRECT"},
                {"href": "https://api.sandbox.paypal.com/v1/payments/billing-agreements/EC-0JP008296V451950C/agreement-execute", "rel": "execute", "method": "POST"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let req = BillingAgreementRequest {
        name: Some("Gold agreement".into()),
        description: Some("Gold".into()),
        start_date: Some("2026-11-01T00:00:00.000Z".into()),
        payer: Payer {
            payment_method: Some("paypal".into()),
        },
        plan: PlanReference {
            id: Some("P-1".into()),
        },
    };
    let created = provider.create_agreement(&req).await.unwrap();
    assert!(approval_href(&created).unwrap().ends_with("token=EC-0JP008296V451950C"));
}

#[tokio::test]
async fn get_agreement_returns_body() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/payments/billing-agreements/I-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "I-1",
            "state": "Active"
        })))
        .mount(&mock_server)
        .await;

    assert_eq!(provider.get_agreement("I-1").await.unwrap()["state"], "Active");
}

#[tokio::test]
async fn search_transactions_sends_date_range() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/payments/billing-agreements/I-1/transactions"))
        .and(query_param("start_date", "2026-10-19"))
        .and(query_param("end_date", "2026-11-19"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agreement_transaction_list": [{"transaction_id": "I-1", "status": "Created"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let search = TransactionSearch {
        start_date: "2026-10-19".into(),
        end_date: "2026-11-19".into(),
    };
    let found = provider
        .search_agreement_transactions("I-1", &search)
        .await
        .unwrap();
    assert_eq!(found["agreement_transaction_list"][0]["status"], "Created");
}

#[tokio::test]
async fn execute_agreement_posts_empty_object() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(
            "/v1/payments/billing-agreements/EC-0JP008296V451950C/agreement-execute",
        ))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "I-0LN988D3JACS",
            "state": "Active"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let executed = provider
        .execute_agreement("EC-0JP008296V451950C")
        .await
        .unwrap();
    assert_eq!(executed["id"], "I-0LN988D3JACS");
}

#[tokio::test]
async fn cancel_agreement_posts_note() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payments/billing-agreements/I-1/cancel"))
        .and(body_json(json!({"note": "Manually canceled."})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let canceled = provider
        .cancel_agreement("I-1", &AgreementStateNote::new("Manually canceled."))
        .await
        .unwrap();
    assert_eq!(canceled, json!({}));
}

#[tokio::test]
async fn suspend_agreement_posts_note() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payments/billing-agreements/I-1/suspend"))
        .and(body_json(json!({"note": "Manually suspended."})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    provider
        .suspend_agreement("I-1", &AgreementStateNote::new("Manually suspended."))
        .await
        .unwrap();
}

#[tokio::test]
async fn suspend_agreement_conflict_is_api_error() {
    let mock_server = MockServer::start().await;
    let provider = test_provider(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/v1/payments/billing-agreements/I-1/suspend"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": "STATUS_INVALID",
            "message": "Invalid profile status for suspend action; profile should be active"
        })))
        .mount(&mock_server)
        .await;

    let err = provider
        .suspend_agreement("I-1", &AgreementStateNote::new("Manually suspended."))
        .await
        .unwrap_err();
    assert_eq!(err.payload()["response"]["name"], "STATUS_INVALID");
}
