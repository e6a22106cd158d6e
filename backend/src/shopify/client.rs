use super::error::OrderError;
use super::graphql::{
    DraftOrderCreateData, DraftOrderCreateVariables, DraftOrderInput, GraphqlRequest,
    DRAFT_ORDER_CREATE,
};
use super::DraftOrderGateway;
use crate::config::ShopifyConfig;
use async_trait::async_trait;
use common::model::draft_order::DraftOrder;
use common::model::print_request::PrintRequest;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// [`DraftOrderGateway`] backed by the Shopify Admin GraphQL API.
#[derive(Clone)]
pub struct ShopifyClient {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl ShopifyClient {
    pub fn new(config: &ShopifyConfig) -> Result<Self, OrderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.graphql_url(),
            access_token: config.access_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DraftOrderGateway for ShopifyClient {
    async fn create_draft_order(&self, request: &PrintRequest) -> Result<DraftOrder, OrderError> {
        let body = GraphqlRequest {
            query: DRAFT_ORDER_CREATE,
            variables: DraftOrderCreateVariables {
                input: DraftOrderInput::pending_print(request.order_note()),
            },
        };
        debug!("Creating draft order via {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let raw: Value = response
            .json()
            .await
            .map_err(|e| OrderError::MalformedResponse(e.to_string()))?;

        info!("GraphQL response: {}", raw);

        parse_draft_order_response(raw)
    }
}

/// Checks the response envelope in order: top-level `errors`, then
/// `userErrors`, then the order itself.
fn parse_draft_order_response(mut raw: Value) -> Result<DraftOrder, OrderError> {
    if let Some(errors) = raw.get("errors").filter(|e| is_present(e)) {
        return Err(OrderError::Graphql(errors.clone()));
    }

    let data = match raw.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => data,
        _ => return Err(OrderError::MalformedResponse("missing `data`".into())),
    };
    let data: DraftOrderCreateData = serde_json::from_value(data)
        .map_err(|e| OrderError::MalformedResponse(e.to_string()))?;
    let payload = data
        .draft_order_create
        .ok_or_else(|| OrderError::MalformedResponse("missing `draftOrderCreate`".into()))?;

    if !payload.user_errors.is_empty() {
        return Err(OrderError::UserErrors(payload.user_errors));
    }

    payload
        .draft_order
        .ok_or_else(|| OrderError::MalformedResponse("`draftOrder` is null".into()))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn config_for(server: &MockServer) -> ShopifyConfig {
        ShopifyConfig {
            store_domain: server.base_url(),
            access_token: "shpat_test".into(),
            api_version: "2023-10".into(),
            timeout: Some(Duration::from_secs(5)),
        }
    }

    fn jane() -> PrintRequest {
        PrintRequest {
            infill: "20".into(),
            name: "Jane Doe".into(),
            contact_str: "jane@example.com".into(),
            contact_type: "email".into(),
            notes: "Rush order".into(),
        }
    }

    fn created(name: &str) -> Value {
        json!({
            "data": {
                "draftOrderCreate": {
                    "draftOrder": { "id": "gid://shopify/DraftOrder/1001", "name": name },
                    "userErrors": []
                }
            }
        })
    }

    #[actix_web::test]
    async fn sends_mutation_and_returns_order() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/admin/api/2023-10/graphql.json")
                    .header("x-shopify-access-token", "shpat_test")
                    .header("content-type", "application/json")
                    .json_body_partial(
                        r##"{
                            "variables": {
                                "input": {
                                    "note": "Contact name: Jane Doe\nemail: jane@example.com\nInfill: 20%\n\nRush order",
                                    "tags": ["3D Print Request"],
                                    "lineItems": [{
                                        "title": "Custom 3D Print (Pending Pricing)",
                                        "originalUnitPrice": "0.00",
                                        "quantity": 1
                                    }]
                                }
                            }
                        }"##,
                    )
                    .body_contains("draftOrderCreate(input: $input)");
                then.status(200).json_body(created("#D1001"));
            })
            .await;

        let client = ShopifyClient::new(&config_for(&server)).unwrap();
        let order = client.create_draft_order(&jane()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            order,
            DraftOrder { id: "gid://shopify/DraftOrder/1001".into(), name: "#D1001".into() }
        );
    }

    #[actix_web::test]
    async fn non_success_status_is_a_transport_error() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(401).body("[API] Invalid API key or access token");
            })
            .await;

        let client = ShopifyClient::new(&config_for(&server)).unwrap();
        let err = client.create_draft_order(&jane()).await.unwrap_err();

        assert!(err.is_transport(), "unexpected error: {err}");
        // One attempt only.
        mock.assert_hits_async(1).await;
    }

    #[actix_web::test]
    async fn top_level_errors_fail_the_call() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
                }));
            })
            .await;

        let client = ShopifyClient::new(&config_for(&server)).unwrap();
        let err = client.create_draft_order(&jane()).await.unwrap_err();

        assert!(matches!(err, OrderError::Graphql(_)));
        assert!(!err.is_transport());
    }

    #[actix_web::test]
    async fn user_errors_fail_the_call() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({
                    "data": {
                        "draftOrderCreate": {
                            "draftOrder": null,
                            "userErrors": [{ "field": ["input", "note"], "message": "Note is too long" }]
                        }
                    }
                }));
            })
            .await;

        let client = ShopifyClient::new(&config_for(&server)).unwrap();
        match client.create_draft_order(&jane()).await {
            Err(OrderError::UserErrors(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].message, "Note is too long");
            }
            other => panic!("expected user errors, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("<html>maintenance</html>");
            })
            .await;

        let client = ShopifyClient::new(&config_for(&server)).unwrap();
        let err = client.create_draft_order(&jane()).await.unwrap_err();
        assert!(matches!(err, OrderError::MalformedResponse(_)));
    }

    #[actix_web::test]
    async fn identical_submissions_create_two_orders() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(created("#D1001"));
            })
            .await;

        let client = ShopifyClient::new(&config_for(&server)).unwrap();
        client.create_draft_order(&jane()).await.unwrap();
        client.create_draft_order(&jane()).await.unwrap();

        // No deduplication: each submission is its own mutation.
        mock.assert_hits_async(2).await;
    }

    #[test]
    fn empty_errors_list_is_ignored() {
        let mut raw = created("#D7");
        raw["errors"] = json!([]);
        assert_eq!(parse_draft_order_response(raw).unwrap().name, "#D7");
    }

    #[test]
    fn top_level_errors_win_over_data() {
        let mut raw = created("#D7");
        raw["errors"] = json!([{ "message": "partial failure" }]);
        assert!(matches!(parse_draft_order_response(raw), Err(OrderError::Graphql(_))));
    }

    #[test]
    fn null_draft_order_without_user_errors_is_malformed() {
        let raw = json!({ "data": { "draftOrderCreate": { "draftOrder": null, "userErrors": [] } } });
        assert!(matches!(
            parse_draft_order_response(raw),
            Err(OrderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_data_is_malformed() {
        assert!(matches!(
            parse_draft_order_response(json!({})),
            Err(OrderError::MalformedResponse(_))
        ));
    }
}
