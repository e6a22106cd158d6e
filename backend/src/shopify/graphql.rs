//! Wire shapes of the `draftOrderCreate` mutation.

use common::model::draft_order::DraftOrder;
use serde::{Deserialize, Serialize};
use std::fmt;

pub(crate) const DRAFT_ORDER_CREATE: &str = r#"
mutation draftOrderCreate($input: DraftOrderInput!) {
  draftOrderCreate(input: $input) {
    draftOrder {
      id
      name
    }
    userErrors {
      field
      message
    }
  }
}
"#;

pub(crate) const PRINT_REQUEST_TAG: &str = "3D Print Request";
pub(crate) const PENDING_LINE_ITEM_TITLE: &str = "Custom 3D Print (Pending Pricing)";
// Real pricing is set by staff once they have looked at the model.
pub(crate) const PENDING_UNIT_PRICE: &str = "0.00";

#[derive(Serialize, Debug)]
pub(crate) struct GraphqlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Serialize, Debug)]
pub(crate) struct DraftOrderCreateVariables {
    pub input: DraftOrderInput,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftOrderInput {
    pub note: String,
    pub tags: Vec<&'static str>,
    pub line_items: Vec<DraftOrderLineItem>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftOrderLineItem {
    pub title: &'static str,
    pub original_unit_price: &'static str,
    pub quantity: u32,
}

impl DraftOrderInput {
    /// One zero-priced placeholder line item, tagged as a print request.
    pub fn pending_print(note: String) -> Self {
        Self {
            note,
            tags: vec![PRINT_REQUEST_TAG],
            line_items: vec![DraftOrderLineItem {
                title: PENDING_LINE_ITEM_TITLE,
                original_unit_price: PENDING_UNIT_PRICE,
                quantity: 1,
            }],
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct DraftOrderCreateData {
    #[serde(rename = "draftOrderCreate")]
    pub draft_order_create: Option<DraftOrderCreatePayload>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DraftOrderCreatePayload {
    #[serde(rename = "draftOrder")]
    pub draft_order: Option<DraftOrder>,
    #[serde(rename = "userErrors", default)]
    pub user_errors: Vec<UserError>,
}

/// A validation complaint returned next to an otherwise successful response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// Path to the offending input field, if Shopify names one.
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variables_use_shopify_field_names() {
        let variables = DraftOrderCreateVariables {
            input: DraftOrderInput::pending_print("hello".into()),
        };

        assert_eq!(
            serde_json::to_value(&variables).unwrap(),
            json!({
                "input": {
                    "note": "hello",
                    "tags": ["3D Print Request"],
                    "lineItems": [{
                        "title": "Custom 3D Print (Pending Pricing)",
                        "originalUnitPrice": "0.00",
                        "quantity": 1
                    }]
                }
            })
        );
    }

    #[test]
    fn payload_without_user_errors_key_defaults_to_empty() {
        let data: DraftOrderCreateData = serde_json::from_value(json!({
            "draftOrderCreate": { "draftOrder": { "id": "gid://shopify/DraftOrder/1", "name": "#D1" } }
        }))
        .unwrap();

        let payload = data.draft_order_create.unwrap();
        assert!(payload.user_errors.is_empty());
        assert_eq!(payload.draft_order.unwrap().name, "#D1");
    }
}
