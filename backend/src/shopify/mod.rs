//! # Shopify Order Submitter
//!
//! Turns a print request into a draft order through the Shopify Admin GraphQL
//! API. One request goes out per call; there are no retries and no
//! idempotency key, so submitting the same form twice yields two orders.
//!
//! The route handlers only see the [`DraftOrderGateway`] trait. `main` wires in
//! [`ShopifyClient`]; tests swap in a recording fake.

mod client;
mod error;
mod graphql;

pub use client::ShopifyClient;
pub use error::OrderError;
pub use graphql::UserError;

use async_trait::async_trait;
use common::model::draft_order::DraftOrder;
use common::model::print_request::PrintRequest;

/// Creates draft orders on the commerce platform.
#[async_trait]
pub trait DraftOrderGateway: Send + Sync {
    /// Creates exactly one draft order for `request` and returns its id and name as reported.
    async fn create_draft_order(&self, request: &PrintRequest) -> Result<DraftOrder, OrderError>;
}
