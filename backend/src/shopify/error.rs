use super::graphql::UserError;
use thiserror::Error;

/// Why a draft order could not be created.
///
/// `Transport` covers everything that went wrong before a well-formed reply
/// arrived. The remaining variants are answers from Shopify that did not
/// contain an order.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Shopify request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    Graphql(serde_json::Value),

    #[error("User error: {}", join_user_errors(.0))]
    UserErrors(Vec<UserError>),

    #[error("Malformed draftOrderCreate response: {0}")]
    MalformedResponse(String),
}

impl OrderError {
    /// True when the failure happened at the HTTP level rather than in Shopify's answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, OrderError::Transport(_))
    }

    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::Transport(_) => "transport",
            OrderError::Graphql(_) => "graphql",
            OrderError::UserErrors(_) => "user_errors",
            OrderError::MalformedResponse(_) => "malformed_response",
        }
    }
}

fn join_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
