use serde::{Deserialize, Serialize};

/// A draft order as reported back by the commerce platform.
///
/// Both fields are passed through untouched. `name` is the human readable
/// handle shown in the store admin (e.g. `#D1001`) and is what the stored
/// upload gets named after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    /// Opaque global id, e.g. `gid://shopify/DraftOrder/1`.
    pub id: String,
    pub name: String,
}
