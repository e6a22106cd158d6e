//! Intake of 3D print requests.
//!
//! `POST /print-request` takes a `multipart/form-data` body with a `file` part
//! (an `.stl` or `.obj` model) and the optional text fields `infill`, `name`,
//! `contact_str`, `contact_type` and `notes`. A draft order is created on
//! Shopify for every accepted request and the model is stored in the upload
//! directory as `Order_<order number>.<extension>`.
//!
//! Validation happens before any remote call, in this order:
//! - no `file` part: `400 No file part`
//! - empty filename: `400 No selected file`
//! - empty file or extension other than `stl`/`obj`: `400 Invalid file type`

use actix_web::web::{post, resource};
use actix_web::Resource;

mod error;
mod filename;
mod upload;

const API_PATH: &str = "/print-request";

/// Configures and returns the Actix resource for the print request endpoint.
pub fn configure_routes() -> Resource {
    resource(API_PATH).route(post().to(upload::process))
}
