//! # Print Request Upload
//!
//! Backend logic for `POST /print-request`.
//!
//! ## Workflow
//!
//! 1.  **Reading**: `read_form` walks the multipart body. A model with an acceptable
//!     name is streamed into a hidden `.upload-*.part` temp file inside the upload
//!     directory; any other `file` part is drained without touching the disk. Text
//!     fields are collected as they arrive. Size limits are only noted here.
//!
//! 2.  **Validation**: `validate` decides between `No file part`, `No selected file`
//!     and `Invalid file type`, and only then reports an exceeded size limit. A
//!     rejected request never reaches Shopify.
//!
//! 3.  **Draft Order**: the [`DraftOrderGateway`] creates one draft order. Any failure
//!     ends the request with a `500` and the temp file is dropped.
//!
//! 4.  **Storage**: the temp file is renamed to `Order_<number>.<ext>` and the handler
//!     answers with the order name.

use super::error::PrintRequestError;
use super::filename::{allowed_file, order_file_name, secure_filename};
use crate::config::UploadSettings;
use crate::shopify::DraftOrderGateway;
use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::model::draft_order::DraftOrder;
use common::model::print_request::PrintRequest;
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Upper bound for a single metadata field such as `notes`.
const MAX_FIELD_BYTES: usize = 64 * 1024;

/// The multipart part carrying the model.
const FILE_FIELD: &str = "file";

/// The `file` part as received.
///
/// `spool` holds the bytes next to their final destination. It is `None` when
/// the filename was already unacceptable or the upload went over the limit.
struct ReceivedFile {
    filename: String,
    size: usize,
    spool: Option<NamedTempFile>,
}

#[derive(Default)]
struct ReceivedForm {
    file: Option<ReceivedFile>,
    fields: Vec<(String, String)>,
    field_too_large: bool,
}

/// A request that passed validation and may create an order.
struct ValidUpload {
    request: PrintRequest,
    extension: String,
    spool: NamedTempFile,
}

/// Where an accepted upload ended up.
#[derive(Debug)]
pub struct StoredUpload {
    pub order: DraftOrder,
    pub filename: String,
    pub path: PathBuf,
}

/// HTTP handler for `POST /print-request`.
///
/// - On success: `200 OK` naming the created draft order.
/// - On a client mistake: `400`/`413` with a short plain-text reason.
/// - On any remote or storage failure: `500` with no detail.
pub async fn process(
    payload: Multipart,
    gateway: web::Data<dyn DraftOrderGateway>,
    settings: web::Data<UploadSettings>,
) -> impl Responder {
    match handle_print_request(payload, gateway.get_ref(), &settings).await {
        Ok(stored) => {
            info!("{} saved | Draft Order: {}", stored.filename, stored.order.name);
            debug!("Stored upload at {}", stored.path.display());
            HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(format!(
                    "Upload received. Draft order created: {}",
                    stored.order.name
                ))
        }
        Err(PrintRequestError::Order(e)) => {
            if e.is_transport() {
                error!("Draft order request did not go through: {}", e);
            } else {
                error!("Shopify rejected draft order ({}): {}", e.kind(), e);
            }
            PrintRequestError::Order(e).error_response()
        }
        Err(e) => {
            if e.status_code().is_server_error() {
                error!("Print request failed: {}", e);
            } else {
                warn!("Rejected print request: {}", e);
            }
            e.error_response()
        }
    }
}

/// Validates the form, creates the draft order and only then stores the model.
///
/// Nothing is left on disk unless the order was created. The reverse does
/// not hold: if the final rename fails the order already exists and is
/// reported in the log for manual follow-up.
pub async fn handle_print_request(
    payload: Multipart,
    gateway: &dyn DraftOrderGateway,
    settings: &UploadSettings,
) -> Result<StoredUpload, PrintRequestError> {
    let form = read_form(payload, settings).await?;
    let upload = validate(form)?;

    let order = gateway.create_draft_order(&upload.request).await?;

    let filename = secure_filename(&order_file_name(&order.name, &upload.extension));
    let path = settings.upload_dir.join(&filename);

    if let Err(e) = upload.spool.persist(&path) {
        error!(
            "Draft order {} ({}) was created but its upload could not be saved to {}: {}",
            order.name,
            order.id,
            path.display(),
            e.error
        );
        return Err(PrintRequestError::Storage(e.error));
    }

    Ok(StoredUpload { order, filename, path })
}

/// Checks the received form in a fixed order so the first problem found is the one reported.
fn validate(form: ReceivedForm) -> Result<ValidUpload, PrintRequestError> {
    let file = form.file.ok_or(PrintRequestError::NoFilePart)?;

    if file.filename.is_empty() {
        return Err(PrintRequestError::NoSelectedFile);
    }
    let extension = allowed_file(&file.filename)
        .ok_or(PrintRequestError::InvalidFileType)?
        .to_string();
    if file.size == 0 {
        return Err(PrintRequestError::InvalidFileType);
    }
    // An acceptable name only loses its spool by going over the limit.
    let spool = file.spool.ok_or(PrintRequestError::FileTooLarge)?;
    if form.field_too_large {
        return Err(PrintRequestError::FieldTooLarge);
    }

    Ok(ValidUpload {
        request: PrintRequest::from_fields(form.fields),
        extension,
        spool,
    })
}

/// Reads every part of the body.
///
/// The first `file` part that carries a filename is received; the metadata
/// fields are collected in arrival order; everything else is drained. Going
/// over a size limit does not stop the walk, so `validate` can still report
/// the earlier problems first.
async fn read_form(
    mut payload: Multipart,
    settings: &UploadSettings,
) -> Result<ReceivedForm, PrintRequestError> {
    let mut form = ReceivedForm::default();

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            // No usable multipart body, so there is no file part to find.
            Err(
                MultipartError::ContentTypeMissing
                | MultipartError::ContentTypeIncompatible
                | MultipartError::BoundaryMissing,
            ) => return Ok(form),
            Err(e) => return Err(PrintRequestError::Multipart(e)),
        };

        let disposition = field.content_disposition();
        let name = disposition.and_then(|cd| cd.get_name().map(str::to_string));
        let filename = disposition.and_then(|cd| cd.get_filename().map(str::to_string));

        match (name.as_deref(), filename) {
            (Some(FILE_FIELD), Some(filename)) if form.file.is_none() => {
                form.file = Some(receive_file(&mut field, filename, settings).await?);
            }
            (Some(key), None) if PrintRequest::FIELDS.contains(&key) => {
                match read_text(&mut field).await? {
                    Some(value) => form.fields.push((key.to_string(), value)),
                    None => form.field_too_large = true,
                }
            }
            _ => drain(&mut field).await?,
        }
    }

    Ok(form)
}

async fn receive_file(
    field: &mut Field,
    filename: String,
    settings: &UploadSettings,
) -> Result<ReceivedFile, PrintRequestError> {
    if filename.is_empty() || allowed_file(&filename).is_none() {
        drain(field).await?;
        return Ok(ReceivedFile { filename, size: 0, spool: None });
    }

    let mut spool = Some(
        tempfile::Builder::new()
            .prefix(".upload-")
            .suffix(".part")
            .tempfile_in(&settings.upload_dir)?,
    );
    let mut size = 0usize;

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(PrintRequestError::Multipart)?;
        size += chunk.len();
        if size > settings.max_upload_bytes {
            // Dropping the spool removes the partial file; the rest is drained.
            spool = None;
        }
        if let Some(spool) = spool.as_mut() {
            spool.write_all(&chunk)?;
        }
    }
    if let Some(spool) = spool.as_mut() {
        spool.flush()?;
    }

    Ok(ReceivedFile { filename, size, spool })
}

/// Reads a metadata field, or drains it and returns `None` when it is over the cap.
async fn read_text(field: &mut Field) -> Result<Option<String>, PrintRequestError> {
    let mut bytes = Vec::new();
    let mut too_large = false;
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(PrintRequestError::Multipart)?;
        if too_large || bytes.len() + chunk.len() > MAX_FIELD_BYTES {
            too_large = true;
            bytes.clear();
            continue;
        }
        bytes.extend_from_slice(&chunk);
    }
    if too_large {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

async fn drain(field: &mut Field) -> Result<(), PrintRequestError> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(PrintRequestError::Multipart)?;
    }
    Ok(())
}
