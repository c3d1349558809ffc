//! Customer API route handlers.
//!
//! JSON endpoints over the customer store. All four verbs share the
//! `/api/customers` path; update and delete address the record by `id`.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use customer_sheets_core::types::cell::json_to_cell;
use customer_sheets_core::{CustomerId, CustomerPatch, CustomerRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

const ID_REQUIRED: &str = "id is required";

/// Acknowledgement body for update and delete.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Query parameters for delete.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// List every customer in sheet order.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomerRecord>>> {
    let records = state.customers().read_all(state.sheet_name()).await?;
    Ok(Json(records))
}

/// Create a customer.
///
/// Only known fields are kept. A missing or empty `id` is replaced with a
/// generated UUID, and a zero `visitCount` is dropped. A body that is not a
/// customer JSON object is a server error.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<CustomerRecord>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerRecord>)> {
    let Json(record) = body.map_err(unreadable_body)?;
    let record = prepare_new(record);
    state
        .customers()
        .append(state.sheet_name(), &record)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update the fields present in the body of the customer named by its `id`.
///
/// A body that is not JSON is a server error; a missing `id` is checked after.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(body) = body.map_err(unreadable_body)?;
    let id = body
        .get("id")
        .and_then(json_to_cell)
        .filter(|id| !id.is_empty())
        .map(CustomerId::from)
        .ok_or_else(|| AppError::BadRequest(ID_REQUIRED.to_string()))?;
    let patch: CustomerPatch =
        serde_json::from_value(body).map_err(|e| AppError::Internal(e.to_string()))?;

    state
        .customers()
        .update(state.sheet_name(), &id, &patch)
        .await?;
    Ok(Json(MessageResponse { message: "updated" }))
}

/// Delete the customer named by the `id` query parameter.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<MessageResponse>> {
    let id = params
        .id
        .filter(|id| !id.is_empty())
        .map(CustomerId::from)
        .ok_or_else(|| AppError::BadRequest(ID_REQUIRED.to_string()))?;

    state.customers().delete(state.sheet_name(), &id).await?;
    Ok(Json(MessageResponse { message: "deleted" }))
}

/// Shape a posted record before it is stored.
fn prepare_new(mut record: CustomerRecord) -> CustomerRecord {
    if record.id.is_empty() {
        record.id = CustomerId::generate();
    }
    record.visit_count = record.visit_count.filter(|count| count.abs() > 0.0);
    record.extra.clear();
    record.unnamed.clear();
    record
}

fn unreadable_body(rejection: JsonRejection) -> AppError {
    AppError::Internal(rejection.body_text())
}
