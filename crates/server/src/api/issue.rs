#![forbid(unsafe_code)]

use crate::envelope::Envelope;
use crate::normalize;
use crate::{ApiError, AppState};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use serde_json::{Value, json};
use tissue_storage::{SqliteStore, StoreError};
use tracing::{error, info, warn};

pub(super) async fn get_issue(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    respond("get", StatusCode::OK, fetch(&state, &path).await)
}

pub(super) async fn post_issues(
    state: web::Data<AppState>,
    payload: web::Payload,
) -> HttpResponse {
    respond("create", StatusCode::CREATED, create(&state, payload).await)
}

pub(super) async fn put_issues(state: web::Data<AppState>, payload: web::Payload) -> HttpResponse {
    respond("replace", StatusCode::OK, replace(&state, payload).await)
}

pub(super) async fn patch_issues(
    state: web::Data<AppState>,
    payload: web::Payload,
) -> HttpResponse {
    respond("patch", StatusCode::OK, patch(&state, payload).await)
}

pub(super) async fn delete_issue(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    respond("delete", StatusCode::OK, delete(&state, &path).await)
}

pub(super) async fn unknown_route(req: HttpRequest) -> HttpResponse {
    reject(
        "route",
        ApiError::NotFound(format!("no route for {} {}", req.method(), req.path())),
    )
}

pub(super) async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    reject(
        "route",
        ApiError::MethodNotAllowed(format!(
            "method {} is not allowed on {}",
            req.method(),
            req.path()
        )),
    )
}

async fn fetch(state: &AppState, raw_id: &str) -> Result<Value, ApiError> {
    let id = path_id(raw_id)?;
    match with_store(state, move |store| store.fetch_issue(id)).await? {
        Some(issue) => Ok(normalize::issue_json(&issue)),
        None => Err(ApiError::NotFound(format!("issue #{id} does not exist"))),
    }
}

async fn create(state: &AppState, payload: web::Payload) -> Result<Value, ApiError> {
    let body = read_body(payload, state.body_limit()).await?;
    let payload = normalize::parse_payload(&body)?;
    let requests = normalize::create_requests(&payload)?;
    let issues = with_store(state, move |store| store.create_issues(requests)).await?;
    Ok(normalize::issues_json(&issues))
}

async fn replace(state: &AppState, payload: web::Payload) -> Result<Value, ApiError> {
    let body = read_body(payload, state.body_limit()).await?;
    let payload = normalize::parse_payload(&body)?;
    let requests = normalize::replace_requests(&payload)?;
    let issues = with_store(state, move |store| store.replace_issues(requests)).await?;
    Ok(normalize::issues_json(&issues))
}

async fn patch(state: &AppState, payload: web::Payload) -> Result<Value, ApiError> {
    let body = read_body(payload, state.body_limit()).await?;
    let payload = normalize::parse_payload(&body)?;
    let requests = normalize::patch_requests(&payload)?;
    let issues = with_store(state, move |store| store.patch_issues(requests)).await?;
    Ok(normalize::issues_json(&issues))
}

async fn delete(state: &AppState, raw_id: &str) -> Result<Value, ApiError> {
    let id = path_id(raw_id)?;
    with_store(state, move |store| store.delete_issue(id)).await?;
    Ok(json!({}))
}

/// Buffers the request body, refusing anything over `limit` bytes.
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, ApiError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|err| ApiError::SchemaInvalid(format!("failed to read request body: {err}")))?;
        if body.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(format!(
                "request body exceeds {limit} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Non-integer ids never name an issue.
fn path_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::NotFound(format!("issue #{raw} does not exist")))
}

/// Runs `op` on a store handle opened for this request only. The handle is
/// dropped when `op` returns, on success and on error alike.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut SqliteStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let outcome = web::block(move || {
        let mut store = state.open_store()?;
        op(&mut store)
    })
    .await;

    match outcome {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => Err(ApiError::Unexpected(format!(
            "store task did not complete: {err}"
        ))),
    }
}

fn respond(op: &'static str, success: StatusCode, result: Result<Value, ApiError>) -> HttpResponse {
    match result {
        Ok(data) => {
            let items = data.as_array().map_or(1, Vec::len);
            info!(op, status = success.as_u16(), items, "request completed");
            Envelope::ok(data).into_response(success)
        }
        Err(err) => reject(op, err),
    }
}

fn reject(op: &'static str, err: ApiError) -> HttpResponse {
    let status = err.status();
    if status.is_server_error() {
        error!(op, status = status.as_u16(), error = %err, "request failed");
    } else {
        warn!(op, status = status.as_u16(), error = %err, "request rejected");
    }
    Envelope::failure(&err).into_response(status)
}
