#![forbid(unsafe_code)]

use crate::ApiError;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};

/// `{"data": ..., "errors": [...]}`, the shape of every response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Envelope {
    pub data: Value,
    pub errors: Vec<String>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn failure(error: &ApiError) -> Self {
        Self {
            data: json!({}),
            errors: error.messages(),
        }
    }

    pub fn into_response(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}
