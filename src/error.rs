// src/error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::Display;
use serde::Serialize;

use crate::actions::Action;
use crate::resource::ModelKind;
use crate::models::user::Role;

/// Contract violations raised at the dynamic boundary, plus the denial
/// variant used when a handler wants a decision as a `Result`.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[display(fmt = "Unknown role: {}", _0)]
    UnknownRole(String),
    #[display(fmt = "Unknown model: {}", _0)]
    UnknownModel(String),
    #[display(fmt = "Unknown action: {}", _0)]
    UnknownAction(String),
    #[display(fmt = "Invalid action for model: {} on {}", action, model)]
    InvalidActionForModel { model: ModelKind, action: Action },
    #[display(fmt = "Invalid data: {}", _0)]
    InvalidData(String),
    #[display(fmt = "Forbidden: {} on {}", action, model)]
    Forbidden { model: ModelKind, action: Action },
}

impl std::error::Error for AccessError {}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for AccessError {
    fn status_code(&self) -> StatusCode {
        match self {
            AccessError::Forbidden { .. } => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Faults in a permission table declaration. These surface from
/// [`crate::registry::PermissionTableBuilder::build`], never from a lookup.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate rule for role `{role}` on {model}.{action}")]
    DuplicateRule { role: Role, model: ModelKind, action: Action },
    #[error("model kind `{model}` is bound to more than one data type")]
    ConflictingModelType { model: ModelKind },
}
