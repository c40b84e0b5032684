// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("invalid prefix: {0:?}")]
    InvalidPrefix(String),
    #[error("route already registered: {0} {1}")]
    DuplicateRoute(String, String),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("IAM user not found: {0}")]
    CredentialsNotFound(String),
    #[error("unable to serialize security credentials")]
    SerializationError,
}

impl IntoResponse for AppError {
    // Metadata responses never carry an error document, only a status.
    fn into_response(self) -> Response {
        let status = match self {
            Self::CredentialsNotFound(_) | Self::SerializationError => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidPrefix(_)
            | Self::DuplicateRoute(_, _)
            | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        status.into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(source: serde_json::Error) -> Self {
        tracing::error!(
            "[metadata] error converting security credentials to json: {:?}",
            source
        );
        AppError::SerializationError
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(source: validator::ValidationErrors) -> Self {
        AppError::ValidationError(source.to_string())
    }
}
