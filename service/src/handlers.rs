// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Response production for each [`Handler`].
//!
//! Every handler is a read-only projection of the [`MetadataStore`]. Plain-text
//! bodies are written exactly as configured, with no trailing newline, except
//! user-data where each entry is its own `key=value\n` line.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::constants::{
    CONTENT_TYPE_JSON, CONTENT_TYPE_TEXT, IAM_BODY, METADATA_INDEX_ITEMS, METADATA_ROOT_BODY,
};
use crate::errors::AppError;
use crate::models::MetadataStore;
use crate::routes::{Handler, metadata_version};

impl Handler {
    /// Produces the response for one request. `username` is the value bound to
    /// the `{username}` path segment, if the route has one.
    pub fn respond(&self, store: &MetadataStore, username: Option<&str>) -> Response {
        match self {
            Handler::MetadataRoot => plain_text(METADATA_ROOT_BODY),
            Handler::MetadataIndex => plain_text(metadata_index()),
            Handler::Attribute(attribute) => plain_text(attribute.value(&store.values)),
            Handler::SecurityGroups => plain_text(store.values.security_groups.join("\n")),
            Handler::Iam => plain_text(IAM_BODY),
            Handler::MovedPermanently(location) => moved_permanently(location),
            Handler::CredentialsList => plain_text(store.credentials().user.as_str()),
            Handler::CredentialDetails => match credential_details(store, username) {
                Ok(response) => response,
                Err(err) => err.into_response(),
            },
            Handler::UserData => plain_text(user_data(store)),
            Handler::VersionIndex => plain_text(version_index(store)),
        }
    }
}

fn plain_text(body: impl Into<String>) -> Response {
    ([(header::CONTENT_TYPE, CONTENT_TYPE_TEXT)], body.into()).into_response()
}

fn moved_permanently(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

pub fn metadata_index() -> String {
    METADATA_INDEX_ITEMS.join("\n")
}

/// One `key=value\n` line per entry. Line order is not part of the contract.
pub fn user_data(store: &MetadataStore) -> String {
    store
        .userdata_values
        .iter()
        .map(|(key, value)| format!("{key}={value}\n"))
        .collect()
}

pub fn version_index(store: &MetadataStore) -> String {
    store
        .metadata_prefixes
        .iter()
        .filter_map(|prefix| metadata_version(prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the configured credential bundle if `username` names it exactly.
///
/// A request whose `{username}` segment could not be extracted never matches,
/// even when the configured user name is empty.
///
/// # Errors
///
/// - [`AppError::CredentialsNotFound`] - `username` is absent or not the configured user
/// - [`AppError::SerializationError`] - the bundle could not be encoded
#[tracing::instrument(skip(store))]
pub fn credential_details(
    store: &MetadataStore,
    username: Option<&str>,
) -> Result<Response, AppError> {
    let credentials = store.credentials();

    let username = match username {
        Some(username) if username == credentials.user => username,
        other => {
            tracing::error!("[metadata] error, IAM user not found: {:?}", other);
            return Err(AppError::CredentialsNotFound(
                other.unwrap_or_default().to_string(),
            ));
        }
    };

    let mut body = serde_json::to_string_pretty(credentials)?;
    body.push('\n');

    tracing::info!("[metadata] returning security credentials for {}", username);

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE_JSON)], body).into_response())
}
