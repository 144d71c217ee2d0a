// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request body parsing into form submissions.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use formstate::{parse_form_body, FormSubmission};

/// Maximum body size to accept (1MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Errors that can occur while reading a form post.
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    /// The body exceeded the size limit.
    #[error("Request body too large")]
    TooLarge,
    /// The body could not be parsed as form data.
    #[error(transparent)]
    Form(#[from] formstate::BodyParseError),
}

impl IntoResponse for BodyParseError {
    fn into_response(self) -> Response {
        let status = match self {
            BodyParseError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            BodyParseError::Form(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// Reads the request body as a form submission based on its Content-Type.
pub async fn read_submission(request: Request<Body>) -> Result<FormSubmission, BodyParseError> {
    let (parts, body) = request.into_parts();

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let body_bytes = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|_| BodyParseError::TooLarge)?;

    Ok(parse_form_body(&body_bytes, content_type)?)
}
