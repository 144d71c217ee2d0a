// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server for the demo actions.
//!
//! This is a thin adapter: it reads the form post into a `FormSubmission`,
//! restores the previous `ActionState` from the hidden `$state` field, calls
//! the action and renders the resulting state back to HTML.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use formstate::{Action, ActionState, FormSubmission};
use serde::de::DeserializeOwned;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::body_parser::read_submission;
use super::pages::{self, STATE_FIELD};
use crate::config::Config;
use crate::demo::{CounterState, DemoActions, LikeState, LoginState};

/// Shared application state for the demo server.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The demo actions.
    pub actions: DemoActions,
}

/// Builds the router with every demo route, static files and request tracing.
pub fn build_app(config: Config) -> Router {
    let static_dir = PathBuf::from(&config.server.static_dir);
    let state = Arc::new(AppState {
        config,
        actions: DemoActions::new(),
    });

    Router::new()
        .route("/", get(|| async { Redirect::to("/login") }))
        .route("/login", get(login_page).post(login_submit))
        .route("/counter", get(counter_page).post(counter_submit))
        .route("/like", get(like_page).post(like_submit))
        .route("/success", get(success_page))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates and starts the HTTP server.
pub async fn create_server(config: Config) -> anyhow::Result<()> {
    let addr = config.server.addr();
    let app = build_app(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn login_page() -> Response {
    render(pages::login_page(&ActionState::new(LoginState::default())))
}

async fn login_submit(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    match run_action(&state.actions.login, request).await {
        Ok(result) => render(pages::login_page(&result)),
        Err(response) => response,
    }
}

async fn counter_page() -> Response {
    render(pages::counter_page(&ActionState::new(CounterState::default())))
}

async fn counter_submit(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    match run_action(&state.actions.counter, request).await {
        Ok(result) => render(pages::counter_page(&result)),
        Err(response) => response,
    }
}

async fn like_page() -> Response {
    render(pages::like_page(&ActionState::new(LikeState::default())))
}

async fn like_submit(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    match run_action(&state.actions.like, request).await {
        Ok(result) => render(pages::like_page(&result)),
        Err(response) => response,
    }
}

async fn success_page() -> Html<String> {
    Html(pages::success_page())
}

/// Runs `action` for one form post.
///
/// `Err` holds the response to send instead of a page: a 303 for a
/// redirect, or the body parse error.
async fn run_action<S, I>(
    action: &Action<S, I>,
    request: Request<Body>,
) -> Result<ActionState<S>, Response>
where
    S: Clone + Default + DeserializeOwned + Send + 'static,
    I: Send + 'static,
{
    let submission = read_submission(request)
        .await
        .map_err(|e| {
            tracing::warn!("Failed to read form post: {}", e);
            e.into_response()
        })?;

    let previous = restore_state(&submission);

    action.call(previous, &submission).await.map_err(|err| {
        let location = err.location().unwrap_or("/");
        tracing::debug!(%location, "Redirecting after action");
        Redirect::to(location).into_response()
    })
}

/// Sends a rendered page, or a 500 if the state could not be serialized.
fn render(page: Result<String, serde_json::Error>) -> Response {
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize action state: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Previous state from the hidden field, or the initial state if absent or unreadable.
fn restore_state<S: Default + DeserializeOwned>(submission: &FormSubmission) -> ActionState<S> {
    let Some(raw) = submission.get_text(STATE_FIELD) else {
        return ActionState::new(S::default());
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable {} field: {}", STATE_FIELD, e);
        ActionState::new(S::default())
    })
}
