// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTML pages for the demo actions.
//!
//! Each form carries the serialized [`ActionState`] in a hidden `$state`
//! field, so the next post resumes from the state the page was rendered with.

use formstate::{ActionState, FieldErrors};
use serde::Serialize;

use crate::demo::{CounterState, LikeState, LoginState, DEMO_EMAIL, DEMO_PASSWORD};

/// Name of the hidden field holding the serialized action state.
pub const STATE_FIELD: &str = "$state";

/// Login form, redisplaying the last submission and its errors.
pub fn login_page(state: &ActionState<LoginState>) -> Result<String, serde_json::Error> {
    let form = state.previous_form_data();
    let errors = state.errors().cloned().unwrap_or_default();

    let body = format!(
        r#"<form method="post" action="/login">
    <h1>Login</h1>
    <p class="hint">Note: the email is "{email}" and the password is "{password}".</p>
    {action_errors}
    {state_field}
    <div class="field">
        <label for="email">Email:</label>
        <input id="email" name="email" value="{email_value}">
        {email_errors}
    </div>
    <div class="field">
        <label for="password">Password:</label>
        <input id="password" name="password" type="password" value="{password_value}">
        {password_errors}
    </div>
    <button>Login</button>
</form>"#,
        email = DEMO_EMAIL,
        password = DEMO_PASSWORD,
        action_errors = error_list(&errors.action_errors),
        state_field = state_field(state)?,
        email_value = html_escape(form.get("email").unwrap_or_default()),
        email_errors = field_errors(&errors.form_errors, "email"),
        password_value = html_escape(form.get("password").unwrap_or_default()),
        password_errors = field_errors(&errors.form_errors, "password"),
    );

    Ok(wrap_with_app_html("Login", &body))
}

/// Counter with an increment button.
pub fn counter_page(state: &ActionState<CounterState>) -> Result<String, serde_json::Error> {
    let errors = state.errors().cloned().unwrap_or_default();

    let body = format!(
        r#"<form method="post" action="/counter">
    <h1>Increment Counter</h1>
    {state_field}
    <span class="count">Count: {count}</span>
    {count_errors}
    <button>Increment</button>
</form>"#,
        state_field = state_field(state)?,
        count = state.state().count,
        count_errors = field_errors(&errors.state_errors, "count"),
    );

    Ok(wrap_with_app_html("Increment Counter", &body))
}

/// Like button toggling between "Like" and "Unlike".
pub fn like_page(state: &ActionState<LikeState>) -> Result<String, serde_json::Error> {
    let label = if state.state().like_id.is_some() {
        "Unlike"
    } else {
        "Like"
    };

    let body = format!(
        r#"<form method="post" action="/like">
    <h1>Like Button</h1>
    <p>Imagine this is a like button on a social media platform.</p>
    {state_field}
    <button>{label}</button>
</form>"#,
        state_field = state_field(state)?,
        label = label,
    );

    Ok(wrap_with_app_html("Like Button", &body))
}

/// Target of the login redirect.
pub fn success_page() -> String {
    wrap_with_app_html(
        "Success",
        r#"<main>
    <h1>Your action was successful!</h1>
    <a href="/login">Go back</a>
</main>"#,
    )
}

/// Hidden input carrying the serialized state.
///
/// A state that cannot be serialized is an error: an empty field would
/// silently reset the next post to the initial state.
fn state_field<S: Serialize>(state: &ActionState<S>) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(state)?;
    Ok(format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        STATE_FIELD,
        html_escape(&json)
    ))
}

fn field_errors(errors: &FieldErrors, field: &str) -> String {
    error_list(errors.get(field))
}

fn error_list(messages: &[String]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let items: String = messages
        .iter()
        .map(|m| format!("<li>{}</li>", html_escape(m)))
        .collect();
    format!(r#"<ul class="errors">{}</ul>"#, items)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn wrap_with_app_html(title: &str, body: &str) -> String {
    APP_HTML
        .replace("%formstate.title%", title)
        .replace("%formstate.body%", body)
}

const APP_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%formstate.title%</title>
    <style>
        body { font-family: system-ui, sans-serif; padding: 2rem; max-width: 32rem; }
        form { display: flex; flex-direction: column; gap: 1rem; }
        .field { display: flex; flex-direction: column; gap: 0.25rem; }
        .errors { color: #e53e3e; margin: 0; padding-left: 1rem; }
        .hint { color: #666; font-style: italic; }
    </style>
</head>
<body>
    <nav>
        <a href="/login">Login</a> | <a href="/counter">Counter</a> | <a href="/like">Like</a>
    </nav>
    %formstate.body%
</body>
</html>
"#;
