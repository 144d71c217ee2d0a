// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types returned by action handlers.
//!
//! Handlers fail with an [`ActionError`]. The action turns every failure into
//! a message on the returned state, except the redirect signal, which is a
//! request for the host to navigate and is handed back untouched.
//!
//! # Redirects
//!
//! A redirect is either built with [`redirect`], or any error whose message is
//! exactly [`REDIRECT_SENTINEL`]. Hosts that signal navigation by raising an
//! error with that message keep working when it passes through an action.

use std::sync::Arc;
use thiserror::Error;

/// Message that marks an error as a navigation signal rather than a failure.
pub const REDIRECT_SENTINEL: &str = "NEXT_REDIRECT";

/// Message used when a failure carries no usable text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// A failure raised by an action handler.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// The handler asked the host to navigate to `location`.
    #[error("{}", REDIRECT_SENTINEL)]
    Redirect {
        /// Target URL or path.
        location: String,
    },

    /// A failure with a plain message.
    #[error("{0}")]
    Message(String),

    /// A failure wrapping another error; its `Display` output is the message.
    #[error("{0}")]
    Source(Arc<dyn std::error::Error + Send + Sync>),

    /// A failure without any message.
    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Unknown,
}

impl ActionError {
    /// Creates a failure with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        ActionError::Message(message.into())
    }

    /// Wraps any error type.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ActionError::Source(Arc::new(err))
    }

    /// Creates a redirect signal to `location`.
    pub fn redirect(location: impl Into<String>) -> Self {
        ActionError::Redirect {
            location: location.into(),
        }
    }

    /// Returns true if this error is the navigation signal.
    pub fn is_redirect(&self) -> bool {
        match self {
            ActionError::Redirect { .. } => true,
            ActionError::Message(message) => message == REDIRECT_SENTINEL,
            ActionError::Source(err) => err.to_string() == REDIRECT_SENTINEL,
            ActionError::Unknown => false,
        }
    }

    /// Redirect target, if this error was built with a location.
    pub fn location(&self) -> Option<&str> {
        match self {
            ActionError::Redirect { location } => Some(location),
            _ => None,
        }
    }

    /// The error's own message. Empty messages count as none.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            ActionError::Redirect { .. } => REDIRECT_SENTINEL.to_string(),
            ActionError::Message(message) => message.clone(),
            ActionError::Source(err) => err.to_string(),
            ActionError::Unknown => return None,
        };
        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        ActionError::Message(message)
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        ActionError::Message(message.to_string())
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::other(err)
    }
}

/// Creates a redirect signal, for use as `return Err(redirect("/done"))`.
pub fn redirect(location: impl Into<String>) -> ActionError {
    ActionError::redirect(location)
}

/// Convenience alias for handler results.
pub type ActionResult<T> = std::result::Result<T, ActionError>;
