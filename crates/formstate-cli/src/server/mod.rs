// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Demo server components.
//!
//! # Components
//!
//! - `body_parser`: form post bodies into submissions
//! - `http`: HTTP server using Axum
//! - `pages`: HTML rendering of action states

/// Request body parsing for form posts.
pub mod body_parser;
/// HTTP server implementation using Axum.
pub mod http;
/// HTML pages for the demo actions.
pub mod pages;
