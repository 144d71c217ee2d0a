// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! formstate demo host library.
//!
//! Serves the formstate example actions over plain HTML forms, with no
//! client-side script: every post round-trips the action state through a
//! hidden field.
//!
//! # Usage
//!
//! This crate is primarily used through the `formstate` binary:
//!
//! ```bash
//! formstate serve          # Start the demo server
//! formstate check-config   # Print the resolved configuration
//! ```
//!
//! # Configuration
//!
//! The server is configured via `formstate.toml` in the working directory.

/// CLI commands (serve, check-config).
pub mod commands;
/// Demo configuration from `formstate.toml`.
pub mod config;
/// Example actions served by the demo.
pub mod demo;
/// HTTP server, body parsing and pages.
pub mod server;
