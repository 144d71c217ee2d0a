// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `serve`: Run the demo server
//! - `check_config`: Validate and print the resolved configuration

/// Configuration check command.
pub mod check_config;
/// Demo server command.
pub mod serve;
