// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Demo server command.

use std::path::Path;

use console::style;

use crate::config::Config;
use crate::server::http::create_server;

/// Runs the demo server. `host` and `port` override the config file.
pub async fn run(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    println!("{}", style("Starting formstate demo server...").cyan().bold());
    if !Path::new(&config.server.static_dir).exists() {
        println!(
            "{} {}",
            style("Static directory not found:").yellow(),
            config.server.static_dir
        );
    }

    let addr = config.server.addr();
    println!();
    println!(
        "{} {}",
        style("Server running at").green().bold(),
        style(format!("http://{}", addr)).cyan().underlined()
    );
    println!("  {} /login", style("Login:").dim());
    println!("  {} /counter", style("Counter:").dim());
    println!("  {} /like", style("Like:").dim());
    println!("{}", style("Press Ctrl+C to stop").dim());

    create_server(config).await
}
