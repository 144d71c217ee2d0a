// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Configuration check command.

use std::path::Path;

use console::style;

use crate::config::Config;

/// Loads the configuration and prints it with defaults filled in.
pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = match Config::load_from(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!(
                "{} {}",
                style("Invalid configuration:").red().bold(),
                config_path.display()
            );
            return Err(e);
        }
    };

    if config_path.exists() {
        println!("{} {}", style("Loaded").green(), config_path.display());
    } else {
        println!(
            "{} {}",
            style("No config file, using defaults:").yellow(),
            config_path.display()
        );
    }
    println!();
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
