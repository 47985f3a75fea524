// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! APISpeed CLI entry point.

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = apispeed_cli::Cli::parse();
    if let Err(e) = apispeed_cli::run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
