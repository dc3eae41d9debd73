// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Vitro Contributors

//! Vitro - sandboxed in-memory module loader and component renderer
//!
//! Entry point for the vitro CLI: render request bundles from JSON,
//! evaluate script snippets, or start the interactive REPL.

mod repl;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vitro", version, about = "Sandboxed module loader and component renderer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render a request bundle and print the resulting markup
    Render {
        /// Path to the JSON request, or '-' for stdin
        request: PathBuf,
    },
    /// Evaluate a script expression and print its value
    Eval {
        /// The source to evaluate
        #[arg(short = 'e', long = "expr")]
        expr: String,
    },
    /// Start the interactive REPL
    Repl,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Render { request }) => render(&request),
        Some(Command::Eval { expr }) => eval(&expr),
        Some(Command::Repl) | None => run_repl(),
    }
}

fn render(path: &PathBuf) -> anyhow::Result<()> {
    let json = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read request from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read request '{}'", path.display()))?
    };

    let markup = vitro_render::render_bundle_json(&json)?;
    println!("{}", markup);
    Ok(())
}

fn eval(source: &str) -> anyhow::Result<()> {
    let mut engine = vitro_script::Engine::new();
    let value = engine.eval(source)?;
    println!("{}", value);
    Ok(())
}

fn run_repl() -> anyhow::Result<()> {
    let mut repl = repl::Repl::new().context("failed to initialize REPL")?;
    repl.run()?;
    Ok(())
}
