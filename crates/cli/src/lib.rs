// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for the APISpeed benchmark dashboard.
//!
//! Loads a snapshot from a directory or URL and renders the results table
//! or history charts as Markdown, JSON, or an interactive session.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod interactive;
pub mod presenter;

use anyhow::{Context, Result};
use apispeed_core::{
    compute_history_view, compute_table_view, DashboardController, MetricSelection, ModelFilter,
    Notice, Presenter, RecordStore, SortDirection, SortKey, SystemClock, ViewMode,
};
use apispeed_store::report::render_history_summary;
use apispeed_store::{load_store, logging, write_json, DataSource, Settings};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::interactive::{apply, parse_command, Outcome, HELP};
use crate::presenter::TerminalPresenter;

/// APISpeed dashboard CLI.
#[derive(Parser, Debug)]
#[command(name = "apispeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Data directory or base URL (overrides `source.location`).
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Settings file (defaults to `apispeed.toml` if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Table output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    /// Markdown table.
    Markdown,
    /// JSON rows.
    Json,
}

/// History output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HistoryFormat {
    /// One section per metric.
    Summary,
    /// Full series as JSON.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the filtered and sorted results table.
    Table {
        /// Match against key and model.
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact provider (case-insensitive).
        #[arg(short, long, default_value = "")]
        provider: String,

        /// Column to sort by: key, provider, model, or a metric field name.
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending.
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = TableFormat::Markdown)]
        format: TableFormat,
    },

    /// Print per-model trend series.
    History {
        /// Model key, or `all`.
        #[arg(short, long)]
        model: Option<ModelFilter>,

        /// Window in days.
        #[arg(short, long)]
        window: Option<u32>,

        /// Metric field name, or `all`.
        #[arg(long)]
        metric: Option<MetricSelection>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = HistoryFormat::Summary)]
        format: HistoryFormat,

        /// Also write the series as JSON to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List model keys and providers.
    Models,

    /// Show run metadata and snapshot counts.
    Status,

    /// Read commands from stdin and re-render after each one.
    Interactive,
}

/// Run the CLI.
pub async fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(source) = cli.source {
        settings.source.location = source;
    }
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    }
    logging::init(&settings.logging)?;

    let source = settings.data_source();
    let store = match load_store(source.as_ref()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            TerminalPresenter::stdio(settings.display).show_notice(&Notice::load_failed());
            return Err(e).with_context(|| format!("failed to load data from {}", source.describe()));
        }
    };

    match cli.command {
        Commands::Table {
            search,
            provider,
            sort,
            desc,
            format,
        } => {
            let mut config = settings
                .initial_view()?
                .with_view_mode(ViewMode::Table)
                .with_search_query(search)
                .with_provider_filter(provider);
            if let Some(key) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                config = config.with_sort(key, direction);
            }

            match format {
                TableFormat::Markdown => {
                    let presenter = TerminalPresenter::stdio(settings.display);
                    DashboardController::with_parts(store, config, presenter, SystemClock).start();
                }
                TableFormat::Json => {
                    let view = compute_table_view(&store, &config);
                    print_notice(view.notice.as_ref());
                    println!("{}", serde_json::to_string_pretty(&view.rows)?);
                }
            }
            Ok(())
        }

        Commands::History {
            model,
            window,
            metric,
            format,
            output,
        } => {
            let mut config = settings.initial_view()?.with_view_mode(ViewMode::History);
            if let Some(model) = model {
                config = config.with_model_filter(model);
            }
            if let Some(days) = window {
                config = config.with_time_window_days(days)?;
            }
            if let Some(metric) = metric {
                config = config.with_selected_metric(metric);
            }

            let view = compute_history_view(&store, &config, Utc::now());
            print_notice(view.notice.as_ref());
            match format {
                HistoryFormat::Summary => print!("{}", render_history_summary(&view.metrics, &settings.display)),
                HistoryFormat::Json => println!("{}", serde_json::to_string_pretty(&view.metrics)?),
            }

            if let Some(path) = output {
                write_json(&path, &view.metrics)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "Wrote history series");
            }
            Ok(())
        }

        Commands::Models => {
            println!("{}", "Models".bold());
            for key in store.model_keys() {
                println!("  {}", key);
            }
            println!("{}", "Providers".bold());
            for provider in store.providers() {
                println!("  {}", provider);
            }
            Ok(())
        }

        Commands::Status => {
            print_status(&store, source.as_ref(), &settings);
            Ok(())
        }

        Commands::Interactive => run_interactive(store, source, &settings).await,
    }
}

fn print_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        TerminalPresenter::stdio(Default::default()).show_notice(notice);
    }
}

fn print_status(store: &RecordStore, source: &dyn DataSource, settings: &Settings) {
    let meta = store.meta();
    let now = Utc::now();

    println!("{}", "APISpeed Dashboard".bold());
    println!("Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("Source:     {}", source.describe());
    println!("Generated:  {}", settings.display.time(meta.generated_at.as_deref(), now));
    println!("Results:    {}", store.results().len());
    println!("History:    {}", store.history().len());
    if let Some(runs) = meta.runs {
        println!("Runs:       {}", runs);
    }
    if let Some(mode) = &meta.mode {
        println!("Mode:       {}", mode);
    }
    if !meta.models.is_empty() {
        println!("Configured: {}", meta.models.join(", "));
    }

    if let Some(banner) = Notice::from_meta(meta) {
        print_notice(Some(&banner));
    }
    if store.is_empty() {
        print_notice(Some(&Notice::no_results()));
    }
}

async fn run_interactive(store: Arc<RecordStore>, source: Box<dyn DataSource>, settings: &Settings) -> Result<()> {
    let presenter = TerminalPresenter::stdio(settings.display);
    let mut controller = DashboardController::with_parts(store, settings.initial_view()?, presenter, SystemClock);
    controller.start();
    println!("{}", "Type 'help' for commands.".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{} {:#}", "error:".red().bold(), e);
                continue;
            }
        };

        match apply(&mut controller, command) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Help) => println!("{}", HELP),
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Reload) => match load_store(source.as_ref()).await {
                Ok(store) => controller.replace_store(Arc::new(store)),
                Err(e) => {
                    warn!(source = %source.describe(), error = %e, "Reload failed");
                    controller.presenter_mut().show_notice(&Notice::load_failed());
                }
            },
            Err(e) => eprintln!("{} {:#}", "error:".red().bold(), e),
        }
    }
    Ok(())
}
