// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Line-oriented interactive mode.
//!
//! Each input line is one command. Commands map one-to-one onto
//! [`DashboardController`] setters, so every line triggers exactly one
//! synchronous recompute.

use anyhow::{anyhow, bail, Context, Result};
use apispeed_core::{
    Clock, DashboardController, MetricSelection, ModelFilter, Presenter, SortKey, ViewMode,
};

/// Help text for the `help` command.
pub const HELP: &str = "\
Commands:
  search <text>          filter rows by key or model (empty clears)
  provider <name>        filter rows by provider (empty clears)
  sort <column>          sort by column; repeat to reverse
  clear                  reset search and provider filter
  window <days>          history window in days
  model <key|all>        history model filter
  metric <name|all>      charted metric
  view <table|history>   switch view
  reload                 refetch benchmark data
  help                   show this help
  quit                   exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Change the search text.
    Search(String),
    /// Change the provider filter.
    Provider(String),
    /// Toggle sort on a column.
    Sort(SortKey),
    /// Reset table filters.
    Clear,
    /// Change the history window.
    Window(u32),
    /// Change the history model filter.
    Model(ModelFilter),
    /// Change the charted metric.
    Metric(MetricSelection),
    /// Switch view.
    View(ViewMode),
    /// Refetch documents.
    Reload,
    /// Print help.
    Help,
    /// Leave interactive mode.
    Quit,
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Read the next line.
    Continue,
    /// Refetch the snapshot, then continue.
    Reload,
    /// Print help, then continue.
    Help,
    /// Stop.
    Quit,
}

/// Parse one line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, arg.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "search" => Command::Search(arg.to_string()),
        "provider" => Command::Provider(arg.to_string()),
        "sort" => Command::Sort(require(arg, "sort")?.parse()?),
        "clear" => Command::Clear,
        "window" => Command::Window(
            require(arg, "window")?
                .parse()
                .with_context(|| format!("window must be a whole number of days, got '{arg}'"))?,
        ),
        "model" => Command::Model(require(arg, "model")?.parse()?),
        "metric" => Command::Metric(require(arg, "metric")?.parse()?),
        "view" => Command::View(require(arg, "view")?.parse()?),
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}'; type 'help' for a list"),
    };
    Ok(Some(command))
}

fn require<'a>(arg: &'a str, verb: &str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(anyhow!("'{verb}' needs an argument"))
    } else {
        Ok(arg)
    }
}

/// Apply a command to the controller.
pub fn apply<P: Presenter, C: Clock>(controller: &mut DashboardController<P, C>, command: Command) -> Result<Outcome> {
    match command {
        Command::Search(text) => controller.set_search_query(text),
        Command::Provider(name) => controller.set_provider_filter(name),
        Command::Sort(key) => controller.toggle_sort(key),
        Command::Clear => controller.clear_filters(),
        Command::Window(days) => controller.set_time_window_days(days)?,
        Command::Model(filter) => controller.set_model_filter(filter),
        Command::Metric(selection) => controller.set_selected_metric(selection),
        Command::View(mode) => controller.set_view_mode(mode),
        Command::Reload => return Ok(Outcome::Reload),
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}
