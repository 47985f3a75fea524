// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Everything around the pure view pipeline that touches the outside world.
//!
//! - [`source`] - Where `results.json`, `meta.json` and `history.json` come from
//! - [`loader`] - Tolerant parsing into a [`apispeed_core::RecordStore`], and JSON export
//! - [`report`] - Markdown rendering of computed views
//! - [`settings`] - Layered configuration
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use apispeed_store::{load_store, FileSource};
//!
//! # async fn run() -> apispeed_store::Result<()> {
//! let store = load_store(&FileSource::new("docs/data")).await?;
//! println!("{} results", store.results().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod logging;
pub mod report;
pub mod settings;
pub mod source;

pub use error::{Result, StoreError};
pub use loader::{load_store, write_json};
pub use settings::Settings;
pub use source::{source_from_location, DataSource, Document, FileSource, HttpSource};
