// Copyright 2025 APISpeed Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP routes.

pub mod health;
pub mod views;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// All routes, without state attached.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().merge(health::routes()).merge(views::routes())
}
