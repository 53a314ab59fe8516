//! JSON REST API for statefacts.
//!
//! Exposes an axum [`Router`] backed by any
//! [`statefacts_core::store::FunFactStore`]. TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! axum::serve(listener, statefacts_api::api_router(state)).await?;
//! ```

pub mod error;
pub mod funfacts;
pub mod gate;
pub mod states;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::FromRef,
  http::StatusCode,
  response::IntoResponse,
  routing::get,
};
use serde_json::json;
use statefacts_core::{
  engine::StatesEngine, reference::ReferenceTable, store::FunFactStore,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub engine: StatesEngine<S>,
  pub table:  Arc<ReferenceTable>,
}

impl<S: FunFactStore> AppState<S> {
  pub fn new(store: Arc<S>, table: Arc<ReferenceTable>) -> Self {
    Self { engine: StatesEngine::new(store, Arc::clone(&table)), table }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { engine: self.engine.clone(), table: Arc::clone(&self.table) }
  }
}

impl<S> FromRef<AppState<S>> for Arc<ReferenceTable> {
  fn from_ref(state: &AppState<S>) -> Self { Arc::clone(&state.table) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be served directly or nested into any
/// parent router regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: FunFactStore + 'static,
{
  Router::new()
    .route(
      "/states",
      get(states::list::<S>)
        .post(states::create::<S>)
        .delete(states::delete_by_body::<S>),
    )
    .route(
      "/states/{code}",
      get(states::get_one::<S>).delete(states::delete_one::<S>),
    )
    .route(
      "/states/{code}/funfact",
      get(funfacts::random::<S>)
        .post(funfacts::add::<S>)
        .patch(funfacts::replace::<S>)
        .delete(funfacts::remove::<S>),
    )
    .route("/states/{code}/capital", get(states::capital::<S>))
    .route("/states/{code}/nickname", get(states::nickname::<S>))
    .route("/states/{code}/population", get(states::population::<S>))
    .route("/states/{code}/admission", get(states::admission::<S>))
    .fallback(not_found)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}

async fn not_found() -> impl IntoResponse {
  (StatusCode::NOT_FOUND, Json(json!({ "error": "404 Not Found" })))
}
