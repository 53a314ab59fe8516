//! Handlers for `/states/:code/funfact`.
//!
//! | Method   | Body | Notes |
//! |----------|------|-------|
//! | `GET`    | none | One random fact; 404 when the state has none |
//! | `POST`   | `{"funfacts":[...]}` | Appends, creating the list on first use; 201 |
//! | `PATCH`  | `{"index":1,"funfact":"..."}` | 1-based index |
//! | `DELETE` | `{"index":1}` | 1-based index |
//!
//! `PATCH` and `DELETE` answer 400 when the state has no facts or the index is
//! out of range.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use statefacts_core::{
  funfact::{FunFactDocument, facts_from_json, index_from_json},
  store::FunFactStore,
};

use crate::{
  AppState,
  error::ApiError,
  gate::{JsonBody, StateCode},
};

// ─── Random ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RandomFact {
  pub funfact: String,
}

/// `GET /states/:code/funfact`
pub async fn random<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<RandomFact>, ApiError> {
  let funfact = state.engine.random_fact(&code).await?;
  Ok(Json(RandomFact { funfact }))
}

// ─── Add ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AddBody {
  pub funfacts: Option<Value>,
}

/// `POST /states/:code/funfact`: returns 201 + the full document.
pub async fn add<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
  JsonBody(body): JsonBody<AddBody>,
) -> Result<impl IntoResponse, ApiError> {
  let facts = facts_from_json(body.funfacts)?;
  let doc = state.engine.add_facts(&code, facts).await?;
  Ok((StatusCode::CREATED, Json(doc)))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ReplaceBody {
  pub index:   Option<Value>,
  pub funfact: Option<Value>,
}

/// `PATCH /states/:code/funfact`
pub async fn replace<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
  JsonBody(body): JsonBody<ReplaceBody>,
) -> Result<Json<FunFactDocument>, ApiError> {
  let index = index_from_json(body.index)?;
  let text = match body.funfact {
    None => None,
    Some(Value::String(s)) => Some(s),
    Some(_) => {
      return Err(ApiError::BadRequest(
        "State fun fact value must be a string".into(),
      ));
    }
  };

  let doc = state
    .engine
    .replace_fact_at(&code, index, text)
    .await
    .map_err(ApiError::from)
    .map_err(ApiError::not_found_as_bad_request)?;
  Ok(Json(doc))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RemoveBody {
  pub index: Option<Value>,
}

/// `DELETE /states/:code/funfact`
pub async fn remove<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
  JsonBody(body): JsonBody<RemoveBody>,
) -> Result<Json<FunFactDocument>, ApiError> {
  let index = index_from_json(body.index)?;
  let doc = state
    .engine
    .delete_fact_at(&code, index)
    .await
    .map_err(ApiError::from)
    .map_err(ApiError::not_found_as_bad_request)?;
  Ok(Json(doc))
}
