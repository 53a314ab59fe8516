//! Handlers for `/states` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/states` | Optional `?contig=true\|false` |
//! | `POST`   | `/states` | Body: `{"stateCode":"GA","funfacts":[...]}`; 201 |
//! | `DELETE` | `/states` | Body: `{"code":"GA"}` |
//! | `GET`    | `/states/:code` | Reference record merged with fun facts |
//! | `DELETE` | `/states/:code` | Drops every fun fact for the state |
//! | `GET`    | `/states/:code/capital` | `{"state","capital"}` |
//! | `GET`    | `/states/:code/nickname` | `{"state","nickname"}` |
//! | `GET`    | `/states/:code/population` | `{"state","population"}`, comma-grouped |
//! | `GET`    | `/states/:code/admission` | `{"state","admitted"}` |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use statefacts_core::{
  funfact::{FunFactDocument, facts_from_json},
  state::{ContigFilter, StateRecord},
  store::{DeleteOutcome, FunFactStore},
  view::MergedStateView,
};

use crate::{
  AppState,
  error::ApiError,
  gate::{JsonBody, StateCode, clean_code},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// `true` keeps the 48 contiguous states, `false` keeps only the others.
  pub contig: Option<String>,
}

/// `GET /states[?contig=true|false]`
pub async fn list<S: FunFactStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<MergedStateView>>, ApiError> {
  let filter = ContigFilter::from_flag(params.contig.as_deref());
  Ok(Json(state.engine.list(filter).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /states/:code`
pub async fn get_one<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<MergedStateView>, ApiError> {
  Ok(Json(state.engine.get(&code).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub state_code: Option<String>,
  pub funfacts:   Option<Value>,
}

/// `POST /states`: returns 201 + the new [`FunFactDocument`].
pub async fn create<S: FunFactStore>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let facts = facts_from_json(body.funfacts)?;
  let doc: FunFactDocument = state
    .engine
    .create_document(body.state_code.as_deref(), facts)
    .await?;
  Ok((StatusCode::CREATED, Json(doc)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DeleteBody {
  pub code: Option<String>,
}

/// `DELETE /states`, body: `{"code":"GA"}`. The code is not checked against
/// the reference table, so documents created for unlisted codes can be
/// removed.
pub async fn delete_by_body<S: FunFactStore>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<DeleteBody>,
) -> Result<Json<DeleteOutcome>, ApiError> {
  let raw = body
    .code
    .ok_or_else(|| ApiError::BadRequest("A state code is required.".into()))?;
  let code = clean_code(&raw)?;
  Ok(Json(state.engine.delete_all_for(&code).await?))
}

/// `DELETE /states/:code`
pub async fn delete_one<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<DeleteOutcome>, ApiError> {
  Ok(Json(state.engine.delete_all_for(&code).await?))
}

// ─── Attribute lookups ────────────────────────────────────────────────────────

/// `{"state": <name>, <key>: <value>}` for a single attribute.
#[derive(Debug, Serialize)]
pub struct Attribute<T> {
  pub state: String,
  #[serde(flatten)]
  pub value: T,
}

#[derive(Debug, Serialize)]
pub struct Capital {
  pub capital: String,
}

#[derive(Debug, Serialize)]
pub struct Nickname {
  pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct Population {
  pub population: String,
}

/// Admission date rendered as `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
pub struct Admitted {
  pub admitted: String,
}

fn record<'a, S>(
  state: &'a AppState<S>,
  code: &str,
) -> Result<&'a StateRecord, ApiError> {
  state
    .table
    .by_code(code)
    .ok_or_else(|| ApiError::NotFound("State not found.".into()))
}

/// `GET /states/:code/capital`
pub async fn capital<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<Attribute<Capital>>, ApiError> {
  let r = record(&state, &code)?;
  Ok(Json(Attribute {
    state: r.name.clone(),
    value: Capital { capital: r.capital.clone() },
  }))
}

/// `GET /states/:code/nickname`
pub async fn nickname<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<Attribute<Nickname>>, ApiError> {
  let r = record(&state, &code).map_err(ApiError::not_found_as_bad_request)?;
  Ok(Json(Attribute {
    state: r.name.clone(),
    value: Nickname { nickname: r.nickname.clone() },
  }))
}

/// `GET /states/:code/population`
pub async fn population<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<Attribute<Population>>, ApiError> {
  let r = record(&state, &code).map_err(ApiError::not_found_as_bad_request)?;
  Ok(Json(Attribute {
    state: r.name.clone(),
    value: Population { population: group_thousands(r.population) },
  }))
}

/// `GET /states/:code/admission`
pub async fn admission<S: FunFactStore>(
  State(state): State<AppState<S>>,
  StateCode(code): StateCode,
) -> Result<Json<Attribute<Admitted>>, ApiError> {
  let r = record(&state, &code).map_err(ApiError::not_found_as_bad_request)?;
  Ok(Json(Attribute {
    state: r.name.clone(),
    value: Admitted { admitted: r.admission_date.to_string() },
  }))
}

/// Render `n` with comma thousands separators, e.g. `39,538,223`.
fn group_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}
