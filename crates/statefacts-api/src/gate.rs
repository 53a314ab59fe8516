//! Request extractors: the state-code gate and a lenient JSON body.

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{FromRef, FromRequest, FromRequestParts, Path, Request},
  http::{HeaderMap, header, request::Parts},
};
use serde::de::DeserializeOwned;
use statefacts_core::reference::ReferenceTable;

use crate::error::ApiError;

/// A `{code}` path parameter, uppercased and known to the reference table.
///
/// Handlers that take this extractor never see an unknown code; the request
/// is answered with 400 before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCode(pub String);

impl<St> FromRequestParts<St> for StateCode
where
  St: Send + Sync,
  Arc<ReferenceTable>: FromRef<St>,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &St,
  ) -> Result<Self, Self::Rejection> {
    let Path(raw) = Path::<String>::from_request_parts(parts, state)
      .await
      .map_err(|_| ApiError::BadRequest("State parameter is required.".into()))?;
    let table = Arc::<ReferenceTable>::from_ref(state);
    normalize_code(&raw, &table).map(Self)
  }
}

/// Trim and uppercase `raw`, rejecting an empty code. Does not consult the
/// reference table; documents may exist for codes it does not list.
pub fn clean_code(raw: &str) -> Result<String, ApiError> {
  let code = raw.trim().to_ascii_uppercase();
  if code.is_empty() {
    return Err(ApiError::BadRequest("State parameter is required.".into()));
  }
  Ok(code)
}

/// [`clean_code`], then check the result against `table`.
pub fn normalize_code(raw: &str, table: &ReferenceTable) -> Result<String, ApiError> {
  let code = clean_code(raw)?;
  if !table.contains(&code) {
    return Err(ApiError::BadRequest(
      "Invalid state abbreviation parameter".into(),
    ));
  }
  Ok(code)
}

const INVALID_BODY: &str = "Invalid JSON body";

/// JSON body that treats a request without a JSON content type, or with a
/// blank body, as `{}`, so handlers can report which field is missing.
///
/// Malformed JSON is answered with a fixed 400 message; parser diagnostics
/// only reach the log.
pub struct JsonBody<T>(pub T);

impl<T, St> FromRequest<St> for JsonBody<T>
where
  T: DeserializeOwned + Default,
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
    let is_json = has_json_content_type(req.headers());
    let bytes = Bytes::from_request(req, state).await.map_err(|e| {
      tracing::debug!(error = %e.body_text(), "unreadable request body");
      ApiError::BadRequest(INVALID_BODY.into())
    })?;

    if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
      return Ok(Self(T::default()));
    }

    match Json::<T>::from_bytes(&bytes) {
      Ok(Json(value)) => Ok(Self(value)),
      Err(e) => {
        tracing::debug!(error = %e.body_text(), "rejected request body");
        Err(ApiError::BadRequest(INVALID_BODY.into()))
      }
    }
  }
}

/// `application/json` or any `application/*+json` media type.
fn has_json_content_type(headers: &HeaderMap) -> bool {
  let Some(value) = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };
  let essence = value.split(';').next().unwrap_or_default().trim();
  let Some((kind, subtype)) = essence.split_once('/') else {
    return false;
  };
  kind.eq_ignore_ascii_case("application")
    && (subtype.eq_ignore_ascii_case("json")
      || subtype.to_ascii_lowercase().ends_with("+json"))
}
