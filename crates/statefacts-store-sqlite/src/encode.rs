//! Conversions between [`FunFactDocument`] and the plain-text columns stored
//! in SQLite. The fact list is stored as a compact JSON array.

use statefacts_core::funfact::FunFactDocument;

use crate::Result;

pub fn encode_funfacts(facts: &[String]) -> Result<String> {
  Ok(serde_json::to_string(facts)?)
}

pub fn decode_funfacts(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

/// Raw strings read directly from a `funfact_documents` row.
pub struct RawDocument {
  pub state_code: String,
  pub funfacts:   String,
}

impl RawDocument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { state_code: row.get(0)?, funfacts: row.get(1)? })
  }

  pub fn into_document(self) -> Result<FunFactDocument> {
    Ok(FunFactDocument {
      state_code: self.state_code,
      funfacts:   decode_funfacts(&self.funfacts)?,
    })
  }
}
