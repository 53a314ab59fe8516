//! Fun-fact documents and the index rules applied to them.
//!
//! A document holds the ordered fun facts recorded for one state code. An
//! empty list is a valid, persisted state and is distinct from a document
//! that does not exist. Callers address individual facts with 1-based
//! positions; see [`FactIndex`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

// ─── Document ────────────────────────────────────────────────────────────────

/// The persisted fun-fact list for one state code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunFactDocument {
  /// Uppercase state code; unique across documents.
  pub state_code: String,
  pub funfacts:   Vec<String>,
}

impl FunFactDocument {
  pub fn new(state_code: impl Into<String>, funfacts: Vec<String>) -> Self {
    Self { state_code: state_code.into(), funfacts }
  }

  pub fn has_facts(&self) -> bool { !self.funfacts.is_empty() }

  /// Pick one fact uniformly at random. `None` when the list is empty.
  pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
    if self.funfacts.is_empty() {
      return None;
    }
    let i = rng.gen_range(0..self.funfacts.len());
    Some(&self.funfacts[i])
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// A caller-supplied, 1-based position in a fun-fact list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactIndex(pub i64);

impl FactIndex {
  /// Map to a 0-based offset into a list of `len` facts.
  ///
  /// This is the single bounds policy for every by-index mutation: valid
  /// positions are `1..=len`, so `len` itself addresses the last fact.
  pub fn resolve(self, len: usize) -> Option<usize> {
    let position = usize::try_from(self.0).ok()?;
    (1..=len).contains(&position).then(|| position - 1)
  }

  /// Read an index from a JSON request field. Whole numbers (including
  /// `2.0`) and integer strings are accepted; values beyond `i64` saturate,
  /// so they fail [`Self::resolve`] rather than being rejected as malformed.
  pub fn from_json(value: &Value) -> Option<Self> {
    match value {
      Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          return Some(Self(i));
        }
        if n.as_u64().is_some() {
          return Some(Self(i64::MAX));
        }
        n.as_f64()
          .filter(|f| f.is_finite() && f.fract() == 0.0)
          .map(|f| Self(f as i64))
      }
      Value::String(s) => {
        let wide = s.trim().parse::<i128>().ok()?;
        Some(Self(wide.clamp(i64::MIN.into(), i64::MAX.into()) as i64))
      }
      _ => None,
    }
  }
}

// ─── Request field decoding ──────────────────────────────────────────────────

/// Decode the `funfacts` request field. A missing field is returned as
/// `None` so the engine can report it; anything other than an array of
/// strings is rejected here.
pub fn facts_from_json(value: Option<Value>) -> Result<Option<Vec<String>>> {
  let Some(value) = value else { return Ok(None) };
  let Value::Array(items) = value else {
    return Err(Error::InvalidInput(
      "State fun facts value must be an array".into(),
    ));
  };
  items
    .into_iter()
    .map(|item| match item {
      Value::String(s) => Ok(s),
      _ => Err(Error::InvalidInput(
        "State fun facts value must be an array of strings".into(),
      )),
    })
    .collect::<Result<Vec<_>>>()
    .map(Some)
}

/// Decode the `index` request field of a by-index mutation.
pub fn index_from_json(value: Option<Value>) -> Result<Option<FactIndex>> {
  match value {
    None => Ok(None),
    Some(v) => FactIndex::from_json(&v).map(Some).ok_or_else(|| {
      Error::InvalidInput("State fun fact index value must be an integer".into())
    }),
  }
}
