//! The merged read model returned by state lookups.

use serde::Serialize;

use crate::{funfact::FunFactDocument, state::StateRecord};

/// A reference record with its fun facts attached, computed per request.
///
/// `funfacts` is present only when the state's document exists and is
/// non-empty; the serialised view never carries an empty array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedStateView {
  #[serde(flatten)]
  pub record:   StateRecord,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub funfacts: Option<Vec<String>>,
}

impl MergedStateView {
  pub fn merge(record: StateRecord, document: Option<FunFactDocument>) -> Self {
    let funfacts = document
      .filter(FunFactDocument::has_facts)
      .map(|doc| doc.funfacts);
    Self { record, funfacts }
  }
}
