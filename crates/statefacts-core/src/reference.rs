//! The Reference Table: an immutable, init-once lookup of state records.
//!
//! Built once at startup and shared behind an `Arc`. Nothing mutates it
//! afterwards, so concurrent readers need no synchronisation.

use std::collections::HashMap;

use crate::{
  Error, Result,
  state::{ContigFilter, StateRecord},
};

/// The bundled 50-state dataset.
const EMBEDDED_DATASET: &str = include_str!("../data/states.json");

#[derive(Debug, Clone)]
pub struct ReferenceTable {
  /// Records in dataset order; this is the order every listing uses.
  records: Vec<StateRecord>,
  by_code: HashMap<String, usize>,
}

impl ReferenceTable {
  /// Load the dataset compiled into the crate.
  pub fn embedded() -> Result<Self> { Self::from_json(EMBEDDED_DATASET) }

  /// Parse a JSON array of state records. Codes are uppercased and must be
  /// unique.
  pub fn from_json(json: &str) -> Result<Self> {
    let records: Vec<StateRecord> = serde_json::from_str(json)?;
    Self::from_records(records)
  }

  pub fn from_records(mut records: Vec<StateRecord>) -> Result<Self> {
    let mut by_code = HashMap::with_capacity(records.len());
    for (i, record) in records.iter_mut().enumerate() {
      record.code = record.code.to_ascii_uppercase();
      if by_code.insert(record.code.clone(), i).is_some() {
        return Err(Error::DuplicateCode(record.code.clone()));
      }
    }
    Ok(Self { records, by_code })
  }

  pub fn all(&self) -> &[StateRecord] { &self.records }

  /// Exact lookup; `code` must already be uppercase.
  pub fn by_code(&self, code: &str) -> Option<&StateRecord> {
    self.by_code.get(code).map(|&i| &self.records[i])
  }

  pub fn contains(&self, code: &str) -> bool { self.by_code.contains_key(code) }

  /// Records matching `filter`, in dataset order.
  pub fn filtered(
    &self,
    filter: ContigFilter,
  ) -> impl Iterator<Item = &StateRecord> + '_ {
    self.records.iter().filter(move |r| filter.matches(r))
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }
}
