//! [`StatesEngine`]: merge and mutation rules over a [`FunFactStore`].
//!
//! Every operation takes a state code that the caller has already uppercased
//! and checked against the [`ReferenceTable`]. Storage failures are logged
//! here and surfaced as [`Error::Storage`].
//!
//! Read-modify-write sequences (add, replace, delete by index) are a find
//! followed by a save with no lock in between; concurrent writers to the same
//! code are last-writer-wins.

use std::{collections::HashMap, sync::Arc};

use crate::{
  Error, Result,
  funfact::{FactIndex, FunFactDocument},
  reference::ReferenceTable,
  state::ContigFilter,
  store::{DeleteOutcome, FunFactStore},
  view::MergedStateView,
};

/// The merge engine and fact mutation engine, sharing one store and one
/// reference table.
pub struct StatesEngine<S> {
  store: Arc<S>,
  table: Arc<ReferenceTable>,
}

impl<S> Clone for StatesEngine<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), table: Arc::clone(&self.table) }
  }
}

/// Wrap a backend error, logging it with the operation that failed.
fn storage<'a, E>(op: &'static str, code: &'a str) -> impl FnOnce(E) -> Error + 'a
where
  E: std::error::Error + Send + Sync + 'static,
{
  move |e| {
    tracing::error!(op, state_code = code, error = %e, "fun-fact store failed");
    Error::Storage(Box::new(e))
  }
}

impl<S: FunFactStore> StatesEngine<S> {
  pub fn new(store: Arc<S>, table: Arc<ReferenceTable>) -> Self {
    Self { store, table }
  }

  pub fn table(&self) -> &ReferenceTable { &self.table }

  /// Display name used in user-facing messages; falls back to the code.
  fn state_name<'a>(&'a self, code: &'a str) -> &'a str {
    self.table.by_code(code).map_or(code, |r| r.name.as_str())
  }

  fn no_facts(&self, code: &str) -> Error {
    Error::NotFound(format!("No Fun Facts found for {}", self.state_name(code)))
  }

  // ── Merge engine ──────────────────────────────────────────────────────────

  /// All states matching `filter`, in dataset order, with fun facts merged.
  pub async fn list(&self, filter: ContigFilter) -> Result<Vec<MergedStateView>> {
    let documents = self
      .store
      .find_all()
      .await
      .map_err(storage("find_all", "*"))?;

    let mut by_code: HashMap<String, FunFactDocument> =
      documents
        .into_iter()
        .map(|doc| (doc.state_code.clone(), doc))
        .collect();

    Ok(
      self
        .table
        .filtered(filter)
        .map(|record| {
          let doc = by_code.remove(&record.code);
          MergedStateView::merge(record.clone(), doc)
        })
        .collect(),
    )
  }

  /// One state with its fun facts merged.
  pub async fn get(&self, code: &str) -> Result<MergedStateView> {
    let record = self
      .table
      .by_code(code)
      .ok_or_else(|| Error::NotFound(format!("State code {code} not found.")))?;

    let doc = self
      .store
      .find_one(code)
      .await
      .map_err(storage("find_one", code))?;

    Ok(MergedStateView::merge(record.clone(), doc))
  }

  /// One of the state's fun facts, chosen uniformly at random.
  pub async fn random_fact(&self, code: &str) -> Result<String> {
    let doc = self
      .store
      .find_one(code)
      .await
      .map_err(storage("find_one", code))?
      .ok_or_else(|| self.no_facts(code))?;

    let fact = doc.pick(&mut rand::thread_rng()).map(str::to_owned);
    fact.ok_or_else(|| self.no_facts(code))
  }

  // ── Fact mutation engine ──────────────────────────────────────────────────

  /// Append `facts` to the state's list, creating the document on first use.
  /// An empty list is accepted and appends nothing.
  pub async fn add_facts(
    &self,
    code: &str,
    facts: Option<Vec<String>>,
  ) -> Result<FunFactDocument> {
    let facts = facts.ok_or_else(|| {
      Error::InvalidInput("State fun facts value required".into())
    })?;

    let existing = self
      .store
      .find_one(code)
      .await
      .map_err(storage("find_one", code))?;

    let mut doc = match existing {
      Some(doc) => doc,
      None => {
        let created = self
          .store
          .create(code.to_owned(), facts.clone())
          .await
          .map_err(storage("create", code))?;
        if let Some(doc) = created {
          tracing::debug!(state_code = code, count = doc.funfacts.len(), "fun facts added");
          return Ok(doc);
        }
        // Another writer created the document after our read; append to it.
        self
          .store
          .find_one(code)
          .await
          .map_err(storage("find_one", code))?
          .unwrap_or_else(|| FunFactDocument::new(code, Vec::new()))
      }
    };

    doc.funfacts.extend(facts);
    let doc = self.store.save(doc).await.map_err(storage("save", code))?;
    tracing::debug!(state_code = code, count = doc.funfacts.len(), "fun facts added");
    Ok(doc)
  }

  /// Overwrite the fact at 1-based `index`.
  pub async fn replace_fact_at(
    &self,
    code: &str,
    index: Option<FactIndex>,
    text: Option<String>,
  ) -> Result<FunFactDocument> {
    let index = index.ok_or_else(|| {
      Error::InvalidInput("State fun fact index value required".into())
    })?;
    let text = text
      .ok_or_else(|| Error::InvalidInput("State fun fact value required".into()))?;

    self
      .mutate_at(code, index, move |facts, offset| facts[offset] = text)
      .await
  }

  /// Remove the fact at 1-based `index`; later facts shift down by one.
  ///
  /// Removing the last fact leaves an empty, still-present document.
  pub async fn delete_fact_at(
    &self,
    code: &str,
    index: Option<FactIndex>,
  ) -> Result<FunFactDocument> {
    let index = index.ok_or_else(|| {
      Error::InvalidInput("State fun fact index value required".into())
    })?;

    self
      .mutate_at(code, index, |facts, offset| {
        facts.remove(offset);
      })
      .await
  }

  /// Shared preconditions for by-index mutations: the document must exist
  /// and be non-empty, and `index` must resolve against its current length.
  async fn mutate_at<F>(
    &self,
    code: &str,
    index: FactIndex,
    apply: F,
  ) -> Result<FunFactDocument>
  where
    F: FnOnce(&mut Vec<String>, usize) + Send,
  {
    let mut doc = self
      .store
      .find_one(code)
      .await
      .map_err(storage("find_one", code))?
      .filter(FunFactDocument::has_facts)
      .ok_or_else(|| self.no_facts(code))?;

    let offset = index.resolve(doc.funfacts.len()).ok_or_else(|| {
      Error::NotFound(format!(
        "No Fun Fact found at that index for {}",
        self.state_name(code)
      ))
    })?;

    apply(&mut doc.funfacts, offset);
    let doc = self.store.save(doc).await.map_err(storage("save", code))?;
    tracing::debug!(state_code = code, index = index.0, "fun fact updated");
    Ok(doc)
  }

  /// Drop the state's whole document. A missing document is a zero-count
  /// outcome, not an error.
  pub async fn delete_all_for(&self, code: &str) -> Result<DeleteOutcome> {
    let outcome = self
      .store
      .delete_one(code)
      .await
      .map_err(storage("delete_one", code))?;
    tracing::debug!(state_code = code, deleted = outcome.deleted_count, "fun facts cleared");
    Ok(outcome)
  }

  /// Explicitly create a document. Unlike [`Self::add_facts`] this refuses
  /// to touch an existing one. The code is uppercased but not checked
  /// against the reference table.
  pub async fn create_document(
    &self,
    state_code: Option<&str>,
    facts: Option<Vec<String>>,
  ) -> Result<FunFactDocument> {
    let code = state_code
      .map(str::trim)
      .filter(|c| !c.is_empty())
      .ok_or_else(|| Error::InvalidInput("stateCode is required.".into()))?
      .to_ascii_uppercase();

    let existing = self
      .store
      .find_one(&code)
      .await
      .map_err(storage("find_one", &code))?;
    if existing.is_some() {
      return Err(Error::AlreadyExists(code));
    }

    let created = self
      .store
      .create(code.clone(), facts.unwrap_or_default())
      .await
      .map_err(storage("create", &code))?;
    created.ok_or(Error::AlreadyExists(code))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::MemoryStore;

  fn engine() -> StatesEngine<MemoryStore> {
    StatesEngine::new(
      Arc::new(MemoryStore::default()),
      Arc::new(ReferenceTable::embedded().unwrap()),
    )
  }

  fn facts(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
  }

  // ── Merge ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_without_document_has_no_funfacts() {
    let e = engine();
    for record in e.table().all() {
      let view = e.get(&record.code).await.unwrap();
      assert!(view.funfacts.is_none(), "{} has funfacts", record.code);
    }
  }

  #[tokio::test]
  async fn california_scenario() {
    let e = engine();

    let view = e.get("CA").await.unwrap();
    assert_eq!(view.record.name, "California");
    assert!(view.funfacts.is_none());

    let doc = e.add_facts("CA", facts(&["Fact A"])).await.unwrap();
    assert_eq!(doc, FunFactDocument::new("CA", vec!["Fact A".into()]));

    let view = e.get("CA").await.unwrap();
    assert_eq!(view.funfacts, Some(vec!["Fact A".to_string()]));
  }

  #[tokio::test]
  async fn get_unknown_code_is_not_found() {
    let e = engine();
    assert!(matches!(e.get("ZZ").await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn list_merges_in_dataset_order() {
    let e = engine();
    e.add_facts("TX", facts(&["big"])).await.unwrap();
    e.add_facts("OH", facts(&[])).await.unwrap();

    let views = e.list(ContigFilter::All).await.unwrap();
    assert_eq!(views.len(), 50);
    let codes: Vec<_> = views.iter().map(|v| v.record.code.as_str()).collect();
    let expected: Vec<_> = e.table().all().iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, expected);

    let with_facts: Vec<_> = views
      .iter()
      .filter(|v| v.funfacts.is_some())
      .map(|v| v.record.code.as_str())
      .collect();
    assert_eq!(with_facts, ["TX"]);
  }

  #[tokio::test]
  async fn list_contiguity_filters() {
    let e = engine();

    let contiguous = e.list(ContigFilter::ContiguousOnly).await.unwrap();
    assert!(
      contiguous
        .iter()
        .all(|v| v.record.code != "AK" && v.record.code != "HI")
    );

    let outliers = e.list(ContigFilter::NonContiguousOnly).await.unwrap();
    let codes: Vec<_> = outliers.iter().map(|v| v.record.code.as_str()).collect();
    assert_eq!(codes, ["AK", "HI"]);
  }

  #[tokio::test]
  async fn list_ignores_documents_without_reference_records() {
    let e = engine();
    e.create_document(Some("xx"), facts(&["orphan"])).await.unwrap();
    let views = e.list(ContigFilter::All).await.unwrap();
    assert_eq!(views.len(), 50);
    assert!(views.iter().all(|v| v.funfacts.is_none()));
  }

  // ── Random fact ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn random_fact_without_document_is_not_found() {
    let e = engine();
    let err = e.random_fact("GA").await.unwrap_err();
    assert_eq!(err.to_string(), "No Fun Facts found for Georgia");
  }

  #[tokio::test]
  async fn random_fact_with_empty_list_is_not_found() {
    let e = engine();
    e.add_facts("GA", facts(&[])).await.unwrap();
    assert!(matches!(e.random_fact("GA").await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn random_fact_draws_every_fact() {
    let e = engine();
    e.add_facts("GA", facts(&["a", "b", "c"])).await.unwrap();

    let mut counts = HashMap::new();
    for _ in 0..3_000 {
      let fact = e.random_fact("GA").await.unwrap();
      *counts.entry(fact).or_insert(0usize) += 1;
    }
    assert_eq!(counts.len(), 3);
    for (fact, count) in counts {
      assert!((800..1200).contains(&count), "{fact} drawn {count} times");
    }
  }

  // ── Add ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_appends_in_order() {
    let e = engine();
    e.add_facts("GA", facts(&["fact1"])).await.unwrap();
    let doc = e.add_facts("GA", facts(&["fact2"])).await.unwrap();
    assert_eq!(doc.funfacts, ["fact1", "fact2"]);
  }

  #[tokio::test]
  async fn adding_empty_lists_is_idempotent() {
    let e = engine();
    e.add_facts("GA", facts(&[])).await.unwrap();
    let doc = e.add_facts("GA", facts(&[])).await.unwrap();
    assert!(doc.funfacts.is_empty());

    let stored = e.store.find_one("GA").await.unwrap().unwrap();
    assert!(stored.funfacts.is_empty());
  }

  #[tokio::test]
  async fn add_without_facts_is_invalid() {
    let e = engine();
    let err = e.add_facts("GA", None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(e.store.find_one("GA").await.unwrap().is_none());
  }

  // ── Replace ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn replace_at_length_overwrites_last() {
    let e = engine();
    e.add_facts("GA", facts(&["a", "b", "c"])).await.unwrap();

    let doc = e
      .replace_fact_at("GA", Some(FactIndex(3)), Some("z".into()))
      .await
      .unwrap();
    assert_eq!(doc.funfacts, ["a", "b", "z"]);

    let err = e
      .replace_fact_at("GA", Some(FactIndex(4)), Some("y".into()))
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "No Fun Fact found at that index for Georgia");
  }

  #[tokio::test]
  async fn replace_first_fact() {
    let e = engine();
    e.add_facts("NY", facts(&["a", "b"])).await.unwrap();
    let doc = e
      .replace_fact_at("NY", Some(FactIndex(1)), Some("first".into()))
      .await
      .unwrap();
    assert_eq!(doc.funfacts, ["first", "b"]);
  }

  #[tokio::test]
  async fn replace_rejects_zero_and_negative_indices() {
    let e = engine();
    e.add_facts("GA", facts(&["a"])).await.unwrap();
    for i in [0, -2] {
      let res = e.replace_fact_at("GA", Some(FactIndex(i)), Some("x".into())).await;
      assert!(matches!(res, Err(Error::NotFound(_))));
    }
  }

  #[tokio::test]
  async fn replace_requires_index_then_text() {
    let e = engine();
    let err = e.replace_fact_at("GA", None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "State fun fact index value required");

    let err = e
      .replace_fact_at("GA", Some(FactIndex(1)), None)
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "State fun fact value required");
  }

  #[tokio::test]
  async fn replace_without_document_is_not_found() {
    let e = engine();
    let err = e
      .replace_fact_at("GA", Some(FactIndex(1)), Some("x".into()))
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "No Fun Facts found for Georgia");
  }

  // ── Delete ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_shifts_later_facts() {
    let e = engine();
    e.add_facts("GA", facts(&["a", "b", "c"])).await.unwrap();
    let doc = e.delete_fact_at("GA", Some(FactIndex(2))).await.unwrap();
    assert_eq!(doc.funfacts, ["a", "c"]);
  }

  #[tokio::test]
  async fn deleting_last_fact_leaves_empty_document() {
    let e = engine();
    e.add_facts("GA", facts(&["only"])).await.unwrap();

    let doc = e.delete_fact_at("GA", Some(FactIndex(1))).await.unwrap();
    assert!(doc.funfacts.is_empty());
    assert!(e.store.find_one("GA").await.unwrap().is_some());

    let err = e
      .replace_fact_at("GA", Some(FactIndex(1)), Some("again".into()))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = e.delete_fact_at("GA", Some(FactIndex(1))).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
  }

  #[tokio::test]
  async fn delete_past_end_is_not_found() {
    let e = engine();
    e.add_facts("GA", facts(&["a", "b"])).await.unwrap();
    let err = e.delete_fact_at("GA", Some(FactIndex(3))).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let stored = e.store.find_one("GA").await.unwrap().unwrap();
    assert_eq!(stored.funfacts, ["a", "b"]);
  }

  #[tokio::test]
  async fn delete_requires_index() {
    let e = engine();
    let err = e.delete_fact_at("GA", None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
  }

  #[tokio::test]
  async fn delete_all_reports_count() {
    let e = engine();
    e.add_facts("GA", facts(&["a"])).await.unwrap();

    let outcome = e.delete_all_for("GA").await.unwrap();
    assert_eq!(outcome.deleted_count, 1);
    assert!(e.store.find_one("GA").await.unwrap().is_none());

    let outcome = e.delete_all_for("GA").await.unwrap();
    assert_eq!(outcome.deleted_count, 0);
  }

  #[tokio::test]
  async fn add_after_delete_all_recreates() {
    let e = engine();
    e.add_facts("GA", facts(&["old"])).await.unwrap();
    e.delete_all_for("GA").await.unwrap();
    let doc = e.add_facts("GA", facts(&["new"])).await.unwrap();
    assert_eq!(doc.funfacts, ["new"]);
  }

  // ── Explicit create ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_document_uppercases_and_defaults() {
    let e = engine();
    let doc = e.create_document(Some("vt"), None).await.unwrap();
    assert_eq!(doc, FunFactDocument::new("VT", vec![]));
  }

  #[tokio::test]
  async fn create_document_requires_code() {
    let e = engine();
    let err = e.create_document(None, None).await.unwrap_err();
    assert_eq!(err.to_string(), "stateCode is required.");
    assert!(matches!(
      e.create_document(Some("  "), None).await,
      Err(Error::InvalidInput(_))
    ));
  }

  #[tokio::test]
  async fn create_document_refuses_duplicates() {
    let e = engine();
    e.add_facts("VT", facts(&["a"])).await.unwrap();
    let err = e.create_document(Some("VT"), None).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(code) if code == "VT"));
  }

  #[tokio::test]
  async fn add_facts_appends_when_create_loses_a_race() {
    let e = engine();
    e.add_facts("GA", facts(&["first"])).await.unwrap();

    e.store.miss_next();
    let doc = e.add_facts("GA", facts(&["second"])).await.unwrap();
    assert_eq!(doc.funfacts, ["first", "second"]);
  }

  #[tokio::test]
  async fn create_document_conflict_after_stale_read_is_already_exists() {
    let e = engine();
    e.add_facts("VT", facts(&["a"])).await.unwrap();

    e.store.miss_next();
    let err = e.create_document(Some("vt"), None).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(code) if code == "VT"));
    assert_eq!(e.store.find_one("VT").await.unwrap().unwrap().funfacts, ["a"]);
  }

  // ── Storage failures ────────────────────────────────────────────────────

  #[tokio::test]
  async fn storage_failures_surface_as_storage_errors() {
    let e = engine();
    e.store.fail_next();
    assert!(matches!(e.get("GA").await, Err(Error::Storage(_))));
    e.store.fail_next();
    assert!(matches!(
      e.add_facts("GA", facts(&["a"])).await,
      Err(Error::Storage(_))
    ));
  }
}
