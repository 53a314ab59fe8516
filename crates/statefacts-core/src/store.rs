//! The `FunFactStore` trait, the contract the engine needs from a backend.
//!
//! The trait is implemented by storage backends (e.g.
//! `statefacts-store-sqlite`). It knows nothing about the reference data or
//! index rules; those live in [`crate::engine`].

use std::future::Future;

use serde::Serialize;

use crate::funfact::FunFactDocument;

/// Result of [`FunFactStore::delete_one`]. Deleting a missing document is
/// not an error; it simply reports a zero count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
  pub deleted_count: u64,
}

/// Persistent mapping from state code to fun-fact document.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FunFactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the document for `state_code`, if any.
  fn find_one<'a>(
    &'a self,
    state_code: &'a str,
  ) -> impl Future<Output = Result<Option<FunFactDocument>, Self::Error>> + Send + 'a;

  /// Fetch every stored document.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<FunFactDocument>, Self::Error>> + Send + '_;

  /// Insert a new document. Returns `None`, leaving the stored document
  /// untouched, when one already exists for the code.
  fn create(
    &self,
    state_code: String,
    funfacts: Vec<String>,
  ) -> impl Future<Output = Result<Option<FunFactDocument>, Self::Error>> + Send + '_;

  /// Persist `document`, replacing the stored list for its code.
  fn save(
    &self,
    document: FunFactDocument,
  ) -> impl Future<Output = Result<FunFactDocument, Self::Error>> + Send + '_;

  /// Remove the document for `state_code`, if present.
  fn delete_one<'a>(
    &'a self,
    state_code: &'a str,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + 'a;
}
