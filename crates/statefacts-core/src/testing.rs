//! In-memory [`FunFactStore`] for engine tests.

use std::{
  collections::BTreeMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
  },
};

use thiserror::Error;

use crate::{
  funfact::FunFactDocument,
  store::{DeleteOutcome, FunFactStore},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("injected failure")]
  Injected,
}

#[derive(Default)]
pub struct MemoryStore {
  docs:      Mutex<BTreeMap<String, Vec<String>>>,
  fail_next: AtomicBool,
  miss_next: AtomicBool,
}

impl MemoryStore {
  /// Make the next store call fail.
  pub fn fail_next(&self) { self.fail_next.store(true, Ordering::SeqCst); }

  /// Make the next `find_one` report no document, as if another writer
  /// created it just after the read.
  pub fn miss_next(&self) { self.miss_next.store(true, Ordering::SeqCst); }

  fn check(&self) -> Result<(), MemoryError> {
    if self.fail_next.swap(false, Ordering::SeqCst) {
      Err(MemoryError::Injected)
    } else {
      Ok(())
    }
  }
}

impl FunFactStore for MemoryStore {
  type Error = MemoryError;

  async fn find_one(&self, state_code: &str) -> Result<Option<FunFactDocument>, MemoryError> {
    self.check()?;
    if self.miss_next.swap(false, Ordering::SeqCst) {
      return Ok(None);
    }
    let docs = self.docs.lock().unwrap();
    Ok(
      docs
        .get(state_code)
        .map(|facts| FunFactDocument::new(state_code, facts.clone())),
    )
  }

  async fn find_all(&self) -> Result<Vec<FunFactDocument>, MemoryError> {
    self.check()?;
    let docs = self.docs.lock().unwrap();
    Ok(
      docs
        .iter()
        .map(|(code, facts)| FunFactDocument::new(code.clone(), facts.clone()))
        .collect(),
    )
  }

  async fn create(
    &self,
    state_code: String,
    funfacts: Vec<String>,
  ) -> Result<Option<FunFactDocument>, MemoryError> {
    self.check()?;
    let mut docs = self.docs.lock().unwrap();
    if docs.contains_key(&state_code) {
      return Ok(None);
    }
    docs.insert(state_code.clone(), funfacts.clone());
    Ok(Some(FunFactDocument::new(state_code, funfacts)))
  }

  async fn save(&self, document: FunFactDocument) -> Result<FunFactDocument, MemoryError> {
    self.check()?;
    let mut docs = self.docs.lock().unwrap();
    docs.insert(document.state_code.clone(), document.funfacts.clone());
    Ok(document)
  }

  async fn delete_one(&self, state_code: &str) -> Result<DeleteOutcome, MemoryError> {
    self.check()?;
    let mut docs = self.docs.lock().unwrap();
    let deleted_count = u64::from(docs.remove(state_code).is_some());
    Ok(DeleteOutcome { deleted_count })
  }
}
