//! [`SqliteStore`], the SQLite implementation of [`FunFactStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use statefacts_core::{
  funfact::FunFactDocument,
  store::{DeleteOutcome, FunFactStore},
};

use crate::{
  Error, Result,
  encode::{RawDocument, encode_funfacts},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fun-fact store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Statements
/// run one at a time on the connection thread, so each call below is atomic
/// on its own; a find followed by a save is not.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FunFactStore impl ───────────────────────────────────────────────────────

impl FunFactStore for SqliteStore {
  type Error = Error;

  async fn find_one(&self, state_code: &str) -> Result<Option<FunFactDocument>> {
    let code = state_code.to_owned();

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT state_code, funfacts FROM funfact_documents WHERE state_code = ?1",
              rusqlite::params![code],
              RawDocument::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn find_all(&self) -> Result<Vec<FunFactDocument>> {
    let raws: Vec<RawDocument> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT state_code, funfacts FROM funfact_documents ORDER BY state_code",
        )?;
        let rows = stmt
          .query_map([], RawDocument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn create(
    &self,
    state_code: String,
    funfacts: Vec<String>,
  ) -> Result<Option<FunFactDocument>> {
    let code = state_code.clone();
    let facts_json = encode_funfacts(&funfacts)?;

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO funfact_documents (state_code, funfacts) VALUES (?1, ?2)
           ON CONFLICT (state_code) DO NOTHING",
          rusqlite::params![code, facts_json],
        )?;
        Ok(changed == 1)
      })
      .await?;

    Ok(inserted.then(|| FunFactDocument { state_code, funfacts }))
  }

  async fn save(&self, document: FunFactDocument) -> Result<FunFactDocument> {
    let code = document.state_code.clone();
    let facts_json = encode_funfacts(&document.funfacts)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO funfact_documents (state_code, funfacts) VALUES (?1, ?2)
           ON CONFLICT (state_code) DO UPDATE SET funfacts = excluded.funfacts",
          rusqlite::params![code, facts_json],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn delete_one(&self, state_code: &str) -> Result<DeleteOutcome> {
    let code = state_code.to_owned();

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM funfact_documents WHERE state_code = ?1",
          rusqlite::params![code],
        )?)
      })
      .await?;

    Ok(DeleteOutcome { deleted_count: deleted as u64 })
  }
}
