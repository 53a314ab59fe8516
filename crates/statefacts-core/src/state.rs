//! Static state reference records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Codes of the states that do not border the other 48.
pub const NON_CONTIGUOUS: [&str; 2] = ["AK", "HI"];

/// One entry of the reference dataset. Serialised field names follow the
/// dataset's JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
  #[serde(rename = "state")]
  pub name:             String,
  pub slug:             String,
  /// Two-letter postal abbreviation, always uppercase.
  pub code:             String,
  pub nickname:         String,
  pub admission_date:   NaiveDate,
  /// Order of admission to the Union; Delaware is 1.
  pub admission_number: u32,
  #[serde(rename = "capital_city")]
  pub capital:          String,
  pub population:       u64,
  pub population_rank:  u32,
}

impl StateRecord {
  pub fn is_contiguous(&self) -> bool {
    !NON_CONTIGUOUS.contains(&self.code.as_str())
  }
}

/// Contiguity filter applied when listing states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContigFilter {
  #[default]
  All,
  ContiguousOnly,
  NonContiguousOnly,
}

impl ContigFilter {
  /// Interpret the `contig` query flag. Anything other than `true` or
  /// `false` means no filtering.
  pub fn from_flag(flag: Option<&str>) -> Self {
    match flag {
      Some("true") => Self::ContiguousOnly,
      Some("false") => Self::NonContiguousOnly,
      _ => Self::All,
    }
  }

  pub fn matches(self, record: &StateRecord) -> bool {
    match self {
      Self::All => true,
      Self::ContiguousOnly => record.is_contiguous(),
      Self::NonContiguousOnly => !record.is_contiguous(),
    }
  }
}
