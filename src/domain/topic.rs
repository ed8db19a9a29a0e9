use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named group of words, e.g. "Kitchen" or "Chapter 3"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
  pub id: i64,
  pub name: String,
  pub description: Option<String>,
  pub created_at: DateTime<Utc>,
  /// Filled in by listing queries, zero otherwise
  #[serde(default)]
  pub word_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTopic {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
}
