//! In-memory storage for live sessions.
//!
//! Sessions are keyed by a random id handed to the client and expire after
//! `config::SESSION_EXPIRY_HOURS` without activity.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config;

/// Session entry with last access time for expiration
struct SessionEntry<T> {
  session: T,
  last_access: DateTime<Utc>,
}

pub struct SessionStore<T> {
  sessions: Arc<Mutex<HashMap<String, SessionEntry<T>>>>,
}

impl<T> Clone for SessionStore<T> {
  fn clone(&self) -> Self {
    Self {
      sessions: Arc::clone(&self.sessions),
    }
  }
}

impl<T> Default for SessionStore<T> {
  fn default() -> Self {
    Self {
      sessions: Arc::new(Mutex::new(HashMap::new())),
    }
  }
}

impl<T> SessionStore<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Store a new session and return its id
  pub fn insert(&self, session: T) -> String {
    let id = generate_session_id();
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, Utc::now());
    }

    sessions.insert(
      id.clone(),
      SessionEntry {
        session,
        last_access: Utc::now(),
      },
    );
    id
  }

  /// Run `f` against a live session, refreshing its last access time
  pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let entry = sessions.get_mut(id)?;
    entry.last_access = Utc::now();
    Some(f(&mut entry.session))
  }

  pub fn remove(&self, id: &str) -> Option<T> {
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
    sessions.remove(id).map(|entry| entry.session)
  }

  pub fn len(&self) -> usize {
    self.sessions.lock().map(|s| s.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn purge_expired(&self, now: DateTime<Utc>) {
    let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_expired(&mut sessions, now);
  }
}

fn cleanup_expired<T>(sessions: &mut HashMap<String, SessionEntry<T>>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_generate_session_id_shape() {
    let id = generate_session_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    assert_ne!(id, generate_session_id());
  }

  #[test]
  fn test_insert_and_update() {
    let store = SessionStore::new();
    let id = store.insert(vec![1]);

    store.with_session(&id, |v: &mut Vec<i32>| v.push(2));
    assert_eq!(store.with_session(&id, |v| v.clone()), Some(vec![1, 2]));
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_unknown_session() {
    let store: SessionStore<u32> = SessionStore::new();
    assert!(store.with_session("missing", |_| ()).is_none());
    assert!(store.remove("missing").is_none());
  }

  #[test]
  fn test_remove() {
    let store = SessionStore::new();
    let id = store.insert(5u32);
    assert_eq!(store.remove(&id), Some(5));
    assert!(store.is_empty());
  }

  #[test]
  fn test_purge_expired() {
    let store = SessionStore::new();
    store.insert("stale");
    store.purge_expired(Utc::now() + Duration::hours(config::SESSION_EXPIRY_HOURS + 1));
    assert!(store.is_empty());

    store.insert("fresh");
    store.purge_expired(Utc::now());
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn test_clones_share_sessions() {
    let store = SessionStore::new();
    let other = store.clone();
    let id = store.insert(1u8);
    assert_eq!(other.with_session(&id, |v| *v), Some(1));
  }
}
