use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::domain::chart::ChartSelection;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "chartdir_session";

#[derive(Default)]
struct Sessions {
    selections: HashMap<String, ChartSelection>,
    /// Least recently written first
    order: VecDeque<String>,
}

/// Chart selection per browser session, bounded to `capacity` sessions
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<Sessions>>,
    capacity: usize,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn get(&self, session_id: &str) -> Option<ChartSelection> {
        let sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.selections.get(session_id).cloned()
    }

    /// Store `selection` for the session, evicting the stalest session when full
    pub fn put(&self, session_id: &str, selection: ChartSelection) {
        let mut sessions = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if sessions.selections.contains_key(session_id) {
            sessions.order.retain(|id| id != session_id);
        } else {
            while sessions.selections.len() >= self.capacity {
                match sessions.order.pop_front() {
                    Some(evicted) => {
                        sessions.selections.remove(&evicted);
                        tracing::debug!(session = %evicted, "Evicted chart session");
                    }
                    None => break,
                }
            }
        }

        sessions.order.push_back(session_id.to_string());
        sessions
            .selections
            .insert(session_id.to_string(), selection);
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .selections
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(path: &str) -> ChartSelection {
        ChartSelection::new(path, "x", vec!["y".to_string()])
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(8);
        store.put("tab-a", selection("a.csv"));
        store.put("tab-b", selection("b.csv"));

        assert_eq!(store.get("tab-a").unwrap().path, "a.csv");
        assert_eq!(store.get("tab-b").unwrap().path, "b.csv");
        assert!(store.get("tab-c").is_none());
    }

    #[test]
    fn test_put_overwrites_same_session() {
        let store = SessionStore::new(8);
        store.put("s", selection("a.csv"));
        store.put("s", selection("b.csv"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("s").unwrap().path, "b.csv");
    }

    #[test]
    fn test_capacity_evicts_stalest() {
        let store = SessionStore::new(2);
        store.put("first", selection("1.csv"));
        store.put("second", selection("2.csv"));
        store.put("first", selection("1b.csv"));
        store.put("third", selection("3.csv"));

        assert_eq!(store.len(), 2);
        assert!(store.get("second").is_none());
        assert_eq!(store.get("first").unwrap().path, "1b.csv");
        assert!(store.get("third").is_some());
    }

    #[test]
    fn test_new_session_ids_are_unique() {
        assert_ne!(SessionStore::new_session_id(), SessionStore::new_session_id());
    }
}
