//! In-memory store of discovered models
//!
//! Keeps the process tree of every discovery so it can be re-aggregated
//! later under its log id. Bounded: the oldest entry is evicted once the
//! capacity is reached.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use hieragg_core::domain::tree::TreeNode;
use hieragg_core::dto::discovery::LogStats;
use uuid::Uuid;

/// A discovered model kept for later aggregation
#[derive(Debug, Clone)]
pub struct StoredModel {
    pub tree: TreeNode,
    pub stats: LogStats,
    pub source: PathBuf,
    pub discovered_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    models: HashMap<Uuid, StoredModel>,
    order: VecDeque<Uuid>,
}

/// Bounded map from log id to stored model
#[derive(Debug)]
pub struct ModelStore {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl ModelStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(Inner::default()),
        }
    }

    // A panic while holding the lock leaves the map itself consistent
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, id: Uuid, model: StoredModel) {
        let mut inner = self.write();

        if inner.models.insert(id, model).is_none() {
            inner.order.push_back(id);
        }

        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.models.remove(&oldest);
                tracing::debug!(log_id = %oldest, "Evicted stored model");
            }
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<StoredModel> {
        self.read().models.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hieragg_core::domain::tree::ProcessTree;

    fn model(label: &str) -> StoredModel {
        StoredModel {
            tree: TreeNode::from_tree(&ProcessTree::activity(label, 1)),
            stats: LogStats::default(),
            source: PathBuf::from("uploads/log.csv"),
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = ModelStore::new(4);
        let id = Uuid::new_v4();
        store.insert(id, model("a"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().tree.label, "a");
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_evicts_oldest() {
        let store = ModelStore::new(2);
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for (id, label) in ids.iter().zip(["a", "b", "c"]) {
            store.insert(*id, model(label));
        }

        assert_eq!(store.len(), 2);
        assert!(store.get(&ids[0]).is_none());
        assert!(store.get(&ids[2]).is_some());
    }

    #[test]
    fn test_reinsert_keeps_single_entry() {
        let store = ModelStore::new(2);
        let id = Uuid::new_v4();
        store.insert(id, model("a"));
        store.insert(id, model("b"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&id).unwrap().tree.label, "b");
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        assert_eq!(ModelStore::new(0).capacity(), 1);
    }
}
