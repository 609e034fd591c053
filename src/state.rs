use crate::backend::BackendClient;
use crate::session::SessionStore;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub sessions: SessionStore,
    pub punch_locks: UserLocks,
}

impl AppState {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            sessions: SessionStore::default(),
            punch_locks: UserLocks::default(),
        }
    }
}

/// One mutex per user id; holders run their read-check-write sequence alone.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(user_id.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}
