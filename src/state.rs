// src/state.rs
use crate::{
    services::{import_service::ImportReconciler, session_service::SessionManager},
    store::AttendanceStore,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per user id.
///
/// Every read-check-write sequence on a user's attendance (clock-in, clock-out,
/// edit, import) runs while holding that user's lock, so two concurrent
/// clock-ins cannot both see "no open session".
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub async fn acquire(&self, user_id: i64) -> OwnedMutexGuard<()> {
        // Only hold the map lock long enough to fetch/create the user's mutex
        let user_lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(user_id).or_default().clone()
        };
        user_lock.lock_owned().await
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttendanceStore>,
    pub sessions: SessionManager,
    pub importer: ImportReconciler,
}

impl AppState {
    /// Wires every component to the same store and lock table.
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        let locks = UserLocks::default();
        Self {
            sessions: SessionManager::new(store.clone(), locks.clone()),
            importer: ImportReconciler::new(store.clone(), locks),
            store,
        }
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn AttendanceStore> {
    fn from_ref(state: &AppState) -> Arc<dyn AttendanceStore> {
        state.store.clone()
    }
}

impl axum::extract::FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> SessionManager {
        state.sessions.clone()
    }
}

impl axum::extract::FromRef<AppState> for ImportReconciler {
    fn from_ref(state: &AppState) -> ImportReconciler {
        state.importer.clone()
    }
}
