//! Session State Manager: the single write path for sessions.
//!
//! Every mutation runs inside a [`SessionTxn`], which holds the per-session
//! lock from load to save. Turns on the same session are therefore
//! serialized, while different sessions never contend. A transaction dropped
//! without [`SessionTxn::commit`] discards its changes.

use crate::error::ConciergeError;
use chrono::Utc;
use concierge_domain::{
    DomainError, Role, Session, SessionId, SessionRepository, SessionSummary,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

/// Owner of the session registry and its per-session locks
pub struct SessionStateManager {
    repository: Arc<dyn SessionRepository>,
    locks: Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>,
}

impl SessionStateManager {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, id: &SessionId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        locks.entry(id.clone()).or_default().clone()
    }

    /// Create and persist a fresh session.
    pub async fn create(&self) -> Result<Session, ConciergeError> {
        let session = Session::new(SessionId::new(Uuid::new_v4().to_string()), Utc::now());
        self.repository.save(&session).await?;
        info!(session_id = %session.id(), "Created session");
        Ok(session)
    }

    /// Load a session; an unknown id is `NotFound`.
    pub async fn load(&self, id: &SessionId) -> Result<Session, ConciergeError> {
        self.repository
            .load(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", id.as_str()).into())
    }

    /// Existing session for `id`, or a new one when `id` is `None`.
    ///
    /// A provided but unknown id is `NotFound`; substituting a fresh session
    /// is left to the caller.
    pub async fn get_or_create(&self, id: Option<&SessionId>) -> Result<Session, ConciergeError> {
        match id {
            Some(id) => self.load(id).await,
            None => self.create().await,
        }
    }

    /// Drop the lock entry for `id` unless someone else still holds it.
    fn release_lock(&self, id: &SessionId) {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        if locks.get(id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(id);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    /// Lock the session and load it for mutation.
    ///
    /// An unknown id is `NotFound` and leaves no lock entry behind.
    pub async fn begin(&self, id: &SessionId) -> Result<SessionTxn, ConciergeError> {
        let guard = self.lock_for(id).lock_owned().await;
        debug!(session_id = %id, "Session lock acquired");
        let Some(session) = self.repository.load(id).await? else {
            drop(guard);
            self.release_lock(id);
            return Err(DomainError::not_found("Session", id.as_str()).into());
        };
        Ok(SessionTxn {
            session,
            repository: self.repository.clone(),
            _guard: guard,
        })
    }

    /// Apply `f` under the session lock and save on success.
    ///
    /// On error nothing is written.
    pub async fn update<T, F>(&self, id: &SessionId, f: F) -> Result<(T, Session), ConciergeError>
    where
        F: FnOnce(&mut Session) -> Result<T, DomainError>,
    {
        let mut txn = self.begin(id).await?;
        let value = f(txn.session_mut())?;
        let session = txn.commit().await?;
        Ok((value, session))
    }

    /// Append one chat entry to a stored session.
    pub async fn append_message(
        &self,
        id: &SessionId,
        role: Role,
        content: &str,
    ) -> Result<Session, ConciergeError> {
        let mut txn = self.begin(id).await?;
        txn.append_message(role, content);
        txn.commit().await
    }

    pub async fn list(&self) -> Result<Vec<Session>, ConciergeError> {
        Ok(self.repository.list().await?)
    }

    /// Session list read model, newest first.
    pub async fn summaries(&self) -> Result<Vec<SessionSummary>, ConciergeError> {
        let mut summaries: Vec<SessionSummary> =
            self.list().await?.iter().map(Session::summary).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }
}

/// A locked, loaded session awaiting commit
pub struct SessionTxn {
    session: Session,
    repository: Arc<dyn SessionRepository>,
    _guard: OwnedMutexGuard<()>,
}

impl SessionTxn {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Append a chat entry stamped with the current time.
    pub fn append_message(&mut self, role: Role, content: &str) {
        self.session.append_message(role, content, Utc::now());
    }

    /// Persist the session and release the lock.
    pub async fn commit(self) -> Result<Session, ConciergeError> {
        self.repository.save(&self.session).await?;
        debug!(session_id = %self.session.id(), "Session committed");
        Ok(self.session)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use concierge_domain::{PreferenceUpdate, RepositoryError};
    use std::time::Duration;

    /// Map-backed repository for use case tests.
    #[derive(Default)]
    pub(crate) struct MemorySessions {
        pub(crate) sessions: Mutex<HashMap<SessionId, Session>>,
    }

    #[async_trait]
    impl SessionRepository for MemorySessions {
        async fn load(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().get(id).cloned())
        }

        async fn save(&self, session: &Session) -> Result<(), RepositoryError> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.id().clone(), session.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<Session>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().values().cloned().collect())
        }
    }

    fn manager() -> SessionStateManager {
        SessionStateManager::new(Arc::new(MemorySessions::default()))
    }

    #[tokio::test]
    async fn test_get_or_create() {
        let manager = manager();
        let created = manager.get_or_create(None).await.unwrap();
        let loaded = manager.get_or_create(Some(created.id())).await.unwrap();
        assert_eq!(created, loaded);

        let err = manager
            .get_or_create(Some(&SessionId::new("missing")))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_ids_leave_no_lock_entries() {
        let manager = manager();
        for i in 0..5 {
            let err = manager
                .begin(&SessionId::new(format!("bogus-{}", i)))
                .await
                .err()
                .unwrap();
            assert!(err.is_not_found());
        }
        assert_eq!(manager.tracked_locks(), 0);

        let id = manager.create().await.unwrap().id().clone();
        manager.begin(&id).await.unwrap().commit().await.unwrap();
        assert_eq!(manager.tracked_locks(), 1);
    }

    #[tokio::test]
    async fn test_uncommitted_txn_is_discarded() {
        let manager = manager();
        let id = manager.create().await.unwrap().id().clone();
        {
            let mut txn = manager.begin(&id).await.unwrap();
            txn.append_message(Role::User, "never saved");
        }
        assert_eq!(manager.load(&id).await.unwrap().message_count(), 0);
    }

    #[tokio::test]
    async fn test_update_error_writes_nothing() {
        let manager = manager();
        let id = manager.create().await.unwrap().id().clone();
        let result: Result<((), Session), _> = manager
            .update(&id, |s| {
                s.apply_preferences(&PreferenceUpdate {
                    destination: Some("Rome".to_string()),
                    ..Default::default()
                });
                Err(DomainError::EmptyItinerary)
            })
            .await;
        assert!(result.is_err());
        assert!(manager.load(&id).await.unwrap().preferences().destination.is_none());
    }

    #[tokio::test]
    async fn test_message_count_matches_appends() {
        let manager = manager();
        let id = manager.create().await.unwrap().id().clone();
        for i in 0..4 {
            manager
                .append_message(&id, Role::User, &format!("message {}", i))
                .await
                .unwrap();
        }
        let summaries = manager.summaries().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].message_count, 4);
    }

    #[tokio::test]
    async fn test_same_session_turns_are_serialized() {
        let manager = Arc::new(manager());
        let id = manager.create().await.unwrap().id().clone();

        let mut handles = Vec::new();
        for i in 0..8 {
            let manager = manager.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let mut txn = manager.begin(&id).await.unwrap();
                tokio::time::sleep(Duration::from_millis(2)).await;
                txn.append_message(Role::User, &format!("turn {}", i));
                txn.commit().await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(manager.load(&id).await.unwrap().message_count(), 8);
    }
}
