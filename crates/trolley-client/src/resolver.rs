//! The identity resolver.
//!
//! Owns the single [`Session`] for one client context: decides which list
//! code is active, persists that decision, and hands the resolved id to
//! whatever performs API calls. Construct one per context and inject it;
//! there is deliberately no global instance.
//!
//! Resolution precedence on first use:
//!
//! 1. a valid code carried by the navigational context (a shared link),
//!    adopted as a custom code
//! 2. the persisted custom code
//! 3. the persisted generated code
//! 4. a freshly generated code
//!
//! Storage failures never fail resolution: the resolver logs the problem and
//! carries on with an in-memory-only session for the rest of the context
//! lifetime.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use trolley_core::code::{generate_code, ListCode};
use trolley_core::error::{Result, TrolleyError};
use trolley_core::session::{KeyValueStore, Session, SessionInfo, SESSION_STORAGE_KEY};

use crate::record::SessionRecord;

struct ResolverState {
    session: Session,
    /// Last generated code, remembered across a custom-code claim.
    last_generated: Option<String>,
    /// Set once a storage operation has failed; from then on the session is
    /// in-memory only and no further writes are attempted.
    degraded: bool,
}

/// Resolves and maintains the active session for one client context.
pub struct SessionResolver {
    store: Arc<dyn KeyValueStore>,
    /// Code carried by the navigational context, read once at resolution.
    link_code: Option<String>,
    state: Mutex<Option<ResolverState>>,
}

impl SessionResolver {
    /// Creates a resolver over the given durable store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_link_code(store, None)
    }

    /// Creates a resolver that also considers a code from the navigational
    /// context (e.g. the query parameter of a shared link).
    ///
    /// The link code takes precedence over anything persisted; an invalid one
    /// is ignored with a warning.
    pub fn with_link_code(store: Arc<dyn KeyValueStore>, link_code: Option<String>) -> Self {
        Self {
            store,
            link_code,
            state: Mutex::new(None),
        }
    }

    /// Resolves the active session id.
    ///
    /// The first call derives the session (see the module docs for the
    /// precedence order) and persists it if it changed; subsequent calls
    /// return the cached value without re-deriving.
    pub async fn resolve_session_id(&self) -> String {
        let mut state = self.state.lock().await;
        self.ensure_resolved(&mut state).await;
        // Safe to unwrap: ensure_resolved always fills the slot
        state.as_ref().unwrap().session.id().to_string()
    }

    /// Read-only snapshot of the current session.
    pub async fn session_info(&self) -> SessionInfo {
        let mut state = self.state.lock().await;
        self.ensure_resolved(&mut state).await;
        state.as_ref().unwrap().session.info()
    }

    /// Claims a custom list code for this context.
    ///
    /// Claiming the code another device also claimed is how two devices end
    /// up sharing one list.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode` if the candidate fails format validation; the
    /// current session is left unchanged.
    pub async fn set_custom_list_code(&self, candidate: &str) -> Result<SessionInfo> {
        let code = ListCode::custom(candidate)
            .map_err(|e| TrolleyError::invalid_code(e.to_string()))?;

        let mut state = self.state.lock().await;
        self.ensure_resolved(&mut state).await;
        let state = state.as_mut().unwrap();

        // Remember the generated identity being displaced, if any
        if !state.session.is_custom() {
            state.last_generated = Some(state.session.id().to_string());
        }
        state.session = Session::new(code);
        self.persist(state).await;

        debug!(session_id = %state.session.id(), "claimed custom list code");
        Ok(state.session.info())
    }

    /// Reverts to a generated code, abandoning any custom one.
    ///
    /// Restores the generated code that was active before the claim when one
    /// is remembered, and mints a fresh one otherwise. The abandoned custom
    /// code is simply no longer referenced by this context; other devices
    /// that claimed it keep their access.
    pub async fn clear_custom_list_code(&self) -> Result<SessionInfo> {
        let mut state = self.state.lock().await;
        self.ensure_resolved(&mut state).await;
        let state = state.as_mut().unwrap();

        if state.session.is_custom() {
            let value = match state.last_generated.take() {
                Some(value) => value,
                None => generate_code(),
            };
            state.last_generated = Some(value.clone());
            state.session = Session::new(ListCode::from_generated(value));
            self.persist(state).await;
            debug!(session_id = %state.session.id(), "cleared custom list code");
        }

        Ok(state.session.info())
    }

    /// Discards the current session and starts a fresh one.
    ///
    /// The new code is always generated and always differs from the value
    /// held immediately before the call, whether that value was custom or
    /// generated.
    pub async fn generate_new_session(&self) -> Result<SessionInfo> {
        let mut state = self.state.lock().await;
        self.ensure_resolved(&mut state).await;
        let state = state.as_mut().unwrap();

        let previous = state.session.id().to_string();
        let mut value = generate_code();
        while value == previous {
            value = generate_code();
        }

        state.last_generated = Some(value.clone());
        state.session = Session::new(ListCode::from_generated(value));
        self.persist(state).await;

        debug!(session_id = %state.session.id(), "generated new session");
        Ok(state.session.info())
    }

    /// Derives the session on first use; no-op once resolved.
    async fn ensure_resolved(&self, slot: &mut Option<ResolverState>) {
        if slot.is_some() {
            return;
        }

        let (record, degraded) = self.load_record().await;

        // Link code wins over anything persisted
        if let Some(candidate) = self.link_code.as_deref() {
            match ListCode::custom(candidate) {
                Ok(code) => {
                    let last_generated = record.as_ref().and_then(|r| {
                        if r.is_custom_list_code {
                            r.generated_code.clone()
                        } else {
                            Some(r.session_id.clone())
                        }
                    });
                    let mut state = ResolverState {
                        session: Session::new(code),
                        last_generated,
                        degraded,
                    };
                    self.persist(&mut state).await;
                    debug!(session_id = %state.session.id(), "adopted list code from link");
                    *slot = Some(state);
                    return;
                }
                Err(e) => {
                    warn!(candidate, error = %e, "ignoring invalid list code from link");
                }
            }
        }

        if let Some(record) = record {
            let (session, last_generated) = record.into_session();
            debug!(session_id = %session.id(), "restored persisted session");
            *slot = Some(ResolverState {
                session,
                last_generated,
                degraded,
            });
            return;
        }

        // Nothing usable anywhere: mint a generated identity
        let session = Session::generated();
        let mut state = ResolverState {
            last_generated: Some(session.id().to_string()),
            session,
            degraded,
        };
        self.persist(&mut state).await;
        debug!(session_id = %state.session.id(), "created new generated session");
        *slot = Some(state);
    }

    /// Reads the persisted record, tolerating both an unusable store and a
    /// corrupt record.
    async fn load_record(&self) -> (Option<SessionRecord>, bool) {
        match self.store.get(SESSION_STORAGE_KEY).await {
            Ok(Some(json)) => match serde_json::from_str::<SessionRecord>(&json) {
                Ok(record) => (Some(record), false),
                Err(e) => {
                    warn!(error = %e, "discarding corrupt session record");
                    (None, false)
                }
            },
            Ok(None) => (None, false),
            Err(e) => {
                warn!(error = %e, "session storage unavailable; running in-memory only");
                (None, true)
            }
        }
    }

    /// Best-effort persistence; a failure degrades the session to in-memory
    /// only instead of propagating.
    async fn persist(&self, state: &mut ResolverState) {
        if state.degraded {
            return;
        }
        let record = SessionRecord::new(&state.session, state.last_generated.as_deref());
        let json = match serde_json::to_string(&record) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize session record");
                return;
            }
        };
        if let Err(e) = self.store.set(SESSION_STORAGE_KEY, &json).await {
            warn!(error = %e, "failed to persist session; running in-memory only");
            state.degraded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use trolley_core::code::GENERATED_CODE_LEN;
    use trolley_infrastructure::{FileKeyValueStore, MemoryKeyValueStore};

    fn resolver() -> SessionResolver {
        SessionResolver::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let resolver = resolver();
        let first = resolver.resolve_session_id().await;
        let second = resolver.resolve_session_id().await;
        assert_eq!(first, second);
        assert_eq!(first.len(), GENERATED_CODE_LEN);
    }

    #[tokio::test]
    async fn test_resolution_persists_across_instances() {
        let store = Arc::new(MemoryKeyValueStore::new());

        let first = SessionResolver::new(store.clone()).resolve_session_id().await;
        let second = SessionResolver::new(store).resolve_session_id().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_session_survives_restart_on_disk() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");

        let first = SessionResolver::new(Arc::new(FileKeyValueStore::new(&path)))
            .resolve_session_id()
            .await;
        let second = SessionResolver::new(Arc::new(FileKeyValueStore::new(&path)))
            .resolve_session_id()
            .await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_claim_and_clear_round_trip() {
        let resolver = resolver();
        resolver.resolve_session_id().await;

        let info = resolver.set_custom_list_code("test-list").await.unwrap();
        assert_eq!(info.session_id, "test-list");
        assert!(info.is_custom_list_code);

        let info = resolver.clear_custom_list_code().await.unwrap();
        assert!(!info.is_custom_list_code);
        assert_ne!(info.session_id, "test-list");
    }

    #[tokio::test]
    async fn test_clear_restores_previous_generated_code() {
        let resolver = resolver();
        let generated = resolver.resolve_session_id().await;

        resolver.set_custom_list_code("shared-list").await.unwrap();
        let info = resolver.clear_custom_list_code().await.unwrap();
        assert_eq!(info.session_id, generated);
    }

    #[tokio::test]
    async fn test_clear_without_custom_is_a_no_op() {
        let resolver = resolver();
        let generated = resolver.resolve_session_id().await;

        let info = resolver.clear_custom_list_code().await.unwrap();
        assert_eq!(info.session_id, generated);
        assert!(!info.is_custom_list_code);
    }

    #[tokio::test]
    async fn test_invalid_custom_code_leaves_session_unchanged() {
        let resolver = resolver();
        let before = resolver.resolve_session_id().await;

        let err = resolver.set_custom_list_code("AB@123").await.unwrap_err();
        assert!(err.is_invalid_code());

        let info = resolver.session_info().await;
        assert_eq!(info.session_id, before);
        assert!(!info.is_custom_list_code);
    }

    #[tokio::test]
    async fn test_new_session_differs_from_previous() {
        let resolver = resolver();
        let first = resolver.resolve_session_id().await;

        let second = resolver.generate_new_session().await.unwrap();
        assert_ne!(second.session_id, first);

        let third = resolver.generate_new_session().await.unwrap();
        assert_ne!(third.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_new_session_discards_custom_code() {
        let resolver = resolver();
        resolver.set_custom_list_code("test-list").await.unwrap();

        let info = resolver.generate_new_session().await.unwrap();
        assert_ne!(info.session_id, "test-list");
        assert!(!info.is_custom_list_code);
    }

    #[tokio::test]
    async fn test_link_code_wins_over_persisted_session() {
        let store = Arc::new(MemoryKeyValueStore::new());

        // An earlier visit left a generated session behind
        let earlier = SessionResolver::new(store.clone());
        let generated = earlier.resolve_session_id().await;

        // Opening a shared link adopts its code as custom...
        let linked =
            SessionResolver::with_link_code(store.clone(), Some("friends-bbq".to_string()));
        let info = linked.session_info().await;
        assert_eq!(info.session_id, "friends-bbq");
        assert!(info.is_custom_list_code);

        // ...and clearing it afterwards restores the earlier identity
        let info = linked.clear_custom_list_code().await.unwrap();
        assert_eq!(info.session_id, generated);
    }

    #[tokio::test]
    async fn test_invalid_link_code_is_ignored() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let generated = SessionResolver::new(store.clone()).resolve_session_id().await;

        let linked = SessionResolver::with_link_code(store, Some("@@".to_string()));
        assert_eq!(linked.resolve_session_id().await, generated);
    }

    #[tokio::test]
    async fn test_custom_code_persists_across_instances() {
        let store = Arc::new(MemoryKeyValueStore::new());

        SessionResolver::new(store.clone())
            .set_custom_list_code("test-list")
            .await
            .unwrap();

        let info = SessionResolver::new(store).session_info().await;
        assert_eq!(info.session_id, "test-list");
        assert!(info.is_custom_list_code);
    }

    /// A store that fails every operation, for degradation tests.
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(TrolleyError::storage("disk on fire"))
        }
        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(TrolleyError::storage("disk on fire"))
        }
        async fn remove(&self, _key: &str) -> Result<()> {
            Err(TrolleyError::storage("disk on fire"))
        }
    }

    #[tokio::test]
    async fn test_unavailable_storage_degrades_to_in_memory() {
        let resolver = SessionResolver::new(Arc::new(BrokenStore));

        // Resolution still works...
        let id = resolver.resolve_session_id().await;
        assert_eq!(id, resolver.resolve_session_id().await);

        // ...and so do mutations, in memory only
        let info = resolver.set_custom_list_code("test-list").await.unwrap();
        assert!(info.is_custom_list_code);
        let info = resolver.generate_new_session().await.unwrap();
        assert_ne!(info.session_id, "test-list");
    }

    #[tokio::test]
    async fn test_corrupt_record_falls_back_to_fresh_session() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(SESSION_STORAGE_KEY, "{broken").await.unwrap();

        let resolver = SessionResolver::new(store.clone());
        let id = resolver.resolve_session_id().await;
        assert_eq!(id.len(), GENERATED_CODE_LEN);

        // The fresh session overwrote the corrupt record
        let raw = store.get(SESSION_STORAGE_KEY).await.unwrap().unwrap();
        assert!(raw.contains(&id));
    }
}
