//! Shared registry handle for concurrent callers.
//!
//! Every operation holds the lock for its whole check-then-act sequence, so
//! two concurrent registrations of the same id cannot both succeed.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::RegistryResult;
use crate::registry::AuthorityRegistry;
use crate::snapshot::RegistrySnapshot;
use crate::types::{AuthorityRecord, AuthorityStatus};

/// Cloneable, lock-guarded [`AuthorityRegistry`].
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<AuthorityRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: AuthorityRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub async fn owner(&self) -> String {
        self.inner.read().await.owner().to_string()
    }

    /// Look up an authority (returns a copy).
    pub async fn get(&self, id: &str) -> Option<AuthorityRecord> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn is_active(&self, id: &str) -> bool {
        self.inner.read().await.is_active(id)
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.inner.read().await.contains(id)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn register(
        &self,
        caller: &str,
        id: &str,
        name: &str,
        website: &str,
    ) -> RegistryResult<()> {
        self.inner.write().await.register(caller, id, name, website)
    }

    pub async fn update_status(
        &self,
        caller: &str,
        id: &str,
        new_status: AuthorityStatus,
    ) -> RegistryResult<()> {
        self.inner.write().await.update_status(caller, id, new_status)
    }

    pub async fn update_status_str(
        &self,
        caller: &str,
        id: &str,
        new_status: &str,
    ) -> RegistryResult<()> {
        self.inner
            .write()
            .await
            .update_status_str(caller, id, new_status)
    }

    /// Consistent snapshot of the whole registry.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.inner.read().await.snapshot()
    }
}

impl From<AuthorityRegistry> for SharedRegistry {
    fn from(registry: AuthorityRegistry) -> Self {
        Self::new(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    const OWNER: &str = "0x1234567890abcdef";

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_single_winner() {
        let shared = SharedRegistry::new(AuthorityRegistry::new(OWNER));

        let mut handles = Vec::new();
        for i in 0..16 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                shared
                    .register(OWNER, "contested", &format!("Authority {i}"), "https://c.example")
                    .await
            }));
        }

        let mut wins = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => wins += 1,
                Err(RegistryError::AlreadyRegistered { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(shared.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_status_updates_stay_valid() {
        let shared = SharedRegistry::new(AuthorityRegistry::new(OWNER));
        shared
            .register(OWNER, "auth", "A", "https://a.example")
            .await
            .unwrap();

        let targets = [
            AuthorityStatus::Active,
            AuthorityStatus::Suspended,
            AuthorityStatus::Revoked,
        ];
        let mut handles = Vec::new();
        for i in 0..30 {
            let shared = shared.clone();
            let status = targets[i % targets.len()];
            handles.push(tokio::spawn(async move {
                shared.update_status(OWNER, "auth", status).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = shared.get("auth").await.unwrap();
        assert!(record.status.is_transition_target());
        assert!(record.last_updated >= record.registration_date);
    }

    #[tokio::test]
    async fn test_shared_mirrors_registry_rules() {
        let shared: SharedRegistry = AuthorityRegistry::new(OWNER).into();
        assert_eq!(shared.owner().await, OWNER);
        assert!(shared.is_empty().await);

        assert!(matches!(
            shared.register("intruder", "auth2", "X", "https://x.example").await,
            Err(RegistryError::Unauthorized { .. })
        ));
        assert!(!shared.contains("auth2").await);

        shared
            .register(OWNER, "auth5", "Active Authority", "https://active.com")
            .await
            .unwrap();
        assert!(matches!(
            shared.update_status_str(OWNER, "auth5", "enabled").await,
            Err(RegistryError::InvalidStatus { .. })
        ));
        shared
            .update_status_str(OWNER, "auth5", "active")
            .await
            .unwrap();
        assert!(shared.is_active("auth5").await);

        let snapshot = shared.snapshot().await;
        assert_eq!(snapshot.authorities.len(), 1);
    }
}
