//! Versioned JSON snapshots of a registry.
//!
//! The CLI keeps its registry in a snapshot file between invocations.
//!
//! # Snapshot Format (v1)
//!
//! ```json
//! {
//!   "version": 1,
//!   "generated_at": "2026-03-01T12:00:00Z",
//!   "owner": "0x1234567890abcdef",
//!   "authorities": {
//!     "auth1": {
//!       "name": "Test Authority",
//!       "website": "https://test-authority.com",
//!       "status": "active",
//!       "registration_date": "2026-03-01T11:00:00Z",
//!       "last_updated": "2026-03-01T11:30:00Z"
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::{RegistryError, RegistryResult};
use crate::registry::AuthorityRegistry;
use crate::types::AuthorityRecord;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Serialized image of an [`AuthorityRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Schema version.
    pub version: u8,

    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,

    /// Registry owner.
    pub owner: String,

    /// Authority id -> record
    #[serde(default)]
    pub authorities: BTreeMap<String, AuthorityRecord>,
}

impl RegistrySnapshot {
    /// Load a snapshot from a path.
    pub async fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| RegistryError::Snapshot {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;

        debug!(path = %path.display(), "loaded snapshot");
        Self::parse(&content)
    }

    /// Parse and validate snapshot JSON.
    pub fn parse(content: &str) -> RegistryResult<Self> {
        let snapshot: RegistrySnapshot =
            serde_json::from_str(content).map_err(|e| RegistryError::Snapshot {
                message: format!("failed to parse snapshot: {}", e),
            })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Save the snapshot, replacing the file atomically.
    pub async fn save(&self, path: impl AsRef<Path>) -> RegistryResult<()> {
        let path = path.as_ref();
        let content = self.to_json()?;

        // Unique temp file in the target directory, so the rename stays on one filesystem.
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| RegistryError::Snapshot {
            message: format!("failed to create temp file in {}: {}", dir.display(), e),
        })?;
        fs::write(temp.path(), content)
            .await
            .map_err(|e| RegistryError::Snapshot {
                message: format!("failed to write temp file: {}", e),
            })?;
        temp.persist(path).map_err(|e| RegistryError::Snapshot {
            message: format!("failed to replace {}: {}", path.display(), e.error),
        })?;

        info!(path = %path.display(), authorities = self.authorities.len(), "saved snapshot");
        Ok(())
    }

    /// Convert to pretty-printed JSON.
    pub fn to_json(&self) -> RegistryResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RegistryError::Snapshot {
            message: format!("failed to serialize snapshot: {}", e),
        })
    }

    /// Check the registry invariants a hand-edited file could break.
    pub fn validate(&self) -> RegistryResult<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(RegistryError::Snapshot {
                message: format!(
                    "unsupported snapshot version {} (expected {})",
                    self.version, SNAPSHOT_VERSION
                ),
            });
        }

        if self.owner.is_empty() {
            return Err(RegistryError::Snapshot {
                message: "snapshot has no owner".to_string(),
            });
        }

        for (id, record) in &self.authorities {
            if record.last_updated < record.registration_date {
                return Err(RegistryError::Snapshot {
                    message: format!("authority {}: last_updated precedes registration_date", id),
                });
            }
        }

        Ok(())
    }
}

impl AuthorityRegistry {
    /// Take a snapshot of the current state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            version: SNAPSHOT_VERSION,
            generated_at: self.clock.now(),
            owner: self.owner.clone(),
            authorities: self.authorities.clone(),
        }
    }

    /// Rebuild a registry from a snapshot.
    pub fn from_snapshot(snapshot: RegistrySnapshot, clock: Arc<dyn Clock>) -> RegistryResult<Self> {
        snapshot.validate()?;
        let mut registry = Self::with_clock(snapshot.owner, clock);
        registry.authorities = snapshot.authorities;
        Ok(registry)
    }
}
