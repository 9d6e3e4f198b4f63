//! Authority records, status values and registry configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// Default state file used by the CLI.
pub const DEFAULT_STATE_FILE: &str = "authority-registry.json";

/// Lifecycle status of an authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityStatus {
    /// Registered, not yet reviewed. Only set by registration.
    Pending,

    /// In good standing.
    Active,

    /// Temporarily disabled.
    Suspended,

    /// Permanently withdrawn. Nothing prevents a later transition back.
    Revoked,
}

impl AuthorityStatus {
    /// All status values, in declaration order.
    pub const ALL: [AuthorityStatus; 4] = [
        Self::Pending,
        Self::Active,
        Self::Suspended,
        Self::Revoked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Revoked => "revoked",
        }
    }

    /// Whether a status update may move a record into this status.
    pub fn is_transition_target(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for AuthorityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorityStatus {
    type Err = RegistryError;

    /// Exact, lowercase match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| RegistryError::InvalidStatus {
                status: s.to_string(),
            })
    }
}

/// A registered authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityRecord {
    /// Display name.
    pub name: String,

    /// Website URL, stored as given.
    pub website: String,

    /// Current lifecycle status.
    pub status: AuthorityStatus,

    /// When the authority was registered.
    pub registration_date: DateTime<Utc>,

    /// When the status last changed (registration counts as a change).
    pub last_updated: DateTime<Utc>,
}

impl AuthorityRecord {
    /// Fresh `pending` record stamped with `now`.
    pub fn new(name: impl Into<String>, website: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            website: website.into(),
            status: AuthorityStatus::Pending,
            registration_date: now,
            last_updated: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AuthorityStatus::Active
    }
}

/// Registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Owner identity for newly created registries.
    #[serde(default)]
    pub owner: Option<String>,

    /// Snapshot file the CLI reads and writes.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

fn default_state_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            owner: None,
            state_path: default_state_path(),
        }
    }
}

impl RegistryConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `AUTHORITY_REGISTRY_OWNER` | Owner identity |
    /// | `AUTHORITY_REGISTRY_STATE` | Snapshot file path |
    pub fn from_env() -> Self {
        Self {
            owner: std::env::var("AUTHORITY_REGISTRY_OWNER")
                .ok()
                .filter(|v| !v.is_empty()),
            state_path: std::env::var("AUTHORITY_REGISTRY_STATE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_state_path),
        }
    }

    /// Load config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse config from YAML content.
    pub fn from_yaml_str(content: &str) -> RegistryResult<Self> {
        serde_yaml::from_str(content).map_err(|e| RegistryError::Config {
            message: format!("failed to parse config: {}", e),
        })
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the snapshot path.
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// The configured owner, or a `Config` error if none is set.
    pub fn require_owner(&self) -> RegistryResult<&str> {
        match self.owner.as_deref() {
            Some(owner) if !owner.is_empty() => Ok(owner),
            _ => Err(RegistryError::Config {
                message: "no registry owner configured (set AUTHORITY_REGISTRY_OWNER)"
                    .to_string(),
            }),
        }
    }
}
