//! Owner-gated registry of authorities.
//!
//! An authority is an entity with a unique id, a display name, a website and
//! a lifecycle status (`pending`, `active`, `suspended`, `revoked`). A single
//! owner, fixed when the registry is created, is the only identity allowed to
//! register authorities or change their status.
//!
//! # Quick Start
//!
//! ```
//! use authority_registry::{AuthorityRegistry, AuthorityStatus, RegistryError};
//!
//! let owner = "0x1234567890abcdef";
//! let mut registry = AuthorityRegistry::new(owner);
//!
//! registry.register(owner, "auth1", "Test Authority", "https://test-authority.com")?;
//! assert!(!registry.is_active("auth1"));
//!
//! registry.update_status(owner, "auth1", AuthorityStatus::Active)?;
//! assert!(registry.is_active("auth1"));
//!
//! let err = registry.register("someone-else", "auth2", "Other", "https://other.com");
//! assert!(matches!(err, Err(RegistryError::Unauthorized { .. })));
//! # Ok::<(), RegistryError>(())
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `AUTHORITY_REGISTRY_OWNER` | Owner identity for new registries |
//! | `AUTHORITY_REGISTRY_STATE` | Snapshot file (default: `authority-registry.json`) |

pub mod clock;
pub mod error;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod types;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{RegistryError, RegistryResult};
pub use registry::AuthorityRegistry;
pub use shared::SharedRegistry;
pub use snapshot::{RegistrySnapshot, SNAPSHOT_VERSION};
pub use types::{AuthorityRecord, AuthorityStatus, RegistryConfig, DEFAULT_STATE_FILE};
