//! The authority registry.
//!
//! One owner, fixed at construction, and an ordered map of authority id to
//! [`AuthorityRecord`]. Only the owner may register authorities or change
//! their status. Records are never removed.
//!
//! Check order is part of the contract:
//!
//! - `register`: authorization, then existence.
//! - `update_status`: authorization, then status validity, then existence.
//!
//! A rejected call leaves the registry exactly as it was.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{RegistryError, RegistryResult};
use crate::types::{AuthorityRecord, AuthorityStatus, RegistryConfig};

/// Owner-gated map of authorities.
#[derive(Debug, Clone)]
pub struct AuthorityRegistry {
    /// The only identity allowed to mutate the registry.
    pub(crate) owner: String,

    /// Authority id -> record
    pub(crate) authorities: BTreeMap<String, AuthorityRecord>,

    pub(crate) clock: Arc<dyn Clock>,
}

impl AuthorityRegistry {
    /// Create an empty registry owned by `owner`, stamped by the wall clock.
    pub fn new(owner: impl Into<String>) -> Self {
        Self::with_clock(owner, Arc::new(SystemClock))
    }

    /// Create an empty registry with an injected clock.
    pub fn with_clock(owner: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            owner: owner.into(),
            authorities: BTreeMap::new(),
            clock,
        }
    }

    /// Create an empty registry from configuration.
    ///
    /// Fails with [`RegistryError::Config`] when no owner is configured.
    pub fn from_config(config: &RegistryConfig) -> RegistryResult<Self> {
        Ok(Self::new(config.require_owner()?))
    }

    /// The registry owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Look up an authority.
    pub fn get(&self, id: &str) -> Option<&AuthorityRecord> {
        self.authorities.get(id)
    }

    /// Whether `id` is registered and `active`.
    ///
    /// Unknown ids and registered-but-inactive ids both return `false`; use
    /// [`contains`](Self::contains) to tell them apart.
    pub fn is_active(&self, id: &str) -> bool {
        self.get(id).is_some_and(AuthorityRecord::is_active)
    }

    /// Whether `id` has been registered, regardless of status.
    pub fn contains(&self, id: &str) -> bool {
        self.authorities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }

    /// Records in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorityRecord)> {
        self.authorities.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// Number of records per status. Statuses with no records are omitted.
    pub fn count_by_status(&self) -> BTreeMap<AuthorityStatus, usize> {
        let mut counts = BTreeMap::new();
        for record in self.authorities.values() {
            *counts.entry(record.status).or_insert(0) += 1;
        }
        counts
    }

    /// Register a new authority in `pending` status.
    pub fn register(
        &mut self,
        caller: &str,
        id: &str,
        name: &str,
        website: &str,
    ) -> RegistryResult<()> {
        self.authorize(caller)?;

        if self.authorities.contains_key(id) {
            debug!(authority_id = id, "rejected duplicate registration");
            return Err(RegistryError::AlreadyRegistered { id: id.to_string() });
        }

        let record = AuthorityRecord::new(name, website, self.clock.now());
        self.authorities.insert(id.to_string(), record);

        info!(authority_id = id, authority_name = name, "registered authority");
        Ok(())
    }

    /// Move an authority to `new_status`.
    ///
    /// `pending` is not a valid target. Any other transition is allowed,
    /// including out of `revoked`.
    pub fn update_status(
        &mut self,
        caller: &str,
        id: &str,
        new_status: AuthorityStatus,
    ) -> RegistryResult<()> {
        self.transition(caller, id, || Ok(new_status))
    }

    /// Like [`update_status`](Self::update_status) for an unparsed status.
    ///
    /// The string is parsed after the caller is authorized, so unauthorized
    /// callers always see `Unauthorized`.
    pub fn update_status_str(
        &mut self,
        caller: &str,
        id: &str,
        new_status: &str,
    ) -> RegistryResult<()> {
        self.transition(caller, id, || new_status.parse())
    }

    fn transition(
        &mut self,
        caller: &str,
        id: &str,
        new_status: impl FnOnce() -> RegistryResult<AuthorityStatus>,
    ) -> RegistryResult<()> {
        self.authorize(caller)?;

        let new_status = new_status()?;
        if !new_status.is_transition_target() {
            debug!(authority_id = id, status = %new_status, "rejected status");
            return Err(RegistryError::InvalidStatus {
                status: new_status.to_string(),
            });
        }

        let now = self.clock.now();
        let record = self
            .authorities
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound { id: id.to_string() })?;

        let previous = record.status;
        record.status = new_status;
        // A clock that moved backwards must not put last_updated before registration.
        record.last_updated = now.max(record.registration_date);

        info!(
            authority_id = id,
            from = %previous,
            to = %new_status,
            "updated authority status"
        );
        Ok(())
    }

    fn authorize(&self, caller: &str) -> RegistryResult<()> {
        if caller != self.owner {
            warn!(caller, "unauthorized registry mutation");
            return Err(RegistryError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }
}
