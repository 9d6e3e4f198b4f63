use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use authority_registry::{
    AuthorityRegistry, RegistryConfig, RegistryResult, RegistrySnapshot, SystemClock,
};
use tracing::debug;

use super::lock::{self, StateLock};

/// Resolved configuration for one invocation.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: RegistryConfig,
}

impl CliContext {
    /// `--config` file (or the environment), then `--state` on top.
    pub fn resolve(state: Option<PathBuf>, config: Option<&Path>) -> Result<Self> {
        let mut resolved = match config {
            Some(path) => RegistryConfig::from_yaml_file(path)
                .with_context(|| format!("failed to load config: {}", path.display()))?,
            None => RegistryConfig::from_env(),
        };
        if let Some(state) = state {
            resolved.state_path = state;
        }
        Ok(Self { config: resolved })
    }

    pub fn state_path(&self) -> &Path {
        &self.config.state_path
    }

    pub async fn load(&self) -> Result<AuthorityRegistry> {
        let path = self.state_path();
        if !path.exists() {
            anyhow::bail!(
                "no registry at {} (run `authority init --owner <id>` first)",
                path.display()
            );
        }
        let snapshot = RegistrySnapshot::load(path).await?;
        debug!(path = %path.display(), authorities = snapshot.authorities.len(), "loaded registry");
        Ok(AuthorityRegistry::from_snapshot(
            snapshot,
            Arc::new(SystemClock),
        )?)
    }

    pub async fn save(&self, registry: &AuthorityRegistry) -> Result<()> {
        registry.snapshot().save(self.state_path()).await?;
        Ok(())
    }

    /// Exclusive lock on the state file; hold it across load and save.
    pub async fn lock(&self) -> Result<StateLock> {
        lock::acquire(self.state_path()).await
    }

    /// Load, apply `op` and save, all under the state lock.
    ///
    /// Nothing is written when `op` is rejected.
    pub async fn update<F>(&self, op: F) -> Result<AuthorityRegistry>
    where
        F: FnOnce(&mut AuthorityRegistry) -> RegistryResult<()>,
    {
        let _lock = self.lock().await?;
        let mut registry = self.load().await?;
        op(&mut registry)?;
        self.save(&registry).await?;
        Ok(registry)
    }
}
