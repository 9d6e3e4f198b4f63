//! `authority init` - create an empty registry.

use anyhow::{Context, Result};
use authority_registry::AuthorityRegistry;

use crate::cli::args::InitArgs;
use crate::cli::helpers::CliContext;
use crate::exit_codes::SUCCESS;

pub async fn run(ctx: &CliContext, args: InitArgs) -> Result<i32> {
    let config = match args.owner {
        Some(owner) => ctx.config.clone().with_owner(owner),
        None => ctx.config.clone(),
    };
    let registry = AuthorityRegistry::from_config(&config)
        .context("an owner is required to create a registry")?;

    let path = ctx.state_path();
    let _lock = ctx.lock().await?;
    if path.exists() && !args.force {
        anyhow::bail!(
            "registry already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    ctx.save(&registry).await?;
    println!(
        "initialized registry at {} (owner: {})",
        path.display(),
        registry.owner()
    );
    Ok(SUCCESS)
}
