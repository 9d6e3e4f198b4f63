//! `authority register` / `authority set-status`.
//!
//! Both run under the state lock and save only if the operation was
//! accepted.

use anyhow::Result;

use crate::cli::args::{RegisterArgs, SetStatusArgs};
use crate::cli::helpers::CliContext;
use crate::exit_codes::SUCCESS;

pub async fn register(ctx: &CliContext, args: RegisterArgs) -> Result<i32> {
    ctx.update(|registry| registry.register(&args.caller, &args.id, &args.name, &args.website))
        .await?;

    println!("registered {} (pending)", args.id);
    Ok(SUCCESS)
}

pub async fn set_status(ctx: &CliContext, args: SetStatusArgs) -> Result<i32> {
    ctx.update(|registry| registry.update_status_str(&args.caller, &args.id, &args.status))
        .await?;

    println!("{} -> {}", args.id, args.status);
    Ok(SUCCESS)
}
