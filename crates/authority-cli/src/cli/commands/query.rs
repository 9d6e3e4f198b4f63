//! Read-only commands: `owner`, `show`, `is-active`, `list`.

use anyhow::Result;
use authority_registry::{AuthorityRecord, AuthorityStatus, RegistryError};
use chrono::SecondsFormat;
use serde::Serialize;

use crate::cli::args::{IsActiveArgs, ListArgs, ShowArgs};
use crate::cli::helpers::CliContext;
use crate::exit_codes::{NOT_ACTIVE, SUCCESS};

/// JSON output shape: the record plus its id.
#[derive(Serialize)]
struct AuthorityView<'a> {
    id: &'a str,
    #[serde(flatten)]
    record: &'a AuthorityRecord,
}

pub async fn owner(ctx: &CliContext) -> Result<i32> {
    let registry = ctx.load().await?;
    println!("{}", registry.owner());
    Ok(SUCCESS)
}

pub async fn show(ctx: &CliContext, args: ShowArgs) -> Result<i32> {
    let registry = ctx.load().await?;
    let record = registry
        .get(&args.id)
        .ok_or_else(|| RegistryError::NotFound {
            id: args.id.clone(),
        })?;

    if args.json {
        let view = AuthorityView {
            id: &args.id,
            record,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("id:          {}", args.id);
        println!("name:        {}", record.name);
        println!("website:     {}", record.website);
        println!("status:      {}", record.status);
        println!(
            "registered:  {}",
            record
                .registration_date
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        println!(
            "updated:     {}",
            record.last_updated.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }
    Ok(SUCCESS)
}

pub async fn is_active(ctx: &CliContext, args: IsActiveArgs) -> Result<i32> {
    let registry = ctx.load().await?;
    let active = registry.is_active(&args.id);
    println!("{active}");
    Ok(if active { SUCCESS } else { NOT_ACTIVE })
}

pub async fn list(ctx: &CliContext, args: ListArgs) -> Result<i32> {
    let registry = ctx.load().await?;
    let filter = args
        .status
        .as_deref()
        .map(str::parse::<AuthorityStatus>)
        .transpose()?;

    let views: Vec<AuthorityView<'_>> = registry
        .iter()
        .filter(|(_, record)| filter.map_or(true, |status| record.status == status))
        .map(|(id, record)| AuthorityView { id, record })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else {
        for view in &views {
            println!(
                "{}\t{}\t{}\t{}",
                view.id, view.record.status, view.record.name, view.record.website
            );
        }
    }
    Ok(SUCCESS)
}
