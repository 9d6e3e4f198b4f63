use authority_registry::RegistryError;

use super::args::*;
use super::helpers::CliContext;

pub mod init;
pub mod mutate;
pub mod query;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let ctx = CliContext::resolve(cli.state, cli.config.as_deref())?;
    let result = match cli.cmd {
        Command::Init(args) => init::run(&ctx, args).await,
        Command::Owner => query::owner(&ctx).await,
        Command::Register(args) => mutate::register(&ctx, args).await,
        Command::SetStatus(args) => mutate::set_status(&ctx, args).await,
        Command::Show(args) => query::show(&ctx, args).await,
        Command::IsActive(args) => query::is_active(&ctx, args).await,
        Command::List(args) => query::list(&ctx, args).await,
    };

    match result {
        Err(e) => match e.downcast_ref::<RegistryError>() {
            Some(err) if err.is_rejection() => {
                eprintln!("error: {err}");
                Ok(err.exit_code())
            }
            _ => Err(e),
        },
        ok => ok,
    }
}
