use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "authority",
    version,
    about = "Owner-gated registry of authorities and their lifecycle status"
)]
pub struct Cli {
    /// Registry snapshot file (default: authority-registry.json)
    #[arg(long, global = true, env = "AUTHORITY_REGISTRY_STATE")]
    pub state: Option<PathBuf>,

    /// YAML config file with `owner` and `state_path`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an empty registry owned by --owner
    Init(InitArgs),
    /// Print the registry owner
    Owner,
    /// Register a new authority (owner only)
    Register(RegisterArgs),
    /// Change an authority's status (owner only)
    SetStatus(SetStatusArgs),
    /// Show one authority
    Show(ShowArgs),
    /// Exit 0 if the authority is active, 1 otherwise
    IsActive(IsActiveArgs),
    /// List authorities
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Owner identity (falls back to config / AUTHORITY_REGISTRY_OWNER)
    #[arg(long, env = "AUTHORITY_REGISTRY_OWNER")]
    pub owner: Option<String>,

    /// Overwrite an existing state file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Identity making the call
    #[arg(long, env = "AUTHORITY_REGISTRY_CALLER")]
    pub caller: String,

    pub id: String,
    pub name: String,
    pub website: String,
}

#[derive(Args, Debug, Clone)]
pub struct SetStatusArgs {
    /// Identity making the call
    #[arg(long, env = "AUTHORITY_REGISTRY_CALLER")]
    pub caller: String,

    pub id: String,

    /// active | suspended | revoked
    pub status: String,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    pub id: String,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IsActiveArgs {
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Only authorities with this status
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_set_status_takes_raw_status() {
        let cli = Cli::try_parse_from([
            "authority",
            "--state",
            "/tmp/r.json",
            "set-status",
            "--caller",
            "root",
            "auth4",
            "archived",
        ])
        .unwrap();

        assert_eq!(cli.state, Some(PathBuf::from("/tmp/r.json")));
        match cli.cmd {
            Command::SetStatus(args) => {
                assert_eq!(args.caller, "root");
                assert_eq!(args.id, "auth4");
                assert_eq!(args.status, "archived");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_state_after_subcommand() {
        let cli =
            Cli::try_parse_from(["authority", "owner", "--state", "elsewhere.json"]).unwrap();
        assert_eq!(cli.state, Some(PathBuf::from("elsewhere.json")));
    }
}
