use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use jumpcloud_core::domain::{ApplicationQuery, UserGroupState};
use jumpcloud_core::services::{ApplicationService, Paginator, UserGroupService};
use jumpcloud_infrastructure::HttpJumpCloudClient;
use jumpcloud_shared::telemetry::{init_telemetry, LogFormat};
use jumpcloud_shared::ProviderConfig;

#[derive(Parser)]
#[command(name = "jumpcloud-cli")]
#[command(about = "Manage JumpCloud user groups and look up applications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format: pretty or json
    #[arg(long, env = "JUMPCLOUD_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// User group resource operations on a JSON state file
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
    /// Application data source
    Application {
        #[command(subcommand)]
        action: ApplicationAction,
    },
}

#[derive(Subcommand)]
enum GroupAction {
    /// Create the group described by the state file
    Create {
        #[arg(long)]
        state: PathBuf,
    },
    /// Refresh the state file from JumpCloud
    Read {
        #[arg(long)]
        state: PathBuf,
    },
    /// Push name, attributes and members from the state file
    Update {
        #[arg(long)]
        state: PathBuf,
    },
    /// Delete the group and clear its id in the state file
    Delete {
        #[arg(long)]
        state: PathBuf,
    },
}

#[derive(Subcommand)]
enum ApplicationAction {
    /// Print the id of the first application matching a filter
    Lookup {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        display_label: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(cli.log_format);

    let config = match ProviderConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!("Using JumpCloud API at {}", config.v2_url());

    let api = Arc::new(HttpJumpCloudClient::new(&config)?);

    match cli.command {
        Commands::Group { action } => {
            let service = UserGroupService::from_config(api, &config);
            run_group(&service, action).await?
        }
        Commands::Application { action: ApplicationAction::Lookup { name, display_label } } => {
            let service = ApplicationService::new(api, Paginator::from_config(&config));
            let application = service.lookup(&ApplicationQuery { name, display_label }).await?;
            println!("{}", application.id);
        }
    }

    Ok(())
}

async fn run_group(
    service: &UserGroupService<HttpJumpCloudClient>,
    action: GroupAction,
) -> anyhow::Result<()> {
    let path = match &action {
        GroupAction::Create { state }
        | GroupAction::Read { state }
        | GroupAction::Update { state }
        | GroupAction::Delete { state } => state.clone(),
    };
    let mut group = load_state(&path)?;

    let result = match action {
        GroupAction::Create { .. } => service.create(&mut group).await,
        GroupAction::Read { .. } => service.read(&mut group).await,
        GroupAction::Update { .. } => service.update(&mut group).await,
        GroupAction::Delete { .. } => service.delete(&mut group).await,
    };

    // Written on failure too, so the id of a half-created group is kept.
    save_state(&path, &group)?;
    result?;

    match group.id() {
        Some(id) => info!("User group {} has {} members", id, group.members.len()),
        None => info!("User group is absent"),
    }
    Ok(())
}

fn load_state(path: &Path) -> anyhow::Result<UserGroupState> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing state file {}", path.display()))
}

fn save_state(path: &Path, state: &UserGroupState) -> anyhow::Result<()> {
    let raw = serde_json::to_string_pretty(state)?;
    fs::write(path, raw + "\n").with_context(|| format!("writing state file {}", path.display()))
}
