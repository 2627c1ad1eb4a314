//! CLI definition using clap: the full command tree with flags, defaults,
//! required-flag constraints, and usage examples. Pure construction; all
//! runtime behavior lives in the command modules.

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "nimbus")]
#[command(version)]
#[command(about = "Command-line client for the Nimbus Cloud management APIs")]
#[command(arg_required_else_help = true)]
#[command(after_help = r#"Examples:

  List servers in your project:
    nimbus server list --project-id xxx

  List backup schedules for a server, as JSON:
    nimbus backup schedule list --server-id xxx --output-format json

  Trigger an OS update without the confirmation prompt:
    nimbus update create --server-id xxx --maintenance-window 13 -y

  Store a default project ID:
    nimbus config set --default-project-id xxx
"#)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project ID
    #[arg(long, global = true, env = "NIMBUS_PROJECT_ID", value_name = "UUID")]
    pub project_id: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub output_format: OutputFormat,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub assume_yes: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute servers
    Server(ServerCommand),

    /// Server backups
    Backup(BackupCommand),

    /// Server OS updates
    Update(UpdateCommand),

    /// Database instances
    Database(DatabaseCommand),

    /// Local CLI configuration
    Config(ConfigCommand),
}

// ---- server ----

#[derive(Args)]
pub struct ServerCommand {
    #[command(subcommand)]
    pub action: ServerAction,
}

#[derive(Subcommand)]
pub enum ServerAction {
    /// List all servers in the project
    #[command(after_help = "Examples:
  nimbus server list --project-id xxx
  nimbus server list --limit 10 --output-format yaml")]
    List(ServerListArgs),

    /// Show details of a server
    #[command(after_help = "Examples:
  nimbus server describe --server-id xxx")]
    Describe(ServerDescribeArgs),
}

#[derive(Args, Debug)]
pub struct ServerListArgs {
    /// Maximum number of entries to list
    #[arg(long)]
    pub limit: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ServerDescribeArgs {
    /// Server ID
    #[arg(short = 's', long, value_name = "UUID")]
    pub server_id: String,
}

// ---- backup ----

#[derive(Args)]
pub struct BackupCommand {
    #[command(subcommand)]
    pub action: BackupAction,
}

#[derive(Subcommand)]
pub enum BackupAction {
    /// Backup schedules of a server
    Schedule(ScheduleCommand),
}

#[derive(Args)]
pub struct ScheduleCommand {
    #[command(subcommand)]
    pub action: ScheduleAction,
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// List all backup schedules of a server
    #[command(after_help = "Examples:
  nimbus backup schedule list --server-id xxx
  nimbus backup schedule list --server-id xxx --output-format json")]
    List(ScheduleListArgs),

    /// Show details of a backup schedule
    #[command(after_help = "Examples:
  nimbus backup schedule describe --server-id xxx --schedule-id 5")]
    Describe(ScheduleDescribeArgs),

    /// Delete a backup schedule
    #[command(after_help = "Examples:
  nimbus backup schedule delete --server-id xxx --schedule-id 5")]
    Delete(ScheduleDeleteArgs),
}

#[derive(Args, Debug)]
pub struct ScheduleListArgs {
    /// Server ID
    #[arg(short = 's', long, value_name = "UUID")]
    pub server_id: String,

    /// Maximum number of entries to list
    #[arg(long)]
    pub limit: Option<i64>,
}

#[derive(Args, Debug)]
pub struct ScheduleDescribeArgs {
    /// Server ID
    #[arg(short = 's', long, value_name = "UUID")]
    pub server_id: String,

    /// Backup schedule ID
    #[arg(long)]
    pub schedule_id: String,
}

#[derive(Args, Debug)]
pub struct ScheduleDeleteArgs {
    /// Server ID
    #[arg(short = 's', long, value_name = "UUID")]
    pub server_id: String,

    /// Backup schedule ID
    #[arg(long)]
    pub schedule_id: String,
}

// ---- update ----

#[derive(Args)]
pub struct UpdateCommand {
    #[command(subcommand)]
    pub action: UpdateAction,
}

#[derive(Subcommand)]
pub enum UpdateAction {
    /// Trigger an OS update for a server (always asynchronous)
    #[command(after_help = "Examples:
  nimbus update create --server-id xxx
  nimbus update create --server-id xxx --maintenance-window 13")]
    Create(UpdateCreateArgs),

    /// List OS updates of a server
    #[command(after_help = "Examples:
  nimbus update list --server-id xxx --limit 5")]
    List(UpdateListArgs),
}

#[derive(Args, Debug)]
pub struct UpdateCreateArgs {
    /// Server ID
    #[arg(short = 's', long, value_name = "UUID")]
    pub server_id: String,

    /// Maintenance window (in hours, 1-24)
    #[arg(short = 'm', long, default_value_t = 1)]
    pub maintenance_window: i64,
}

#[derive(Args, Debug)]
pub struct UpdateListArgs {
    /// Server ID
    #[arg(short = 's', long, value_name = "UUID")]
    pub server_id: String,

    /// Maximum number of entries to list
    #[arg(long)]
    pub limit: Option<i64>,
}

// ---- database ----

#[derive(Args)]
pub struct DatabaseCommand {
    #[command(subcommand)]
    pub action: DatabaseAction,
}

#[derive(Subcommand)]
pub enum DatabaseAction {
    /// Credentials of a database instance
    Credentials(CredentialsCommand),
}

#[derive(Args)]
pub struct CredentialsCommand {
    #[command(subcommand)]
    pub action: CredentialsAction,
}

#[derive(Subcommand)]
pub enum CredentialsAction {
    /// List all credentials of an instance
    #[command(after_help = "Examples:
  nimbus database credentials list --instance-id xxx")]
    List(CredentialsListArgs),

    /// Create credentials for an instance
    #[command(after_help = "Examples:
  nimbus database credentials create --instance-id xxx")]
    Create(CredentialsCreateArgs),

    /// Show details of credentials
    #[command(after_help = "Examples:
  nimbus database credentials describe --instance-id xxx --credentials-id yyy")]
    Describe(CredentialsDescribeArgs),

    /// Delete credentials
    #[command(after_help = "Examples:
  nimbus database credentials delete --instance-id xxx --credentials-id yyy")]
    Delete(CredentialsDeleteArgs),
}

#[derive(Args, Debug)]
pub struct CredentialsListArgs {
    /// Instance ID
    #[arg(short = 'i', long, value_name = "UUID")]
    pub instance_id: String,

    /// Maximum number of entries to list
    #[arg(long)]
    pub limit: Option<i64>,
}

#[derive(Args, Debug)]
pub struct CredentialsCreateArgs {
    /// Instance ID
    #[arg(short = 'i', long, value_name = "UUID")]
    pub instance_id: String,
}

#[derive(Args, Debug)]
pub struct CredentialsDescribeArgs {
    /// Instance ID
    #[arg(short = 'i', long, value_name = "UUID")]
    pub instance_id: String,

    /// Credentials ID
    #[arg(long, value_name = "UUID")]
    pub credentials_id: String,
}

#[derive(Args, Debug)]
pub struct CredentialsDeleteArgs {
    /// Instance ID
    #[arg(short = 'i', long, value_name = "UUID")]
    pub instance_id: String,

    /// Credentials ID
    #[arg(long, value_name = "UUID")]
    pub credentials_id: String,
}

// ---- config ----

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Store default values in the config file
    #[command(after_help = "Examples:
  nimbus config set --default-project-id xxx
  nimbus config set --base-url https://api.nimbus-cloud.dev")]
    Set(ConfigSetArgs),

    /// Show the stored configuration
    #[command(after_help = "Examples:
  nimbus config show
  nimbus config show --output-format json")]
    Show,
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Default project ID
    #[arg(long, value_name = "UUID")]
    pub default_project_id: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}
