use std::path::PathBuf;

use clap::Parser;

use crate::replay::output::OutputMode;

#[derive(Parser)]
#[command(author, about, version)]
pub struct RootOptions {
    #[command(flatten)]
    pub common: CommonOpts,

    #[command(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub struct CommonOpts {
    /// Enables more detailed log output
    #[arg(long, global = true, env = "FAIRSHARE_VERBOSE")]
    pub verbose: bool,

    /// How should the output be formatted
    #[arg(long, global = true, default_value = "cli", value_enum)]
    pub output_mode: OutputMode,
}

#[derive(Parser)]
pub enum SubCommand {
    /// Print users configured for a partition
    Users(UsersOpts),
    /// Replay a recorded event trace through the fairness ordering
    Replay(ReplayOpts),
}

#[derive(Parser)]
pub struct PartitionOpts {
    /// Path to the cluster configuration (TOML)
    #[arg(long)]
    pub config: PathBuf,

    /// Name of the partition; may be omitted if only one partition is configured
    #[arg(long)]
    pub partition: Option<String>,
}

#[derive(Parser)]
pub struct UsersOpts {
    #[command(flatten)]
    pub partition: PartitionOpts,
}

#[derive(Parser)]
pub struct ReplayOpts {
    #[command(flatten)]
    pub partition: PartitionOpts,

    /// Path to the event trace (TOML)
    #[arg(long)]
    pub trace: PathBuf,
}
