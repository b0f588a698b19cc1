use clap::Parser;

use fairshare::common::cli::{ReplayOpts, RootOptions, SubCommand, UsersOpts};
use fairshare::common::setup::setup_logging;
use fairshare::config::ClusterConfig;
use fairshare::replay::Replay;
use fairshare::replay::output::{OutputMode, print_report, print_users};
use fairshare::replay::trace::Trace;

// Commands

fn command_users(opts: UsersOpts, mode: OutputMode) -> anyhow::Result<()> {
    let config = ClusterConfig::load(&opts.partition.config)?;
    let partition = config.partition(opts.partition.partition.as_deref())?;
    print_users(&partition.users(), mode)?;
    Ok(())
}

fn command_replay(opts: ReplayOpts, mode: OutputMode) -> anyhow::Result<()> {
    let config = ClusterConfig::load(&opts.partition.config)?;
    let partition = config.partition(opts.partition.partition.as_deref())?;
    let trace = Trace::load(&opts.trace)?;
    log::info!("Replaying {} event(s)", trace.events.len());

    let mut replay = Replay::new(partition);
    replay.run(&trace)?;
    print_report(&replay.finish(), mode)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let top_opts = RootOptions::parse();
    setup_logging(top_opts.common.verbose);

    let mode = top_opts.common.output_mode;
    match top_opts.subcmd {
        SubCommand::Users(opts) => command_users(opts, mode),
        SubCommand::Replay(opts) => command_replay(opts, mode),
    }
}
