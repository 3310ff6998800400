use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{run_bridge, Bridge, Variant};
use crossbeam_channel::{bounded, unbounded};
use serde::Serialize;
use shared::protocol::HostCommand;
use state_store::{LoginState, StateStore};
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use config::load_settings;

/// Replays host messages and user intents through the login bridge and
/// prints the resulting state and the commands posted to the host.
#[derive(Parser, Debug)]
struct Args {
    /// JSON-lines script; stdin when omitted.
    script: Option<PathBuf>,
    #[arg(long, default_value = "replay.toml")]
    config: PathBuf,
    #[arg(long)]
    variant: Option<Variant>,
    #[arg(long)]
    preserve_idc_info_on_reset: Option<bool>,
    #[arg(long)]
    honor_cancellable_flag: Option<bool>,
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    state: LoginState,
    commands: Vec<HostCommand>,
    handled: usize,
    dropped: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(v) = args.variant {
        settings.variant = v;
    }
    if let Some(v) = args.preserve_idc_info_on_reset {
        settings.preserve_idc_info_on_reset = Some(v);
    }
    if let Some(v) = args.honor_cancellable_flag {
        settings.honor_cancellable_flag = Some(v);
    }
    if let Some(v) = args.log_level {
        settings.log_level = v;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .with_context(|| format!("invalid log level '{}'", settings.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let text = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read script from stdin")?;
            buf
        }
    };
    let inputs = script::parse_script(&text)?;

    let options = settings.bridge_options();
    tracing::info!(
        variant = %settings.variant,
        preserve_idc_info_on_reset = options.preserve_idc_info_on_reset,
        honor_cancellable_flag = options.honor_cancellable_flag,
        inputs = inputs.len(),
        "starting replay"
    );

    let (cmd_tx, cmd_rx) = bounded::<HostCommand>(settings.command_queue_capacity);
    let store = StateStore::for_feature(settings.variant.feature());
    let bridge = Bridge::new(store, cmd_tx, options);

    let (input_tx, input_rx) = unbounded();
    for input in inputs {
        input_tx
            .send(input)
            .map_err(|_| anyhow!("bridge input channel closed"))?;
    }
    drop(input_tx);

    let stats = run_bridge(&bridge, input_rx);
    let (store, _host) = bridge.into_parts();

    let report = Report {
        state: store.snapshot(),
        commands: cmd_rx.try_iter().collect(),
        handled: stats.handled,
        dropped: stats.dropped,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
