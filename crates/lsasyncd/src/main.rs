//! Link-State Advertisement Synchronization Daemon
//!
//! Main entry point for lsasyncd. Binds one sync session to the configured
//! dissemination scope, publishes this router's advertisements, and applies
//! validated remote updates to the topology database, re-deriving the RIB
//! after every change.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lsasyncd::{
    AdvertisedPrefixComputer, DaemonConfig, LsaPayload, LsrError, Result, Rib, RouteComputer,
    SyncUpdateDispatcher,
};
use lsr_sync_common::{
    AcceptAllValidator, InMemorySequencer, LoopbackTransport, Sequencer, StaticKeyManager,
    SyncTransport,
};
use lsr_types::{UpdateCategory, UpdateName, KEY_MARKER};

#[derive(Debug, Parser)]
#[command(name = "lsasyncd", about = "Link-state advertisement sync daemon")]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(short, long)]
    config: PathBuf,
}

// The dispatcher and all of its callbacks run on one cooperative loop.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Args::parse();
    info!("lsasyncd: Starting link-state sync daemon");

    match run_daemon(&args).await {
        Ok(()) => {
            info!("lsasyncd: Daemon exiting normally");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "lsasyncd: Daemon exiting with error");
            Err(e.into())
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .init();
}

async fn run_daemon(args: &Args) -> Result<()> {
    let config = DaemonConfig::from_file(&args.config)?;
    info!(router = %config.router_name, scope = %config.scope_prefix, "Loaded configuration");

    // Standalone wiring: loopback transport and an accept-all validator.
    // A network transport and a real trust engine plug in through the same
    // traits.
    let transport = LoopbackTransport::new();
    let validator = Arc::new(AcceptAllValidator);
    let sequencer = InMemorySequencer::new();
    let keys = StaticKeyManager::new(
        config
            .router_name
            .as_name()
            .clone()
            .append(KEY_MARKER)
            .append("ksk-1"),
    );

    let mut dispatcher = SyncUpdateDispatcher::new(
        config.router_name.clone(),
        config.scope_prefix.clone(),
        validator,
    );

    // Session construction failure is fatal: the daemon cannot route
    // without dissemination.
    let mut notifications = dispatcher.create_session(&transport)?;

    announce_local_state(&dispatcher, &transport, &sequencer, &keys, &config).await?;

    let route_computer = AdvertisedPrefixComputer;
    let mut rib = Rib::new();

    info!("lsasyncd: Listening for sync notifications...");
    loop {
        tokio::select! {
            maybe_msg = notifications.recv() => {
                let Some(msg) = maybe_msg else {
                    return Err(LsrError::Config(
                        "notification stream closed by transport".to_string(),
                    ));
                };
                let outcome = dispatcher.handle_message(msg).await;
                if outcome.topology_changed() {
                    rib.rebuild(route_computer.compute(dispatcher.topology()));
                    rib.write_log();
                }
            }
            _ = signal::ctrl_c() => {
                info!("lsasyncd: Received shutdown signal");
                break;
            }
        }
    }

    Ok(())
}

/// Stages and publishes this router's identity, key, and routing state.
async fn announce_local_state(
    dispatcher: &SyncUpdateDispatcher,
    transport: &LoopbackTransport,
    sequencer: &InMemorySequencer,
    keys: &StaticKeyManager,
    config: &DaemonConfig,
) -> Result<()> {
    let identity_name = UpdateName::identity(config.router_name.as_name());
    sequencer.increment(UpdateCategory::Identity);
    dispatcher
        .publish_identity_update(sequencer, config.router_name.as_name())
        .await?;
    info!(name = %identity_name, "Announced identity");

    keys.bump();
    dispatcher.publish_key_update(keys).await?;

    if !config.advertised_prefixes.is_empty() {
        let mut lsa = LsaPayload::new(config.router_name.clone());
        lsa.reachable = config.advertised_prefixes.clone();

        let seq_no = sequencer.increment(UpdateCategory::Routing);
        for adv in &config.advertised_prefixes {
            let name = UpdateName::routing(&config.router_name, &adv.destination);
            transport.insert_content(name, seq_no, lsa.to_bytes()?);
        }
        for adv in &config.advertised_prefixes {
            dispatcher
                .publish_routing_update(sequencer, &adv.destination)
                .await?;
        }
        info!(
            prefixes = config.advertised_prefixes.len(),
            seq_no, "Published routing advertisement"
        );
    }

    Ok(())
}
