// Zenoh wiring: command/setting subscribers, status publisher, tick loop
// Inbound samples are drained before every tick, so commands are applied in
// arrival order and the status reflects them within one period.

use std::future::Future;
use std::sync::Arc;

use tokio::time::{interval, Interval};
use tracing::{info, warn};

use crate::base::{BaseController, SimBase};
use crate::config::{Args, TOPIC_CMD_VEL, TOPIC_SETTING, TOPIC_STATUS};
use crate::ingress::CommandIngress;
use crate::mode::ModeCell;
use crate::status::{now_nanos, StatusPublishLoop};

/// Run the bridge against the simulated base
pub async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let geometry = args.geometry()?;
    let mode = Arc::new(ModeCell::default());
    let base: Arc<dyn BaseController> = Arc::new(SimBase::new(geometry, Arc::clone(&mode)));

    run_with_base(args, base, mode).await
}

/// Run the bridge against any controller until Ctrl+C
pub async fn run_with_base(
    args: Args,
    base: Arc<dyn BaseController>,
    mode: Arc<ModeCell>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let geometry = args.geometry()?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let cmd_sub = session.declare_subscriber(TOPIC_CMD_VEL).await?;
    let setting_sub = session.declare_subscriber(TOPIC_SETTING).await?;
    let pub_status = session.declare_publisher(TOPIC_STATUS).await?;

    let ingress = CommandIngress::new(Arc::clone(&base), Arc::clone(&mode));
    let mut status_loop = StatusPublishLoop::new(base, mode, geometry);
    let mut tick = interval(args.tick_period());

    info!(
        "Bridge started: {}Hz status, l={}m, w={}m, dead band {}rad",
        args.hz,
        geometry.wheelbase(),
        geometry.track(),
        geometry.steer_tolerance()
    );
    info!("Subscribed to: {}, {}", TOPIC_CMD_VEL, TOPIC_SETTING);
    info!("Publishing to: {}", TOPIC_STATUS);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while next_tick(&mut tick, &mut ctrl_c).await {
        // 1. Drain pending settings and commands (non-blocking)
        while let Ok(Some(sample)) = setting_sub.try_recv() {
            ingress.on_setting_payload(&sample.payload().to_bytes());
        }
        while let Ok(Some(sample)) = cmd_sub.try_recv() {
            ingress.on_command_payload(&sample.payload().to_bytes());
        }

        // 2. Translate vehicle state (skipped on warm-up and failed reads)
        let Some(status) = status_loop.tick(now_nanos()) else {
            continue;
        };

        // 3. Publish status
        match serde_json::to_string(&status) {
            Ok(json) => {
                if let Err(e) = pub_status.put(json).await {
                    warn!("Failed to publish status: {}", e);
                }
            }
            Err(e) => warn!("Failed to encode status: {}", e),
        }
    }

    Ok(())
}

/// Wait for the next tick. Returns false once `shutdown` has completed, even
/// if it completed while the loop was busy between ticks.
async fn next_tick<F: Future + Unpin>(tick: &mut Interval, shutdown: &mut F) -> bool {
    tokio::select! {
        biased;
        _ = shutdown => {
            info!("Shutting down");
            false
        }
        _ = tick.tick() => true,
    }
}
