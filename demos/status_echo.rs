// Status monitor: prints every status record the bridge publishes
//
// Usage: cargo run --example status_echo

use limon_zenoh_bridge::config::TOPIC_STATUS;
use limon_zenoh_bridge::messages::LimonStatus;
use limon_zenoh_bridge::mode::MotionMode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let subscriber = session.declare_subscriber(TOPIC_STATUS).await?;
    info!("Listening on {}", TOPIC_STATUS);

    while let Ok(sample) = subscriber.recv_async().await {
        let payload = sample.payload().to_bytes();
        match serde_json::from_slice::<LimonStatus>(&payload) {
            Ok(status) => println!(
                "[{}] {:<24} v={:+.3} m/s  w={:+.3} rad/s  steer={:+.2}°  r={:+.3} m  batt={:.1} V  err=0x{:04X}",
                status.stamp_nanos,
                MotionMode::from_code(status.current_motion_mode).to_string(),
                status.linear_velocity,
                status.angular_velocity,
                status.steering_angle.to_degrees(),
                status.motion_radius,
                status.battery_voltage,
                status.error_code,
            ),
            Err(e) => warn!("Failed to parse status: {}", e),
        }
    }

    Ok(())
}
