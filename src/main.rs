//! # DualSense UHID
//!
//! Create a virtual PS5 DualSense controller and keep it alive until Ctrl+C.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Set up logging with tracing subscriber
//!    - Load configuration from the path given as first argument, or defaults
//!    - Create the virtual controller through `/dev/uhid`
//!
//! 2. **Running**
//!    - Publish a neutral input report
//!    - Log the device nodes the kernel created
//!    - Log rumble and lightbar commands sent by the host
//!
//! 3. **Graceful Shutdown**
//!    - Stop the kernel event worker and destroy the device
//!
//! # Examples
//!
//! ```bash
//! RUST_LOG=debug dualsense-uhid config/default.toml
//! ```

use anyhow::{Context, Result};
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use dualsense_uhid::config::Config;
use dualsense_uhid::dualsense::protocol::BatteryState;
use dualsense_uhid::joypad::{ButtonFlags, DualSenseJoypad};

/// Time for the kernel to bind the driver and create input nodes
const NODE_SETTLE_DELAY_MS: u64 = 500;

#[tokio::main]
async fn main() -> Result<()> {
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .init();

    info!("DualSense UHID v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    debug!("Configuration: {:?}", config);

    let definition = config.device_definition()?;
    let joypad = DualSenseJoypad::create(&definition, &config.joypad_options())
        .context("Failed to create virtual DualSense")?;
    info!("Virtual controller MAC address: {}", joypad.mac_address());

    joypad.set_on_rumble(|left, right| info!("Rumble: left={} right={}", left, right));
    joypad.set_on_led(|r, g, b| info!("Lightbar: #{:02x}{:02x}{:02x}", r, g, b));

    joypad.set_battery(BatteryState::Full, 100);
    joypad.set_pressed_buttons(ButtonFlags::empty());

    sleep(Duration::from_millis(NODE_SETTLE_DELAY_MS)).await;
    let nodes = joypad.nodes();
    if nodes.is_empty() {
        info!("No input nodes found yet (is hid-playstation loaded?)");
    }
    for node in &nodes {
        info!("Input node: {}", node.display());
    }

    info!("Press Ctrl+C to exit");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Shutting down...");
    drop(joypad);
    info!("Virtual controller destroyed");

    Ok(())
}
