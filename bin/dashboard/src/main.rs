//! Operator Dashboard Binary
//!
//! Serves the dashboard on BIND_ADDR (e.g. 0.0.0.0:5000) against the
//! store at DB_URL. The chat-platform end of the bridge ships with the
//! Offline adapter; a deployment with a connected guild swaps in its own
//! [`ghl_bridge::Platform`] implementation here.

#[tokio::main]
async fn main() {
    ghl_core::log();
    let (bridge, platform) = ghl_bridge::BridgeHandle::pair();
    let channel = std::env::var("COMMAND_CHANNEL").unwrap_or_else(|_| "general".to_string());
    tokio::spawn(ghl_bridge::serve(platform, ghl_bridge::Offline, channel));
    ghl_server::run(bridge).await.unwrap();
}
