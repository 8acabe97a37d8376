//! Core type aliases, constants, and runtime utilities for guildhall.
//!
//! This crate provides the foundational types and policy parameters
//! used throughout the guildhall workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Stable member identifier assigned by the chat platform.
pub type MemberId = i64;
/// Role identifier assigned by the chat platform.
pub type RoleId = i64;
/// Text channel identifier assigned by the chat platform.
pub type ChannelId = i64;

// ============================================================================
// AUTHENTICATION GATE
// Sliding lockout: the window is measured from the most recent failure,
// so each failure past the threshold restarts the clock.
// ============================================================================
/// Consecutive failures before a username is locked out.
pub const LOCKOUT_ATTEMPTS: i32 = 5;
/// How long a locked username stays locked after its latest failure.
pub const LOCKOUT_WINDOW: std::time::Duration = std::time::Duration::from_secs(300);
/// Characters in a human-verification challenge.
pub const CHALLENGE_LENGTH: usize = 6;
/// Characters in a session token handed to the browser.
pub const TOKEN_LENGTH: usize = 32;

// ============================================================================
// CHAT PLATFORM BRIDGE
// ============================================================================
/// Ceiling on any synchronous wait for the platform side of the bridge.
pub const BRIDGE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
/// Most recent messages fetched per text channel.
pub const HISTORY_LIMIT: usize = 10;

// ============================================================================
// RECONCILIATION
// ============================================================================
/// Interval between passive upsert-only sync passes.
pub const SYNC_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
