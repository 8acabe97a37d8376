//! Channel bridge between the web layer and the chat platform.
//!
//! The web surface and the chat-platform client run as separate execution
//! contexts. Rather than sharing an ambient event loop handle, the web
//! side holds a [`BridgeHandle`] and the platform side drains a
//! [`BridgeReceiver`] through [`serve`]. Request/reply operations carry a
//! oneshot sender and bound their wait; relays are fire-and-forget.
//!
//! ## Contracts
//!
//! - [`Snapshot`] — guild roster plus role catalogue, for reconciliation
//! - [`ChannelView`] — per-channel recent message history
//! - [`Platform`] — the adapter the chat-side deployment implements
//!
//! ## Failure
//!
//! Every path that cannot reach the platform collapses to
//! [`BridgeErr::Unavailable`]; callers never see internal fault strings.
mod handle;
mod platform;
mod snapshot;

pub use handle::*;
pub use platform::*;
pub use snapshot::*;
