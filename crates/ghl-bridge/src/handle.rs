use super::ChannelView;
use super::Snapshot;
use ghl_core::BRIDGE_TIMEOUT;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;

/// Work scheduled from the web layer onto the platform side.
pub enum BridgeRequest {
    /// Full roster + role catalogue for a reconciliation pass.
    Roster {
        reply: oneshot::Sender<anyhow::Result<Snapshot>>,
    },
    /// Recent message history for every text channel.
    Channels {
        reply: oneshot::Sender<anyhow::Result<Vec<ChannelView>>>,
    },
    /// Fire-and-forget message relay into a named channel.
    Send { channel: String, text: String },
    /// Fire-and-forget operator command relay.
    Command { text: String },
}

/// Receiving end held by the platform adapter. See [`super::serve`].
pub type BridgeReceiver = UnboundedReceiver<BridgeRequest>;

/// The reason a bridge operation did not reach the platform: the platform
/// end is unattached, dropped the request, or missed the reply deadline.
/// Deliberately opaque so callers surface one structured message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeErr {
    Unavailable,
}

impl std::fmt::Display for BridgeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "chat platform unavailable"),
        }
    }
}

impl std::error::Error for BridgeErr {}

/// Cloneable web-side endpoint of the bridge.
///
/// Request/reply operations bound their wait at
/// [`ghl_core::BRIDGE_TIMEOUT`]; relays return as soon as the request is
/// scheduled, so a caller only learns that the relay was scheduled, never
/// that the message was delivered.
#[derive(Clone)]
pub struct BridgeHandle {
    tx: UnboundedSender<BridgeRequest>,
}

impl BridgeHandle {
    /// Creates both endpoints of a bridge.
    pub fn pair() -> (Self, BridgeReceiver) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Fetches the current guild snapshot for reconciliation.
    pub async fn roster(&self) -> Result<Snapshot, BridgeErr> {
        let (reply, rx) = oneshot::channel();
        self.request(BridgeRequest::Roster { reply })?;
        self.settle(rx).await
    }

    /// Fetches the channel/message view for the dashboard.
    pub async fn channels(&self) -> Result<Vec<ChannelView>, BridgeErr> {
        let (reply, rx) = oneshot::channel();
        self.request(BridgeRequest::Channels { reply })?;
        self.settle(rx).await
    }

    /// Schedules a message send into a named channel.
    pub fn send(&self, channel: &str, text: &str) -> Result<(), BridgeErr> {
        self.request(BridgeRequest::Send {
            channel: channel.to_string(),
            text: text.to_string(),
        })
    }

    /// Schedules an operator command relay.
    pub fn command(&self, text: &str) -> Result<(), BridgeErr> {
        self.request(BridgeRequest::Command {
            text: text.to_string(),
        })
    }

    fn request(&self, req: BridgeRequest) -> Result<(), BridgeErr> {
        self.tx.send(req).map_err(|_| BridgeErr::Unavailable)
    }

    /// Awaits a reply within the bridge deadline, collapsing every failure
    /// mode to [`BridgeErr::Unavailable`] after logging the cause.
    async fn settle<T>(
        &self,
        rx: oneshot::Receiver<anyhow::Result<T>>,
    ) -> Result<T, BridgeErr> {
        match tokio::time::timeout(BRIDGE_TIMEOUT, rx).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => {
                log::warn!("[bridge] platform error: {}", e);
                Err(BridgeErr::Unavailable)
            }
            Ok(Err(_)) => {
                log::warn!("[bridge] platform dropped request");
                Err(BridgeErr::Unavailable)
            }
            Err(_) => {
                log::warn!("[bridge] reply deadline elapsed");
                Err(BridgeErr::Unavailable)
            }
        }
    }
}
