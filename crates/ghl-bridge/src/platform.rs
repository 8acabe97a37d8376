use super::BridgeReceiver;
use super::BridgeRequest;
use super::ChannelView;
use super::Snapshot;

/// Adapter contract implemented by the chat-platform deployment.
///
/// The adapter owns all platform specifics, including which guild it
/// serves (an explicit configuration value, typically `GUILD_ID`).
#[allow(async_fn_in_trait)]
pub trait Platform {
    /// Current guild roster and role catalogue.
    async fn roster(&self) -> anyhow::Result<Snapshot>;
    /// Every text channel with its recent history, oldest messages first.
    async fn channels(&self) -> anyhow::Result<Vec<ChannelView>>;
    /// Posts a message into a named channel.
    async fn send(&self, channel: &str, text: &str) -> anyhow::Result<()>;
}

/// Drains bridge requests into a platform adapter until the web side
/// drops its handle. Relay failures are logged and swallowed; the owning
/// task never unwinds on a platform fault.
///
/// Operator commands are relayed as `!<command>` into `command_channel`.
pub async fn serve<P: Platform>(mut rx: BridgeReceiver, platform: P, command_channel: String) {
    log::info!("[bridge] platform adapter attached");
    while let Some(request) = rx.recv().await {
        match request {
            BridgeRequest::Roster { reply } => {
                let _ = reply.send(platform.roster().await);
            }
            BridgeRequest::Channels { reply } => {
                let _ = reply.send(platform.channels().await);
            }
            BridgeRequest::Send { channel, text } => {
                if let Err(e) = platform.send(&channel, &text).await {
                    log::warn!("[bridge] relay to #{} failed: {}", channel, e);
                }
            }
            BridgeRequest::Command { text } => {
                let ref text = format!("!{}", text);
                if let Err(e) = platform.send(&command_channel, text).await {
                    log::warn!("[bridge] command relay failed: {}", e);
                }
            }
        }
    }
    log::info!("[bridge] web side closed, platform adapter stopping");
}

/// Null adapter for deployments without an attached chat client.
/// Every operation fails fast, which the web side surfaces as
/// [`super::BridgeErr::Unavailable`] rather than a timeout.
pub struct Offline;

impl Platform for Offline {
    async fn roster(&self) -> anyhow::Result<Snapshot> {
        Err(anyhow::anyhow!("no guild attached"))
    }
    async fn channels(&self) -> anyhow::Result<Vec<ChannelView>> {
        Err(anyhow::anyhow!("no guild attached"))
    }
    async fn send(&self, _: &str, _: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("no guild attached"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BridgeErr;
    use crate::BridgeHandle;
    use crate::MemberSnapshot;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct Fixed {
        snapshot: Snapshot,
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Platform for Fixed {
        async fn roster(&self) -> anyhow::Result<Snapshot> {
            Ok(self.snapshot.clone())
        }
        async fn channels(&self) -> anyhow::Result<Vec<ChannelView>> {
            Ok(vec![])
        }
        async fn send(&self, channel: &str, text: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .await
                .push((channel.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn bob() -> MemberSnapshot {
        MemberSnapshot {
            member_id: 1,
            handle: "bob".to_string(),
            nickname: None,
            bot: false,
            role_ids: vec![10],
        }
    }

    #[tokio::test]
    async fn roster_round_trips_through_adapter() {
        let (bridge, rx) = BridgeHandle::pair();
        let snapshot = Snapshot {
            members: vec![bob()],
            roles: vec![],
        };
        let platform = Fixed {
            snapshot: snapshot.clone(),
            sent: Arc::default(),
        };
        tokio::spawn(serve(rx, platform, "general".to_string()));
        assert!(bridge.roster().await == Ok(snapshot));
    }

    #[tokio::test]
    async fn command_relays_with_prefix_into_command_channel() {
        let (bridge, rx) = BridgeHandle::pair();
        let sent = Arc::new(Mutex::new(vec![]));
        let platform = Fixed {
            snapshot: Snapshot::default(),
            sent: sent.clone(),
        };
        tokio::spawn(serve(rx, platform, "general".to_string()));
        bridge.command("update_users").unwrap();
        bridge.send("lounge", "hello").unwrap();
        // settle the fire-and-forget relays behind a request/reply fence
        bridge.channels().await.unwrap();
        let sent = sent.lock().await;
        assert!(sent[0] == ("general".to_string(), "!update_users".to_string()));
        assert!(sent[1] == ("lounge".to_string(), "hello".to_string()));
    }

    #[tokio::test]
    async fn offline_adapter_fails_fast() {
        let (bridge, rx) = BridgeHandle::pair();
        tokio::spawn(serve(rx, Offline, "general".to_string()));
        assert!(bridge.roster().await == Err(BridgeErr::Unavailable));
        assert!(bridge.channels().await == Err(BridgeErr::Unavailable));
    }
}
