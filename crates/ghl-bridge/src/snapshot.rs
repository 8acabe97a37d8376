use ghl_core::ChannelId;
use ghl_core::MemberId;
use ghl_core::RoleId;
use serde::Deserialize;
use serde::Serialize;

/// One guild member as observed on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub member_id: MemberId,
    /// Platform-wide handle.
    pub handle: String,
    /// Per-guild display override, if the member set one.
    pub nickname: Option<String>,
    /// Automated accounts are never mirrored.
    pub bot: bool,
    /// Role memberships in the platform's native ordering.
    pub role_ids: Vec<RoleId>,
}

/// One entry of the guild's role catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDef {
    pub role_id: RoleId,
    pub name: String,
}

/// Point-in-time view of the guild used by a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub members: Vec<MemberSnapshot>,
    pub roles: Vec<RoleDef>,
}

/// One message of a channel's recent history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub author: String,
    pub content: String,
    /// RFC 3339 creation time, as reported by the platform.
    pub timestamp: String,
}

/// A text channel with its most recent messages, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelView {
    pub channel_name: String,
    pub channel_id: ChannelId,
    pub messages: Vec<MessageView>,
}
