use super::RoleMapping;
use ghl_bridge::MemberSnapshot;
use ghl_core::MemberId;
use ghl_core::RoleId;
use serde::Serialize;

/// One mirrored guild member in the identity store.
///
/// Exactly one row exists per member currently present in the guild;
/// members who leave are deleted by a full-sync pass, not archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    member_id: MemberId,
    username: String,
    server_nickname: String,
    role: Option<String>,
    owner: bool,
}

impl Member {
    pub fn new(
        member_id: MemberId,
        username: String,
        server_nickname: String,
        role: Option<String>,
        owner: bool,
    ) -> Self {
        Self {
            member_id,
            username,
            server_nickname,
            role,
            owner,
        }
    }

    /// Projects a platform snapshot onto an identity store row.
    ///
    /// Display name falls back to the handle when no nickname is set.
    /// When a member holds several mapped roles, the last match in the
    /// platform's native role order wins; this is documented last-write-
    /// wins behavior, not a priority system.
    pub fn project(snapshot: &MemberSnapshot, owner_role: RoleId, mapping: &RoleMapping) -> Self {
        Self {
            member_id: snapshot.member_id,
            username: snapshot.handle.clone(),
            server_nickname: snapshot
                .nickname
                .clone()
                .unwrap_or_else(|| snapshot.handle.clone()),
            role: mapping.resolve(&snapshot.role_ids),
            owner: snapshot.role_ids.contains(&owner_role),
        }
    }
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn server_nickname(&self) -> &str {
        &self.server_nickname
    }
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }
    pub fn owner(&self) -> bool {
        self.owner
    }
}

mod schema {
    use super::*;
    use ghl_pg::*;

    impl Schema for Member {
        fn name() -> &'static str {
            MEMBERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                MEMBERS,
                " (
                    member_id        BIGINT PRIMARY KEY,
                    username         TEXT NOT NULL,
                    server_nickname  TEXT NOT NULL,
                    role             TEXT,
                    owner            BOOLEAN NOT NULL DEFAULT FALSE
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_members_role ON ",
                MEMBERS,
                " (role);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(nickname: Option<&str>, role_ids: Vec<RoleId>) -> MemberSnapshot {
        MemberSnapshot {
            member_id: 1,
            handle: "bob".to_string(),
            nickname: nickname.map(|n| n.to_string()),
            bot: false,
            role_ids,
        }
    }

    fn mapping() -> RoleMapping {
        let mut mapping = RoleMapping::default();
        mapping.adopt(10, "Family-Knights");
        mapping.adopt(20, "Family-Squires");
        mapping
    }

    #[test]
    fn bare_member_projects_with_handle_fallback() {
        let member = Member::project(&snapshot(None, vec![10]), 99, &mapping());
        assert!(member.username() == "bob");
        assert!(member.server_nickname() == "bob");
        assert!(member.role() == Some("Family-Knights"));
        assert!(member.owner() == false);
    }

    #[test]
    fn nickname_overrides_handle() {
        let member = Member::project(&snapshot(Some("bobby"), vec![]), 99, &mapping());
        assert!(member.server_nickname() == "bobby");
        assert!(member.role() == None);
    }

    #[test]
    fn owner_flag_follows_owner_role() {
        let member = Member::project(&snapshot(None, vec![99]), 99, &mapping());
        assert!(member.owner() == true);
        assert!(member.role() == None);
    }

    #[test]
    fn last_mapped_role_wins() {
        let member = Member::project(&snapshot(None, vec![10, 7, 20]), 99, &mapping());
        assert!(member.role() == Some("Family-Squires"));
    }
}
