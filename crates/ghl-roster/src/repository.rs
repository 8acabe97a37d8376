use super::Member;
use ghl_core::MemberId;
use ghl_pg::*;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_postgres::Client;

/// Repository trait for identity store operations.
/// Abstracts SQL from the reconciliation engine.
#[allow(async_fn_in_trait)]
pub trait RosterRepository {
    async fn select(&self) -> Result<Vec<Member>, PgErr>;
    async fn ids(&self) -> Result<HashSet<MemberId>, PgErr>;
    async fn exists(&self, id: MemberId) -> Result<bool, PgErr>;
    async fn insert(&self, member: &Member) -> Result<(), PgErr>;
    async fn update(&self, member: &Member) -> Result<(), PgErr>;
    async fn delete(&self, id: MemberId) -> Result<(), PgErr>;
}

impl RosterRepository for Arc<Client> {
    async fn select(&self) -> Result<Vec<Member>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT member_id, username, server_nickname, role, owner FROM ",
                MEMBERS,
                " ORDER BY member_id"
            ),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(Member::from).collect())
    }

    async fn ids(&self) -> Result<HashSet<MemberId>, PgErr> {
        self.query(
            const_format::concatcp!("SELECT member_id FROM ", MEMBERS),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(|row| row.get(0)).collect())
    }

    async fn exists(&self, id: MemberId) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", MEMBERS, " WHERE member_id = $1"),
            &[&id],
        )
        .await
        .map(|opt| opt.is_some())
    }

    async fn insert(&self, member: &Member) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                MEMBERS,
                " (member_id, username, server_nickname, role, owner) VALUES ($1, $2, $3, $4, $5)"
            ),
            &[
                &member.member_id(),
                &member.username(),
                &member.server_nickname(),
                &member.role(),
                &member.owner(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn update(&self, member: &Member) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                MEMBERS,
                " SET username = $2, server_nickname = $3, role = $4, owner = $5 WHERE member_id = $1"
            ),
            &[
                &member.member_id(),
                &member.username(),
                &member.server_nickname(),
                &member.role(),
                &member.owner(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn delete(&self, id: MemberId) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", MEMBERS, " WHERE member_id = $1"),
            &[&id],
        )
        .await
        .map(|_| ())
    }
}

impl From<&tokio_postgres::Row> for Member {
    fn from(row: &tokio_postgres::Row) -> Self {
        Self::new(
            row.get(0),
            row.get::<_, String>(1),
            row.get::<_, String>(2),
            row.get::<_, Option<String>>(3),
            row.get(4),
        )
    }
}
