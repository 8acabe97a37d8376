use super::Member;
use super::RoleMapping;
use super::RosterRepository;
use ghl_bridge::MemberSnapshot;
use ghl_core::RoleId;
use ghl_pg::PgErr;
use std::collections::HashSet;

/// Reconciliation engine: makes the identity store match a guild snapshot.
///
/// Both passes are idempotent and safe to re-run. Writes are single
/// serializable statements with no spanning transaction; a failure mid-
/// pass leaves earlier rows committed, and the store converges on the
/// next pass. Concurrent readers may observe a partially-applied pass.
pub struct Reconciler {
    owner: RoleId,
}

impl Reconciler {
    pub fn new(owner: RoleId) -> Self {
        Self { owner }
    }

    /// Upsert-only pass: inserts new members, rewrites existing ones,
    /// never deletes. Used for the passive periodic sync.
    ///
    /// Existing rows are rewritten unconditionally; the engine is not
    /// diff-aware beyond presence or absence.
    pub async fn upsert<R>(
        &self,
        db: &R,
        roster: &[MemberSnapshot],
        mapping: &RoleMapping,
    ) -> Result<(), PgErr>
    where
        R: RosterRepository,
    {
        for snapshot in roster.iter().filter(|s| !s.bot) {
            let ref member = Member::project(snapshot, self.owner, mapping);
            if db.exists(member.member_id()).await? {
                db.update(member).await?;
            } else {
                db.insert(member).await?;
            }
        }
        log::debug!("[reconcile] upsert pass over {} members", roster.len());
        Ok(())
    }

    /// Full-sync pass: upsert, then delete every stored row whose
    /// identity key the snapshot does not contain. Used for explicit
    /// operator-triggered resyncs.
    pub async fn fullsync<R>(
        &self,
        db: &R,
        roster: &[MemberSnapshot],
        mapping: &RoleMapping,
    ) -> Result<(), PgErr>
    where
        R: RosterRepository,
    {
        self.upsert(db, roster, mapping).await?;
        let present: HashSet<_> = roster
            .iter()
            .filter(|s| !s.bot)
            .map(|s| s.member_id)
            .collect();
        for id in db.ids().await? {
            if !present.contains(&id) {
                log::info!("[reconcile] member {} left, deleting", id);
                db.delete(id).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghl_core::MemberId;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    /// In-memory identity store standing in for the database.
    #[derive(Default)]
    struct Fake {
        rows: Mutex<BTreeMap<MemberId, Member>>,
    }

    impl RosterRepository for Fake {
        async fn select(&self) -> Result<Vec<Member>, PgErr> {
            Ok(self.rows.lock().await.values().cloned().collect())
        }
        async fn ids(&self) -> Result<HashSet<MemberId>, PgErr> {
            Ok(self.rows.lock().await.keys().copied().collect())
        }
        async fn exists(&self, id: MemberId) -> Result<bool, PgErr> {
            Ok(self.rows.lock().await.contains_key(&id))
        }
        async fn insert(&self, member: &Member) -> Result<(), PgErr> {
            let mut rows = self.rows.lock().await;
            assert!(!rows.contains_key(&member.member_id()), "duplicate insert");
            rows.insert(member.member_id(), member.clone());
            Ok(())
        }
        async fn update(&self, member: &Member) -> Result<(), PgErr> {
            let mut rows = self.rows.lock().await;
            assert!(rows.contains_key(&member.member_id()), "update of absent row");
            rows.insert(member.member_id(), member.clone());
            Ok(())
        }
        async fn delete(&self, id: MemberId) -> Result<(), PgErr> {
            self.rows.lock().await.remove(&id);
            Ok(())
        }
    }

    fn snapshot(id: MemberId, handle: &str, role_ids: Vec<RoleId>) -> MemberSnapshot {
        MemberSnapshot {
            member_id: id,
            handle: handle.to_string(),
            nickname: None,
            bot: false,
            role_ids,
        }
    }

    fn mapping() -> RoleMapping {
        let mut mapping = RoleMapping::default();
        mapping.adopt(10, "Family-Knights");
        mapping
    }

    #[tokio::test]
    async fn bob_scenario() {
        let db = Fake::default();
        let roster = [snapshot(1, "bob", vec![10])];
        Reconciler::new(99).upsert(&db, &roster, &mapping()).await.unwrap();
        let rows = db.select().await.unwrap();
        assert!(rows.len() == 1);
        assert!(rows[0].username() == "bob");
        assert!(rows[0].server_nickname() == "bob");
        assert!(rows[0].role() == Some("Family-Knights"));
        assert!(rows[0].owner() == false);
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let db = Fake::default();
        let roster = [snapshot(1, "bob", vec![10]), snapshot(2, "eve", vec![])];
        let engine = Reconciler::new(99);
        engine.upsert(&db, &roster, &mapping()).await.unwrap();
        let once = db.select().await.unwrap();
        engine.upsert(&db, &roster, &mapping()).await.unwrap();
        assert!(db.select().await.unwrap() == once);
    }

    #[tokio::test]
    async fn upsert_never_deletes() {
        let db = Fake::default();
        let engine = Reconciler::new(99);
        engine
            .upsert(&db, &[snapshot(1, "bob", vec![])], &mapping())
            .await
            .unwrap();
        engine.upsert(&db, &[], &mapping()).await.unwrap();
        assert!(db.ids().await.unwrap().contains(&1));
    }

    #[tokio::test]
    async fn fullsync_converges_to_snapshot() {
        let db = Fake::default();
        let engine = Reconciler::new(99);
        engine
            .upsert(
                &db,
                &[snapshot(1, "bob", vec![]), snapshot(2, "eve", vec![])],
                &mapping(),
            )
            .await
            .unwrap();
        engine
            .fullsync(&db, &[snapshot(2, "eve", vec![10])], &mapping())
            .await
            .unwrap();
        let ids = db.ids().await.unwrap();
        assert!(ids == HashSet::from([2]));
    }

    #[tokio::test]
    async fn fullsync_with_empty_snapshot_deletes_everything() {
        let db = Fake::default();
        let engine = Reconciler::new(99);
        engine
            .upsert(&db, &[snapshot(1, "bob", vec![10])], &mapping())
            .await
            .unwrap();
        engine.fullsync(&db, &[], &mapping()).await.unwrap();
        assert!(db.ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bots_are_never_mirrored() {
        let db = Fake::default();
        let ref bot = MemberSnapshot {
            bot: true,
            ..snapshot(3, "beep", vec![10])
        };
        Reconciler::new(99)
            .fullsync(&db, &[bot.clone()], &mapping())
            .await
            .unwrap();
        assert!(db.ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn updates_rewrite_changed_fields() {
        let db = Fake::default();
        let engine = Reconciler::new(99);
        engine
            .upsert(&db, &[snapshot(1, "bob", vec![])], &mapping())
            .await
            .unwrap();
        let ref renamed = MemberSnapshot {
            nickname: Some("bobby".to_string()),
            role_ids: vec![10, 99],
            ..snapshot(1, "bob", vec![])
        };
        engine
            .upsert(&db, std::slice::from_ref(renamed), &mapping())
            .await
            .unwrap();
        let rows = db.select().await.unwrap();
        assert!(rows[0].server_nickname() == "bobby");
        assert!(rows[0].role() == Some("Family-Knights"));
        assert!(rows[0].owner() == true);
    }
}
