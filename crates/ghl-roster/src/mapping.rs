use ghl_bridge::RoleDef;
use ghl_core::RoleId;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The set of roles this system mirrors, keyed by platform role id.
///
/// Monotone: discovery only ever adds entries. A role id enters the
/// mapping iff its name contained the marker substring at discovery time;
/// platform-side renames after that are not reflected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleMapping {
    roles: BTreeMap<RoleId, String>,
}

impl RoleMapping {
    /// Loads the mapping from its JSON file, or starts empty if the file
    /// does not exist yet.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Rewrites the mapping file, pretty-printed.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let text = serde_json::to_string_pretty(self).expect("mapping serializes");
        std::fs::write(path, text)
    }

    /// Scans a role catalogue and adopts every role whose name contains
    /// `marker` and whose id is not yet mapped. Returns whether anything
    /// was adopted, so the caller can persist only on change. Existing
    /// entries are never removed or renamed.
    pub fn discover(&mut self, roles: &[RoleDef], marker: &str) -> bool {
        let mut changed = false;
        for role in roles {
            if role.name.contains(marker) && !self.roles.contains_key(&role.role_id) {
                log::info!("[roles] adopted {} ({})", role.name, role.role_id);
                self.roles.insert(role.role_id, role.name.clone());
                changed = true;
            }
        }
        changed
    }

    /// Resolves a member's role label: the last mapped hit while scanning
    /// `role_ids` in their native order. Last match wins.
    pub fn resolve(&self, role_ids: &[RoleId]) -> Option<String> {
        role_ids
            .iter()
            .filter_map(|id| self.roles.get(id))
            .next_back()
            .cloned()
    }

    pub fn contains(&self, id: RoleId) -> bool {
        self.roles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Direct insertion, for seeding from configuration.
    pub fn adopt(&mut self, id: RoleId, name: &str) {
        self.roles.insert(id, name.to_string());
    }
}
