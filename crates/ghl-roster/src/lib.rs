//! Membership reconciliation and role discovery.
//!
//! Mirrors the guild's membership into the identity store and keeps a
//! monotonically growing mapping of the role ids this system cares about.
//!
//! ## Identity Store
//!
//! - [`Member`] — One mirrored guild member row
//! - [`RosterRepository`] — Identity store access, implemented on the
//!   shared database client
//!
//! ## Engines
//!
//! - [`RoleMapping`] — Marker-based role discovery with JSON persistence
//! - [`Reconciler`] — Upsert-only and full-sync reconciliation passes
mod mapping;
mod member;
mod reconcile;
mod repository;

pub use mapping::*;
pub use member::*;
pub use reconcile::*;
pub use repository::*;
