//! Operator dashboard server.
//!
//! Wires the identity store, the authentication gate, and the chat-
//! platform bridge into a single actix-web surface, and drives the
//! periodic reconciliation scheduler.
//!
//! ## Pieces
//!
//! - [`handlers`] — Route handlers for the dashboard surface
//! - [`Sessions`] — Server-side session store
//! - [`Syncer`] — Reconciliation scheduler and orchestration
//! - [`Operator`] — Extractor for authenticated requests

pub mod handlers;
mod extract;
mod sessions;
mod sync;

pub use extract::*;
pub use sessions::Sessions;
pub use sync::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use ghl_bridge::BridgeHandle;
use ghl_core::RoleId;
use ghl_roster::Reconciler;
use ghl_roster::RoleMapping;
use std::path::PathBuf;
use std::sync::Arc;

/// Reads a configuration variable with a default.
fn var(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[rustfmt::skip]
pub async fn run(bridge: BridgeHandle) -> Result<(), std::io::Error> {
    let client = ghl_pg::db().await;
    ghl_pg::migrate::<ghl_roster::Member>(&client).await.expect("migrate members");
    ghl_pg::migrate::<ghl_auth::Admin>(&client).await.expect("migrate admins");
    ghl_pg::migrate::<ghl_auth::Attempt>(&client).await.expect("migrate login attempts");
    let owner: RoleId = var("OWNER_ROLE_ID", "0").parse().expect("OWNER_ROLE_ID must be an id");
    let file = PathBuf::from(var("ROLE_FILE", "roles.json"));
    let marker = var("ROLE_MARKER", "Family");
    let mapping = RoleMapping::load(&file).expect("role mapping file unreadable");
    log::info!("loaded {} mapped roles from {}", mapping.len(), file.display());
    let syncer = Arc::new(Syncer::new(
        client.clone(),
        bridge.clone(),
        Reconciler::new(owner),
        mapping,
        file,
        marker,
    ));
    tokio::spawn(syncer.clone().tick());
    let syncer = web::Data::from(syncer);
    let sessions = web::Data::new(Sessions::new());
    let bridge = web::Data::new(bridge);
    let client = web::Data::new(client);
    log::info!("starting dashboard server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(syncer.clone())
            .app_data(sessions.clone())
            .app_data(bridge.clone())
            .app_data(client.clone())
            .route("/health", web::get().to(handlers::health))
            .route("/login", web::get().to(handlers::login_page))
            .route("/login", web::post().to(handlers::login_submit))
            .route("/logout", web::get().to(handlers::logout))
            .route("/", web::get().to(handlers::index))
            .route("/members-and-channels", web::get().to(handlers::members_and_channels))
            .route("/relay-message", web::post().to(handlers::relay_message))
            .route("/run-command", web::post().to(handlers::run_command))
            .route("/resync", web::post().to(handlers::resync))
    })
    .workers(2)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
