//! Admin Account Creation Binary
//!
//! Administrator accounts are created out of band; the dashboard only
//! reads them. Prompts for credentials, hashes with Argon2, inserts one
//! row into the store at DB_URL.

use ghl_auth::Admin;
use ghl_auth::AuthRepository;

#[tokio::main]
async fn main() {
    let username: String = dialoguer::Input::new()
        .with_prompt("username")
        .interact_text()
        .expect("read username");
    let password = dialoguer::Password::new()
        .with_prompt("password")
        .with_confirmation("confirm password", "passwords do not match")
        .interact()
        .expect("read password");
    let hashword = ghl_auth::password::hash(&password).expect("hash password");
    let client = ghl_pg::db().await;
    ghl_pg::migrate::<ghl_auth::Admin>(&client)
        .await
        .expect("migrate admins");
    let admin = Admin::new(username);
    client.create(&admin, &hashword).await.expect("create admin");
    println!("admin '{}' created", admin.username());
}
