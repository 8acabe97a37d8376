use super::MaybeOperator;
use super::Operator;
use super::Sessions;
use super::Syncer;
use super::sessions::SESSION_COOKIE;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::cookie::Cookie;
use actix_web::web;
use ghl_auth::Gate;
use ghl_auth::GateOutcome;
use ghl_bridge::BridgeHandle;
use ghl_roster::RosterRepository;
use serde::Deserialize;
use std::sync::Arc;
use std::time::SystemTime;
use tokio_postgres::Client;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub captcha: String,
}

#[derive(Deserialize)]
pub struct RelayRequest {
    pub channel: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct CommandRequest {
    pub command: String,
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

/// GET /login — ensures a session and challenge exist for this browser.
pub async fn login_page(sessions: web::Data<Sessions>, req: HttpRequest) -> impl Responder {
    let presented = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
    let (token, challenge) = sessions.admit(presented).await;
    HttpResponse::Ok()
        .cookie(session_cookie(&token))
        .json(serde_json::json!({ "captcha": challenge }))
}

/// POST /login — drives the gate with the form's username, password, and
/// challenge answer. Every rejection rotates the challenge.
pub async fn login_submit(
    db: web::Data<Arc<Client>>,
    sessions: web::Data<Sessions>,
    req: HttpRequest,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let presented = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
    let challenge = match presented.as_ref() {
        Some(token) => sessions.peek(token).await,
        None => None,
    };
    let (token, challenge) = match (presented, challenge) {
        (Some(token), Some(challenge)) => (token, challenge),
        // no live challenge for this browser: treat as a mismatch
        _ => {
            let (token, fresh) = sessions.admit(None).await;
            return HttpResponse::Unauthorized()
                .cookie(session_cookie(&token))
                .json(serde_json::json!({
                    "error": GateOutcome::ChallengeMismatch.message(),
                    "captcha": fresh,
                }));
        }
    };
    let outcome = match Gate::authenticate(
        db.get_ref(),
        &form.username,
        &form.password,
        &form.captcha,
        &challenge,
        SystemTime::now(),
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("[login] credential store error: {}", e);
            return HttpResponse::InternalServerError().body("credential store unavailable");
        }
    };
    match outcome {
        GateOutcome::Success => {
            sessions.login(&token, &form.username).await;
            HttpResponse::Ok().json(serde_json::json!({ "status": outcome.message() }))
        }
        GateOutcome::LockedOut => {
            let fresh = sessions.rotate(&token).await;
            HttpResponse::TooManyRequests().json(serde_json::json!({
                "error": outcome.message(),
                "captcha": fresh,
            }))
        }
        GateOutcome::ChallengeMismatch | GateOutcome::InvalidCredentials => {
            let fresh = sessions.rotate(&token).await;
            HttpResponse::Unauthorized().json(serde_json::json!({
                "error": outcome.message(),
                "captcha": fresh,
            }))
        }
    }
}

/// GET /logout — clears the whole session entry.
pub async fn logout(sessions: web::Data<Sessions>, req: HttpRequest) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        sessions.logout(cookie.value()).await;
    }
    HttpResponse::Ok().json(serde_json::json!({ "status": "logged out" }))
}

/// GET / — every identity store row, for the roster table.
pub async fn index(db: web::Data<Arc<Client>>, _auth: Operator) -> impl Responder {
    match db.select().await {
        Ok(members) => HttpResponse::Ok().json(members),
        Err(e) => {
            log::error!("[index] identity store error: {}", e);
            HttpResponse::InternalServerError().body("identity store unavailable")
        }
    }
}

/// GET /members-and-channels — channel/message snapshot via the bridge.
pub async fn members_and_channels(bridge: web::Data<BridgeHandle>) -> impl Responder {
    match bridge.channels().await {
        Ok(channels) => HttpResponse::Ok().json(channels),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// POST /relay-message — schedules a send; acknowledges scheduling only.
pub async fn relay_message(
    bridge: web::Data<BridgeHandle>,
    req: web::Json<RelayRequest>,
) -> impl Responder {
    if req.message.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "message cannot be empty" }));
    }
    match bridge.send(&req.channel, &req.message) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "response": format!("message relayed to #{}", req.channel),
        })),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// POST /run-command — relays an operator command; requires a session.
pub async fn run_command(
    bridge: web::Data<BridgeHandle>,
    auth: MaybeOperator,
    req: web::Json<CommandRequest>,
) -> impl Responder {
    let Some(username) = auth.username() else {
        return HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": "login required" }));
    };
    if req.command.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "command cannot be empty" }));
    }
    log::info!("[command] {} ran '{}'", username, req.command);
    match bridge.command(&req.command) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "response": format!("command '{}' relayed", req.command),
        })),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// POST /resync — explicit operator-triggered full-sync pass.
pub async fn resync(syncer: web::Data<Syncer>, auth: Operator) -> impl Responder {
    log::info!("[sync] full resync requested by {}", auth.username());
    match syncer.resync().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "resynced" })),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// GET /health — liveness plus store reachability.
pub async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}
