use ghl_auth::challenge;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "session";

/// Per-browser session state. The challenge exists while the login
/// surface awaits an attempt; the user exists once the gate verified one.
#[derive(Debug, Default, Clone)]
struct State {
    user: Option<String>,
    challenge: Option<String>,
}

/// Server-side session store keyed by the client-held token.
///
/// Tokens never rest in memory as given: the map key is the token's
/// SHA-256 digest. Single-process by design; entries live until an
/// explicit logout.
#[derive(Default)]
pub struct Sessions {
    inner: RwLock<HashMap<[u8; 32], State>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    fn digest(token: &str) -> [u8; 32] {
        use sha2::Digest;
        sha2::Sha256::digest(token.as_bytes()).into()
    }

    /// Admits a visitor to the login surface: reuses the presented
    /// session if known, otherwise mints one, and in either case ensures
    /// a challenge is issued. Returns the token to set as the cookie and
    /// the challenge to display.
    pub async fn admit(&self, presented: Option<String>) -> (String, String) {
        let mut inner = self.inner.write().await;
        let token = match presented {
            Some(token) if inner.contains_key(&Self::digest(&token)) => token,
            _ => challenge::token(),
        };
        let state = inner.entry(Self::digest(&token)).or_default();
        let challenge = state
            .challenge
            .get_or_insert_with(challenge::challenge)
            .clone();
        (token, challenge)
    }

    /// The currently issued challenge, without minting one.
    pub async fn peek(&self, token: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .get(&Self::digest(token))
            .and_then(|state| state.challenge.clone())
    }

    /// Replaces the challenge after a rejected attempt.
    pub async fn rotate(&self, token: &str) -> String {
        let fresh = challenge::challenge();
        self.inner
            .write()
            .await
            .entry(Self::digest(token))
            .or_default()
            .challenge = Some(fresh.clone());
        fresh
    }

    /// Binds the authenticated username into the session and consumes
    /// the challenge.
    pub async fn login(&self, token: &str, username: &str) {
        let mut inner = self.inner.write().await;
        let state = inner.entry(Self::digest(token)).or_default();
        state.user = Some(username.to_string());
        state.challenge = None;
    }

    /// The authenticated username, if any.
    pub async fn user(&self, token: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .get(&Self::digest(token))
            .and_then(|state| state.user.clone())
    }

    /// Clears the whole session entry.
    pub async fn logout(&self, token: &str) {
        self.inner.write().await.remove(&Self::digest(token));
    }
}
