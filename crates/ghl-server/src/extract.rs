use super::Sessions;
use super::sessions::SESSION_COOKIE;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;

/// Extractor for authenticated requests.
/// Resolves the session cookie against the server-side store.
pub struct Operator(pub String);

impl Operator {
    pub fn username(&self) -> &str {
        &self.0
    }
}

impl FromRequest for Operator {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let sessions = req.app_data::<web::Data<Sessions>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
        Box::pin(async move {
            let sessions = sessions.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("session store not configured")
            })?;
            let token = token
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("login required"))?;
            let username = sessions
                .user(&token)
                .await
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("login required"))?;
            Ok(Operator(username))
        })
    }
}

/// Optional authentication extractor - does not fail if unauthenticated.
pub struct MaybeOperator(pub Option<String>);

impl MaybeOperator {
    pub fn username(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for MaybeOperator {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth_future = Operator::from_request(req, payload);
        Box::pin(async move {
            match auth_future.await {
                Ok(Operator(username)) => Ok(MaybeOperator(Some(username))),
                Err(_) => Ok(MaybeOperator(None)),
            }
        })
    }
}
