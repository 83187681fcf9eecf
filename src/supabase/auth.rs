use super::{decode, send, AuthGateway, BackendError, SupabaseClient, SESSION_KEY, VERIFIER_KEY};
use crate::models::session::Session;
use crate::utils::storage::KeyValueStore;
use gloo_net::http::Request;
use leptos::logging::{log, warn};
use serde_json::json;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Apple,
    Google,
}

impl OAuthProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Apple => "apple",
            OAuthProvider::Google => "google",
        }
    }
}

/// Codes this tab has already handed to the token endpoint.
#[derive(Debug, Default)]
pub struct CodeLedger {
    seen: HashSet<String>,
}

impl CodeLedger {
    /// True the first time a code is claimed, false on every repeat.
    pub fn claim(&mut self, code: &str) -> bool {
        self.seen.insert(code.to_string())
    }
}

/// PKCE verifier: 64 hex characters, inside the 43 to 128 allowed by RFC 7636.
pub fn new_code_verifier() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

pub fn authorize_url(backend_url: &str, provider: OAuthProvider, redirect_to: &str, verifier: &str) -> String {
    // With the plain method the challenge is the verifier itself.
    format!(
        "{}/auth/v1/authorize?provider={}&redirect_to={}&code_challenge={}&code_challenge_method=plain",
        backend_url,
        provider.as_str(),
        urlencoding::encode(redirect_to),
        verifier
    )
}

impl<S: KeyValueStore> AuthGateway for SupabaseClient<S> {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        log!("[AUTH] Password sign-in for {}", email);
        let builder = Request::post(&self.endpoint("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.config.anon_key);
        let body = json!({ "email": email, "password": password });
        let response = send(builder, Some(&body)).await?;
        let session: Session = decode(response).await?;
        Ok(self.persist_session(session))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: serde_json::Value,
    ) -> Result<Option<Session>, BackendError> {
        log!("[AUTH] Sign-up for {}", email);
        let builder = Request::post(&self.endpoint("/auth/v1/signup")).header("apikey", &self.config.anon_key);
        let body = json!({ "email": email, "password": password, "data": attributes });
        let response = send(builder, Some(&body)).await?;
        let value: serde_json::Value = decode(response).await?;
        // Without auto-confirm the service answers with the bare user record.
        if value.get("access_token").is_none() {
            log!("[AUTH] Sign-up accepted, confirmation pending for {}", email);
            return Ok(None);
        }
        let session: Session =
            serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Some(self.persist_session(session)))
    }

    fn oauth_authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String {
        let verifier = new_code_verifier();
        self.store.set(VERIFIER_KEY, &verifier);
        log!("[AUTH] Starting {} sign-in", provider.as_str());
        authorize_url(&self.config.url, provider, redirect_to, &verifier)
    }

    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, BackendError> {
        if !self.ledger.borrow_mut().claim(code) {
            return Err(BackendError::CodeAlreadyUsed);
        }
        let verifier = self.store.get(VERIFIER_KEY).ok_or(BackendError::MissingVerifier)?;
        // One verifier per authorization; a second tab cannot replay it.
        self.store.remove(VERIFIER_KEY);

        let builder = Request::post(&self.endpoint("/auth/v1/token?grant_type=pkce"))
            .header("apikey", &self.config.anon_key);
        let body = json!({ "auth_code": code, "code_verifier": verifier });
        let response = send(builder, Some(&body)).await?;
        let session: Session = decode(response).await?;
        log!("[AUTH] Code exchanged for user {}", session.user_id());
        Ok(self.persist_session(session))
    }

    fn get_session(&self) -> Option<Session> {
        self.get_session_inner()
    }

    fn sign_out(&self) {
        if self.store.get(SESSION_KEY).is_some() {
            log!("[AUTH] Signing out");
        } else {
            warn!("[AUTH] Sign-out requested without a session");
        }
        self.store.remove(SESSION_KEY);
    }
}
