//! Client for the hosted backend: GoTrue for auth, PostgREST for rows.
//! Requests go straight from the browser with the anon key; row access is enforced
//! by the backend's policies, never here.

pub mod auth;
pub mod rest;

use crate::config::BackendConfig;
use crate::models::session::Session;
use crate::models::tester::{FeedbackFields, NewFeedback, TesterFeedback, TesterTag};
use crate::utils::storage::{BrowserStorage, KeyValueStore};
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub use auth::{CodeLedger, OAuthProvider};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Message from the service, shown to the user as-is.
    #[error("{0}")]
    Api(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Not signed in")]
    NoSession,
    #[error("Authorization code was already exchanged")]
    CodeAlreadyUsed,
    #[error("No pending sign-in for this authorization code")]
    MissingVerifier,
}

impl BackendError {
    /// Text for an inline error, falling back when the service said nothing useful.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Api(message) if !message.trim().is_empty() => message.clone(),
            BackendError::Api(_) => fallback.to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Deserialize, Default)]
struct ApiErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

/// Picks the human-readable message out of a GoTrue or PostgREST error body.
pub fn provider_message(status: u16, body: &str) -> String {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

/// Identity and data operations the site relies on.
#[allow(async_fn_in_trait)]
pub trait AuthGateway {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError>;
    /// `None` when the project requires e-mail confirmation before issuing a session.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: serde_json::Value,
    ) -> Result<Option<Session>, BackendError>;
    /// URL to send the browser to; the provider comes back to `redirect_to` with a code.
    fn oauth_authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String;
    async fn exchange_code_for_session(&self, code: &str) -> Result<Session, BackendError>;
    fn get_session(&self) -> Option<Session>;
    fn sign_out(&self);
}

#[allow(async_fn_in_trait)]
pub trait TesterStore {
    async fn find_tag(&self, code: &str) -> Result<Option<TesterTag>, BackendError>;
    async fn find_feedback(&self, tag_id: &str, user_id: &str) -> Result<Option<TesterFeedback>, BackendError>;
    async fn display_name(&self, user_id: &str) -> Result<Option<String>, BackendError>;
    async fn insert_feedback(&self, row: &NewFeedback) -> Result<(), BackendError>;
    async fn update_feedback(&self, id: &str, fields: &FeedbackFields) -> Result<(), BackendError>;
}

pub const SESSION_KEY: &str = "phenohunt-auth-session";
pub const VERIFIER_KEY: &str = "phenohunt-auth-code-verifier";

#[derive(Clone)]
pub struct SupabaseClient<S: KeyValueStore = BrowserStorage> {
    config: BackendConfig,
    store: S,
    ledger: Rc<RefCell<CodeLedger>>,
}

impl SupabaseClient<BrowserStorage> {
    pub fn new(config: BackendConfig) -> Self {
        Self::with_store(config, BrowserStorage::local())
    }
}

impl<S: KeyValueStore> SupabaseClient<S> {
    pub fn with_store(config: BackendConfig, store: S) -> Self {
        SupabaseClient {
            config,
            store,
            ledger: Rc::new(RefCell::new(CodeLedger::default())),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }

    fn bearer(&self) -> String {
        let token = self
            .get_session_inner()
            .map(|s| s.access_token)
            .unwrap_or_else(|| self.config.anon_key.clone());
        format!("Bearer {}", token)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &self.bearer())
    }

    fn get_session_inner(&self) -> Option<Session> {
        let raw = self.store.get(SESSION_KEY)?;
        let session: Session = match serde_json::from_str(&raw) {
            Ok(s) => s,
            Err(e) => {
                leptos::logging::warn!("[AUTH] Discarding unreadable stored session: {}", e);
                self.store.remove(SESSION_KEY);
                return None;
            }
        };
        if session.is_expired_at(now_unix()) {
            self.store.remove(SESSION_KEY);
            return None;
        }
        Some(session)
    }

    fn persist_session(&self, session: Session) -> Session {
        let session = session.with_expiry_from(now_unix());
        match serde_json::to_string(&session) {
            Ok(raw) => self.store.set(SESSION_KEY, &raw),
            Err(e) => leptos::logging::error!("[AUTH] Failed to serialize session: {}", e),
        }
        session
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

async fn send(builder: RequestBuilder, body: Option<&serde_json::Value>) -> Result<Response, BackendError> {
    let request = match body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(|e| BackendError::Network(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(BackendError::Api(provider_message(status, &text)))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_prefers_descriptions() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(provider_message(400, body), "Invalid login credentials");
        assert_eq!(
            provider_message(422, r#"{"code":422,"msg":"Password should be at least 6 characters"}"#),
            "Password should be at least 6 characters"
        );
        assert_eq!(
            provider_message(401, r#"{"message":"JWT expired","code":"PGRST301"}"#),
            "JWT expired"
        );
        assert_eq!(provider_message(400, r#"{"error":"bad_code_verifier"}"#), "bad_code_verifier");
    }

    #[test]
    fn provider_message_falls_back_to_status() {
        assert_eq!(provider_message(502, "<html>Bad Gateway</html>"), "Request failed with status 502");
        assert_eq!(provider_message(500, r#"{"message":"  "}"#), "Request failed with status 500");
    }

    #[test]
    fn user_message_is_verbatim_or_fallback() {
        assert_eq!(
            BackendError::Api("Email not confirmed".into()).user_message("Failed to sign in"),
            "Email not confirmed"
        );
        assert_eq!(BackendError::Api("".into()).user_message("Failed to sign in"), "Failed to sign in");
        assert_eq!(
            BackendError::Network("offline".into()).user_message("Failed to save"),
            "Failed to save"
        );
    }

    #[test]
    fn expired_stored_session_reads_as_none() {
        use crate::models::session::User;
        use crate::utils::storage::MemoryStore;

        let store = MemoryStore::new();
        let client = SupabaseClient::with_store(
            BackendConfig::new("https://x.supabase.co", "anon").unwrap(),
            store.clone(),
        );
        let session = Session {
            access_token: "jwt".into(),
            refresh_token: "r".into(),
            token_type: "bearer".into(),
            expires_in: None,
            expires_at: Some(now_unix() - 10),
            user: User { id: "u".into(), email: None, user_metadata: serde_json::Value::Null },
        };
        store.set(SESSION_KEY, &serde_json::to_string(&session).unwrap());
        assert!(client.get_session().is_none());
        assert!(store.get(SESSION_KEY).is_none());

        let fresh = Session { expires_at: Some(now_unix() + 3600), ..session };
        client.persist_session(fresh.clone());
        assert_eq!(client.get_session(), Some(fresh));
        assert_eq!(client.bearer(), "Bearer jwt");

        client.sign_out();
        assert!(client.get_session().is_none());
        assert_eq!(client.bearer(), "Bearer anon");
    }

    #[test]
    fn garbage_in_session_slot_is_cleared() {
        use crate::utils::storage::MemoryStore;

        let store = MemoryStore::new();
        store.set(SESSION_KEY, "{not json");
        let client = SupabaseClient::with_store(BackendConfig::new("https://x.supabase.co", "anon").unwrap(), store.clone());
        assert!(client.get_session().is_none());
        assert!(store.get(SESSION_KEY).is_none());
    }
}
